//! Error types for policy resolution and save decisions
//!
//! Unrecognized mode values and unauthorized saves are not errors: the first
//! falls back to a defined mode, the second surfaces as a rejected outcome.

use editgate_types::ContentId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// EditGate errors
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditGateError {
    /// Content item or revision does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: u64 },

    /// An external store failed
    #[error("{store} store error: {reason}")]
    Store { store: String, reason: String },

    /// Invalid settings
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    /// Builder was missing a required component
    #[error("Missing component: {component}")]
    MissingComponent { component: String },
}

impl EditGateError {
    pub fn content_not_found(id: ContentId) -> Self {
        Self::NotFound {
            kind: "content".into(),
            id: id.get(),
        }
    }

    pub fn store(store: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for EditGate operations
pub type Result<T> = std::result::Result<T, EditGateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = EditGateError::content_not_found(ContentId::new(12));
        assert_eq!(err.to_string(), "content not found: 12");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_store_display() {
        let err = EditGateError::store("pointer", "connection reset");
        assert_eq!(err.to_string(), "pointer store error: connection reset");
        assert!(!err.is_not_found());
    }
}
