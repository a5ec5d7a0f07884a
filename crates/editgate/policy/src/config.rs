//! EditGate settings
//!
//! Settings hold the per-type default modes, the pending marker lifetime and
//! the notice templates. Mode values stay raw strings here: an unrecognized
//! value is a legitimate setting that the resolver falls back from.

use crate::error::{EditGateError, Result};
use editgate_types::{EditingMode, MessageKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// How long a pending marker survives an interrupted request
pub const DEFAULT_MARKER_TTL_SECONDS: u64 = 15 * 60;

/// EditGate settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditGateSettings {
    /// Lifetime of the "just filed as pending" marker
    #[serde(default = "default_marker_ttl_seconds")]
    pub marker_ttl_seconds: u64,

    /// Default editing mode per content type
    #[serde(default)]
    pub content_types: BTreeMap<String, String>,

    /// Notice wording
    #[serde(default)]
    pub notices: NoticeTemplates,
}

const fn default_marker_ttl_seconds() -> u64 {
    DEFAULT_MARKER_TTL_SECONDS
}

impl Default for EditGateSettings {
    fn default() -> Self {
        Self {
            marker_ttl_seconds: default_marker_ttl_seconds(),
            content_types: BTreeMap::new(),
            notices: NoticeTemplates::default(),
        }
    }
}

impl EditGateSettings {
    /// Load settings from a TOML file; a missing file yields defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| EditGateError::Config {
            reason: format!("{}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse settings from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Self = toml::from_str(contents).map_err(|e| EditGateError::Config {
            reason: e.to_string(),
        })?;
        if settings.marker_ttl_seconds == 0 {
            return Err(EditGateError::Config {
                reason: "marker_ttl_seconds must be greater than zero".into(),
            });
        }
        Ok(settings)
    }

    /// Marker lifetime as a duration
    pub fn marker_ttl(&self) -> Duration {
        Duration::from_secs(self.marker_ttl_seconds)
    }

    /// Set the raw default mode for a content type
    pub fn with_type_default(mut self, content_type: impl Into<String>, mode: impl Into<String>) -> Self {
        self.content_types.insert(content_type.into(), mode.into());
        self
    }

    /// Entries whose mode is not recognized; these resolve to `open`.
    pub fn validate(&self) -> Vec<SettingsWarning> {
        self.content_types
            .iter()
            .filter(|(_, mode)| EditingMode::parse(mode).is_none())
            .map(|(content_type, mode)| SettingsWarning::UnrecognizedMode {
                content_type: content_type.clone(),
                value: mode.clone(),
            })
            .collect()
    }
}

/// Non-fatal settings problem
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsWarning {
    /// Type default that no mode matches
    #[error("content type '{content_type}' has unrecognized mode '{value}'; it resolves to open")]
    UnrecognizedMode { content_type: String, value: String },
}

/// Wording for each notice; selection happens elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct NoticeTemplates {
    pub submitted_pending_approval: Option<String>,
    pub edits_require_approval: Option<String>,
    pub locked: Option<String>,
    pub not_accepted: Option<String>,
    pub not_accepted_editors: Option<String>,
}

impl NoticeTemplates {
    /// Template configured for a message kind
    pub fn template_for(&self, kind: &MessageKind) -> Option<&str> {
        let template = match kind {
            MessageKind::None => return None,
            MessageKind::JustFiledAsPending { .. } => &self.submitted_pending_approval,
            MessageKind::RequiresApprovalNotice => &self.edits_require_approval,
            MessageKind::LockedNotice => &self.locked,
            MessageKind::DivergedFromAcceptedNotice {
                viewer_can_approve: true,
                ..
            } => &self.not_accepted_editors,
            MessageKind::DivergedFromAcceptedNotice { .. } => &self.not_accepted,
        };
        template.as_deref()
    }
}
