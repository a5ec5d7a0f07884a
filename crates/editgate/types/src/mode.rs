//! Editing modes
//!
//! A content type carries a default mode and each item may carry an override.
//! Mode values arrive as raw strings from the policy store; anything that does
//! not parse is treated as "unrecognized" and handled by fallback rules rather
//! than by an error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Editing policy for a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditingMode {
    /// Editing policy disabled for the content type
    Off,

    /// All revisions accepted
    Open,

    /// Suggestions must be approved
    #[serde(alias = "pending")]
    ApprovalRequired,

    /// Only authorised actors can edit
    Locked,
}

impl EditingMode {
    /// Every recognized mode
    pub const ALL: [EditingMode; 4] = [
        EditingMode::Off,
        EditingMode::Open,
        EditingMode::ApprovalRequired,
        EditingMode::Locked,
    ];

    /// Parse a stored mode value.
    ///
    /// Matching is exact: padded or differently cased values are
    /// unrecognized and yield `None`, as does the empty string. The legacy
    /// value `pending` is read as [`EditingMode::ApprovalRequired`].
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "off" => Some(Self::Off),
            "open" => Some(Self::Open),
            "approval-required" | "pending" => Some(Self::ApprovalRequired),
            "locked" => Some(Self::Locked),
            _ => None,
        }
    }

    /// Canonical stored value
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Open => "open",
            Self::ApprovalRequired => "approval-required",
            Self::Locked => "locked",
        }
    }

    /// Modes an approver may pick for a single item (`off` is type-level only)
    pub fn selectable() -> impl Iterator<Item = EditingMode> {
        Self::ALL.into_iter().filter(|mode| *mode != Self::Off)
    }

    /// Does saving under this mode ever need approval?
    pub fn is_gated(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for EditingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
