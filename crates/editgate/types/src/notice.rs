//! Advisory message selection
//!
//! Only the kind of message is decided here. Wording lives in configuration
//! and rendering belongs to the caller.

use crate::RevisionId;
use serde::{Deserialize, Serialize};

/// Pair of revisions to compare in a diff view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffTarget {
    pub from: RevisionId,
    pub to: RevisionId,
}

/// Advisory message to show the current actor; one per view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessageKind {
    #[default]
    None,

    /// The actor's save just became a pending suggestion
    JustFiledAsPending {
        /// Accepted revision the suggestion is measured against
        target: RevisionId,
    },

    /// The actor's edits will need approval
    RequiresApprovalNotice,

    /// The actor cannot edit this item
    LockedNotice,

    /// Newer revisions exist than the accepted one
    DivergedFromAcceptedNotice {
        diff: DiffTarget,
        /// Approvers get different wording
        viewer_can_approve: bool,
    },
}

impl MessageKind {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
