//! Save outcomes
//!
//! Outcomes are typed results the caller must branch on. A rejected save is
//! not an error: it is the only outcome that must stop the host from writing.

use crate::{EditingMode, RevisionId};
use serde::{Deserialize, Serialize};

/// Pre-write verdict for a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "admission", rename_all = "snake_case")]
pub enum SaveAdmission {
    Allowed,

    /// The item is locked and the actor cannot approve
    Blocked { mode: EditingMode },
}

impl SaveAdmission {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Why a save became a pending suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    /// The mode gates edits and the actor cannot approve
    RequiresApproval,

    /// An approver chose to submit a suggestion
    ExplicitRequest,
}

/// Effect of an accepted save on the accepted pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerUpdate {
    /// Pointer moved to the new revision
    Advanced,

    /// Pointer already referenced the revision
    Unchanged,

    /// A concurrent writer changed the pointer first
    Superseded,

    /// No qualifying revision was found; pointer left alone
    Skipped,
}

/// Outcome of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// Locked, insufficient permission; nothing may be persisted
    Rejected { mode: EditingMode },

    /// The change is the new accepted version
    AcceptedAndPublished {
        revision: Option<RevisionId>,
        pointer: PointerUpdate,
    },

    /// The change is kept as a suggestion; the pointer did not move
    FiledAsPending {
        reason: PendingReason,
        accepted: RevisionId,
    },
}

impl SaveOutcome {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::AcceptedAndPublished { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::FiledAsPending { .. })
    }

    /// Revision the accepted pointer should reference after this save, if it moved
    pub fn accepted_revision(&self) -> Option<RevisionId> {
        match self {
            Self::AcceptedAndPublished { revision, .. } => *revision,
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => "rejected",
            Self::AcceptedAndPublished { .. } => "accepted",
            Self::FiledAsPending { .. } => "pending",
        }
    }
}
