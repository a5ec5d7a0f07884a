//! Accepted revision and pending set types

use crate::notice::DiffTarget;
use crate::{Revision, RevisionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where the accepted revision came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptedSource {
    /// The pointer references a revision of this item
    Pointer,

    /// No pointer is stored; the item itself is accepted
    Implicit,

    /// The pointer is dangling or belongs to another item; the item itself is used
    DanglingFallback,
}

/// The revision currently treated as authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedRevision {
    pub id: RevisionId,
    pub created_at: DateTime<Utc>,
    pub source: AcceptedSource,
}

impl AcceptedRevision {
    pub fn has_pointer(&self) -> bool {
        !matches!(self.source, AcceptedSource::Implicit)
    }
}

/// Revisions newer than the accepted one, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSet {
    pub accepted: AcceptedRevision,
    pub revisions: Vec<Revision>,
}

impl PendingSet {
    pub fn empty(accepted: AcceptedRevision) -> Self {
        Self {
            accepted,
            revisions: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }

    /// Most recent pending revision
    pub fn newest(&self) -> Option<&Revision> {
        self.revisions.first()
    }

    pub fn contains(&self, id: RevisionId) -> bool {
        self.revisions.iter().any(|r| r.id == id)
    }

    /// Accepted revision paired with the newest pending one
    pub fn diff_target(&self) -> Option<DiffTarget> {
        self.newest().map(|newest| DiffTarget {
            from: self.accepted.id,
            to: newest.id,
        })
    }
}

/// Per-revision flags for a revision browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionMarking {
    pub revision: RevisionId,
    pub accepted: bool,
    pub pending: bool,
}
