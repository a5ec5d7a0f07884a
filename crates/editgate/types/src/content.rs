//! Content items, revisions and actors as seen by the policy core
//!
//! All of these are owned by the host store. The core only reads them.

use crate::{ActorId, ContentId, RevisionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Content type tag (for example `post` or `page`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentType(String);

impl ContentType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Lifecycle status of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    #[default]
    Draft,
    Pending,
    Private,
    Published,
    Other,
}

/// A content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: ContentId,
    pub content_type: ContentType,
    #[serde(default)]
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    pub fn new(
        id: ContentId,
        content_type: impl Into<ContentType>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content_type: content_type.into(),
            status: ContentStatus::Draft,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_status(mut self, status: ContentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_published(&self) -> bool {
        self.status == ContentStatus::Published
    }
}

/// An immutable revision of a content item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    pub content_id: ContentId,
    pub author: ActorId,
    pub created_at: DateTime<Utc>,

    /// Autosave-style revision; never pending and never accepted
    #[serde(default)]
    pub transient: bool,
}

impl Revision {
    pub fn new(
        id: RevisionId,
        content_id: ContentId,
        author: ActorId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            content_id,
            author,
            created_at,
            transient: false,
        }
    }

    pub fn autosave(mut self) -> Self {
        self.transient = true;
        self
    }

    /// Order by creation time, ties broken by id
    pub fn cmp_recency(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.id.cmp(&other.id))
    }

    /// Sort newest first
    pub fn sort_newest_first(revisions: &mut [Revision]) {
        revisions.sort_by(|a, b| b.cmp_recency(a));
    }
}

/// The actor performing a save or viewing an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
}

impl Actor {
    pub const fn new(id: ActorId) -> Self {
        Self { id }
    }
}

impl From<ActorId> for Actor {
    fn from(id: ActorId) -> Self {
        Self::new(id)
    }
}
