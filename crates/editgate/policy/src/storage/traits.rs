//! Store traits.
//!
//! The host system owns content, revisions, policies, pointers and
//! authorization. The policy core reads and writes them only through these
//! ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use editgate_types::{
    ActorId, ContentId, ContentItem, ContentType, EditingMode, Revision, RevisionId,
};
use std::time::Duration;

use crate::error::Result;

/// Filter for revision history lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionQuery {
    /// Only revisions by this author.
    pub author: Option<ActorId>,

    /// Only revisions created strictly after this instant.
    pub after: Option<DateTime<Utc>>,

    /// Skip autosave-style revisions.
    pub exclude_transient: bool,

    /// Maximum number of revisions to return.
    pub limit: Option<usize>,
}

impl RevisionQuery {
    /// All non-transient revisions.
    pub fn new() -> Self {
        Self {
            author: None,
            after: None,
            exclude_transient: true,
            limit: None,
        }
    }

    /// Restrict to one author.
    pub fn by_author(mut self, author: ActorId) -> Self {
        self.author = Some(author);
        self
    }

    /// Restrict to revisions created after an instant.
    pub fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    /// Cap the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Include autosave-style revisions.
    pub fn including_transient(mut self) -> Self {
        self.exclude_transient = false;
        self
    }

    /// Check a single revision against the filter (limit not applied).
    pub fn matches(&self, revision: &Revision) -> bool {
        if self.exclude_transient && revision.transient {
            return false;
        }
        if let Some(author) = self.author {
            if revision.author != author {
                return false;
            }
        }
        if let Some(after) = self.after {
            if revision.created_at <= after {
                return false;
            }
        }
        true
    }
}

impl Default for RevisionQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// Content items and their revision history.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load a content item.
    async fn get_item(&self, id: ContentId) -> Result<Option<ContentItem>>;

    /// Revisions of an item matching the query, newest first.
    async fn get_revisions(&self, id: ContentId, query: &RevisionQuery) -> Result<Vec<Revision>>;

    /// Load a single revision.
    async fn get_revision(&self, id: RevisionId) -> Result<Option<Revision>>;

    /// Content type of an item.
    async fn get_content_type(&self, id: ContentId) -> Result<Option<ContentType>> {
        Ok(self.get_item(id).await?.map(|item| item.content_type))
    }
}

/// Per-type default modes and per-item overrides.
///
/// Values are returned raw so that unrecognized entries reach the resolver's
/// fallback rules.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Default mode configured for a content type.
    async fn get_type_default_mode(&self, content_type: &ContentType) -> Result<Option<String>>;

    /// Override stored on a single item.
    async fn get_item_override_mode(&self, id: ContentId) -> Result<Option<String>>;

    /// Store an item override.
    async fn set_item_override_mode(&self, id: ContentId, mode: EditingMode) -> Result<()>;
}

/// Accepted revision pointers.
#[async_trait]
pub trait PointerStore: Send + Sync {
    /// Current accepted revision of an item.
    async fn get(&self, content: ContentId) -> Result<Option<RevisionId>>;

    /// Replace the pointer only if it still equals `expected`.
    ///
    /// Returns `false` when another writer changed it first.
    async fn compare_and_set(
        &self,
        content: ContentId,
        expected: Option<RevisionId>,
        new: RevisionId,
    ) -> Result<bool>;
}

/// Short-lived key/value entries with a time to live.
#[async_trait]
pub trait EphemeralStore: Send + Sync {
    /// Store a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Value of a live entry; expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Read and remove a live entry.
    ///
    /// Backends with concurrent readers should override this so that only
    /// one caller receives the value.
    async fn take(&self, key: &str) -> Result<Option<String>> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.delete(key).await?;
        }
        Ok(value)
    }

    /// Remove an entry; missing keys are not an error.
    async fn delete(&self, key: &str) -> Result<()>;
}

/// Resource-scoped approval capability.
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Can the actor approve (publish) changes to this item?
    async fn can_approve(&self, actor: ActorId, content: ContentId) -> Result<bool>;
}
