//! In-memory stores for development and testing.
//!
//! Provides simple implementations of every store port. Not suitable for
//! production use: nothing is persisted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use editgate_types::{
    ActorId, ContentId, ContentItem, ContentType, EditingMode, Revision, RevisionId,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::traits::{
    AuthorizationProvider, ContentStore, EphemeralStore, PointerStore, PolicyStore, RevisionQuery,
};
use crate::config::EditGateSettings;
use crate::error::Result;

/// In-memory content and revision store.
pub struct InMemoryContentStore {
    /// Content items indexed by ID.
    items: Arc<DashMap<ContentId, ContentItem>>,

    /// All revisions indexed by ID.
    revisions: Arc<DashMap<RevisionId, Revision>>,

    /// Revision IDs indexed by content ID.
    by_content: Arc<DashMap<ContentId, Vec<RevisionId>>>,

    /// Next free ID; items and revisions share the id space.
    next_id: Arc<AtomicU64>,
}

impl InMemoryContentStore {
    /// Empty store; recorded revision IDs start at 1.
    pub fn new() -> Self {
        Self {
            items: Arc::new(DashMap::new()),
            revisions: Arc::new(DashMap::new()),
            by_content: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn reserve(&self, id: u64) {
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    /// Insert or replace a content item.
    pub fn insert_item(&self, item: ContentItem) {
        self.reserve(item.id.get());
        self.items.insert(item.id, item);
    }

    /// Insert a revision with a caller-chosen ID.
    pub fn insert_revision(&self, revision: Revision) {
        self.reserve(revision.id.get());
        let id = revision.id;
        let content = revision.content_id;
        if self.revisions.insert(id, revision).is_none() {
            self.by_content.entry(content).or_default().push(id);
        }
    }

    /// Create a revision with the next free ID.
    pub fn record_revision(
        &self,
        content: ContentId,
        author: ActorId,
        created_at: DateTime<Utc>,
        transient: bool,
    ) -> Revision {
        let id = RevisionId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut revision = Revision::new(id, content, author, created_at);
        revision.transient = transient;
        self.insert_revision(revision.clone());
        revision
    }

    /// Remove a revision, leaving any pointer to it dangling.
    pub fn remove_revision(&self, id: RevisionId) -> Option<Revision> {
        let (_, revision) = self.revisions.remove(&id)?;
        if let Some(mut ids) = self.by_content.get_mut(&revision.content_id) {
            ids.retain(|i| *i != id);
        }
        Some(revision)
    }

    /// Number of revisions stored for an item, transient ones included.
    pub fn revision_count(&self, content: ContentId) -> usize {
        self.by_content.get(&content).map(|ids| ids.len()).unwrap_or(0)
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn get_item(&self, id: ContentId) -> Result<Option<ContentItem>> {
        Ok(self.items.get(&id).map(|item| item.clone()))
    }

    async fn get_revisions(&self, id: ContentId, query: &RevisionQuery) -> Result<Vec<Revision>> {
        let ids = match self.by_content.get(&id) {
            Some(ids) => ids.clone(),
            None => return Ok(Vec::new()),
        };

        let mut revisions: Vec<Revision> = ids
            .iter()
            .filter_map(|rid| self.revisions.get(rid).map(|r| r.clone()))
            .filter(|r| query.matches(r))
            .collect();

        Revision::sort_newest_first(&mut revisions);
        if let Some(limit) = query.limit {
            revisions.truncate(limit);
        }

        Ok(revisions)
    }

    async fn get_revision(&self, id: RevisionId) -> Result<Option<Revision>> {
        Ok(self.revisions.get(&id).map(|r| r.clone()))
    }
}

/// In-memory policy store.
pub struct InMemoryPolicyStore {
    /// Raw default mode per content type.
    type_defaults: Arc<DashMap<ContentType, String>>,

    /// Raw override per content item.
    overrides: Arc<DashMap<ContentId, String>>,
}

impl InMemoryPolicyStore {
    /// Store with no type defaults or overrides.
    pub fn new() -> Self {
        Self {
            type_defaults: Arc::new(DashMap::new()),
            overrides: Arc::new(DashMap::new()),
        }
    }

    /// Seed type defaults from settings.
    pub fn from_settings(settings: &EditGateSettings) -> Self {
        let store = Self::new();
        for (content_type, mode) in &settings.content_types {
            store.set_type_default(ContentType::new(content_type.as_str()), mode.as_str());
        }
        store
    }

    /// Set a raw type default (unvalidated, as a settings page would store it).
    pub fn set_type_default(&self, content_type: ContentType, raw: impl Into<String>) {
        self.type_defaults.insert(content_type, raw.into());
    }

    /// Set a raw item override, bypassing validation.
    pub fn set_raw_override(&self, id: ContentId, raw: impl Into<String>) {
        self.overrides.insert(id, raw.into());
    }
}

impl Default for InMemoryPolicyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn get_type_default_mode(&self, content_type: &ContentType) -> Result<Option<String>> {
        Ok(self.type_defaults.get(content_type).map(|m| m.clone()))
    }

    async fn get_item_override_mode(&self, id: ContentId) -> Result<Option<String>> {
        Ok(self.overrides.get(&id).map(|m| m.clone()))
    }

    async fn set_item_override_mode(&self, id: ContentId, mode: EditingMode) -> Result<()> {
        self.overrides.insert(id, mode.as_str().to_string());
        Ok(())
    }
}

/// In-memory accepted pointer store.
pub struct InMemoryPointerStore {
    pointers: Arc<DashMap<ContentId, RevisionId>>,
}

impl InMemoryPointerStore {
    /// Store with no pointers.
    pub fn new() -> Self {
        Self {
            pointers: Arc::new(DashMap::new()),
        }
    }

    /// Set a pointer unconditionally.
    pub fn set(&self, content: ContentId, revision: RevisionId) {
        self.pointers.insert(content, revision);
    }
}

impl Default for InMemoryPointerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PointerStore for InMemoryPointerStore {
    async fn get(&self, content: ContentId) -> Result<Option<RevisionId>> {
        Ok(self.pointers.get(&content).map(|r| *r))
    }

    async fn compare_and_set(
        &self,
        content: ContentId,
        expected: Option<RevisionId>,
        new: RevisionId,
    ) -> Result<bool> {
        // The entry holds the shard lock for the whole check-and-write.
        let swapped = match self.pointers.entry(content) {
            Entry::Occupied(mut entry) => {
                if expected == Some(*entry.get()) {
                    entry.insert(new);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(entry) => {
                if expected.is_none() {
                    entry.insert(new);
                    true
                } else {
                    false
                }
            }
        };
        Ok(swapped)
    }
}

struct EphemeralEntry {
    value: String,
    expires_at: Instant,
}

/// In-memory ephemeral store.
///
/// Expired entries read as absent and are pruned on the next write.
pub struct InMemoryEphemeralStore {
    entries: Arc<DashMap<String, EphemeralEntry>>,
}

impl InMemoryEphemeralStore {
    /// Empty store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
        }
    }

    /// Number of stored entries, expired ones included until pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryEphemeralStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EphemeralStore for InMemoryEphemeralStore {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.entries.insert(
            key.to_string(),
            EphemeralEntry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if entry.expires_at > now {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn take(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        if let Some((_, entry)) = self.entries.remove_if(key, |_, entry| entry.expires_at > now) {
            return Ok(Some(entry.value));
        }
        self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
        Ok(None)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Fixed approval grants.
pub struct StaticAuthorization {
    /// Actors who may approve any item.
    approvers: Arc<DashSet<ActorId>>,

    /// Per-item grants.
    grants: Arc<DashSet<(ActorId, ContentId)>>,
}

impl StaticAuthorization {
    /// No grants; nobody can approve.
    pub fn new() -> Self {
        Self {
            approvers: Arc::new(DashSet::new()),
            grants: Arc::new(DashSet::new()),
        }
    }

    /// Let an actor approve every item.
    pub fn grant_all(&self, actor: ActorId) {
        self.approvers.insert(actor);
    }

    /// Let an actor approve one item.
    pub fn grant(&self, actor: ActorId, content: ContentId) {
        self.grants.insert((actor, content));
    }
}

impl Default for StaticAuthorization {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthorizationProvider for StaticAuthorization {
    async fn can_approve(&self, actor: ActorId, content: ContentId) -> Result<bool> {
        Ok(self.approvers.contains(&actor) || self.grants.contains(&(actor, content)))
    }
}
