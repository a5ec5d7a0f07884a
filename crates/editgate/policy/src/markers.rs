//! Pending markers
//!
//! A marker records "this actor's save of this item was just filed as
//! pending" so that the confirmation view, possibly served by a separate
//! request, can say so. Markers are read once and expire on their own.

use crate::config::DEFAULT_MARKER_TTL_SECONDS;
use crate::error::Result;
use crate::storage::EphemeralStore;
use editgate_types::{ActorId, ContentId};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const MARKER_VALUE: &str = "1";

/// Key of a pending marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingMarkerKey {
    pub content: ContentId,
    pub actor: ActorId,
}

impl PendingMarkerKey {
    /// `None` when either side is unset (new item or anonymous actor)
    pub fn new(content: ContentId, actor: ActorId) -> Option<Self> {
        if content.is_unset() || actor.is_anonymous() {
            return None;
        }
        Some(Self { content, actor })
    }
}

impl fmt::Display for PendingMarkerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editgate_saved_pending_{}_{}", self.content, self.actor)
    }
}

/// TTL-bound, consume-once markers over an ephemeral store
#[derive(Clone)]
pub struct PendingMarkers {
    store: Arc<dyn EphemeralStore>,
    ttl: Duration,
}

impl PendingMarkers {
    /// Markers with the default lifetime of fifteen minutes
    pub fn new(store: Arc<dyn EphemeralStore>) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(DEFAULT_MARKER_TTL_SECONDS),
        }
    }

    /// Override the marker lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current marker lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Record that the actor's save was filed as pending.
    ///
    /// Setting an existing marker restarts its lifetime.
    pub async fn set(&self, key: PendingMarkerKey) -> Result<()> {
        self.store
            .set(&key.to_string(), MARKER_VALUE, self.ttl)
            .await?;
        debug!(content = %key.content, actor = %key.actor, "Pending marker set");
        Ok(())
    }

    /// Read and clear the marker; returns whether it was present.
    ///
    /// Of several concurrent callers at most one sees `true`, provided the
    /// backing store's `take` is atomic.
    pub async fn take(&self, key: PendingMarkerKey) -> Result<bool> {
        if self.store.take(&key.to_string()).await?.is_none() {
            return Ok(false);
        }
        debug!(content = %key.content, actor = %key.actor, "Pending marker consumed");
        Ok(true)
    }

    /// Drop the marker without reading it
    pub async fn clear(&self, key: PendingMarkerKey) -> Result<()> {
        self.store.delete(&key.to_string()).await
    }
}
