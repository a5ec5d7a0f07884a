//! Pending revision detection
//!
//! A revision is pending when it is not transient and was created strictly
//! after the accepted revision. Items without an accepted pointer have no
//! pending set. A pointer that no longer resolves to a non-transient revision
//! of the item falls back to the item itself as the baseline.

use crate::error::Result;
use crate::storage::{ContentStore, PointerStore, RevisionQuery};
use editgate_types::{
    AcceptedRevision, AcceptedSource, ContentItem, PendingSet, Revision, RevisionId,
    RevisionMarking,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Detects revisions waiting for approval
#[derive(Clone)]
pub struct PendingRevisionDetector {
    content: Arc<dyn ContentStore>,
    pointers: Arc<dyn PointerStore>,
}

impl PendingRevisionDetector {
    /// Detector over a content store and its accepted pointers
    pub fn new(content: Arc<dyn ContentStore>, pointers: Arc<dyn PointerStore>) -> Self {
        Self { content, pointers }
    }

    /// The revision currently treated as authoritative
    pub async fn accepted_revision(&self, item: &ContentItem) -> Result<AcceptedRevision> {
        let own_id = RevisionId::from(item.id);
        let implicit = |source: AcceptedSource| AcceptedRevision {
            id: own_id,
            created_at: item.created_at,
            source,
        };

        let Some(pointer) = self.pointers.get(item.id).await? else {
            return Ok(implicit(AcceptedSource::Implicit));
        };

        if pointer == own_id {
            return Ok(implicit(AcceptedSource::Pointer));
        }

        match self.content.get_revision(pointer).await? {
            Some(revision) if revision.content_id == item.id && revision.transient => {
                warn!(
                    content = %item.id,
                    pointer = %pointer,
                    "Accepted pointer references an autosave revision"
                );
                Ok(implicit(AcceptedSource::DanglingFallback))
            }
            Some(revision) if revision.content_id == item.id => Ok(AcceptedRevision {
                id: revision.id,
                created_at: revision.created_at,
                source: AcceptedSource::Pointer,
            }),
            Some(revision) => {
                warn!(
                    content = %item.id,
                    pointer = %pointer,
                    owner = %revision.content_id,
                    "Accepted pointer references another item's revision"
                );
                Ok(implicit(AcceptedSource::DanglingFallback))
            }
            None => {
                warn!(
                    content = %item.id,
                    pointer = %pointer,
                    "Accepted pointer references a missing revision"
                );
                Ok(implicit(AcceptedSource::DanglingFallback))
            }
        }
    }

    /// Revisions newer than the accepted one, newest first
    pub async fn pending_revisions(&self, item: &ContentItem) -> Result<PendingSet> {
        let accepted = self.accepted_revision(item).await?;
        if !accepted.has_pointer() {
            return Ok(PendingSet::empty(accepted));
        }

        let query = RevisionQuery::new().after(accepted.created_at);
        let mut revisions: Vec<Revision> = self
            .content
            .get_revisions(item.id, &query)
            .await?
            .into_iter()
            .filter(|r| !r.transient && r.created_at > accepted.created_at)
            .collect();
        Revision::sort_newest_first(&mut revisions);

        debug!(
            content = %item.id,
            accepted = %accepted.id,
            pending = revisions.len(),
            "Detected pending revisions"
        );
        Ok(PendingSet {
            accepted,
            revisions,
        })
    }

    /// Number of pending revisions
    pub async fn pending_count(&self, item: &ContentItem) -> Result<usize> {
        Ok(self.pending_revisions(item).await?.len())
    }

    /// Newest non-transient revision of the item
    pub async fn latest_revision(&self, item: &ContentItem) -> Result<Option<Revision>> {
        let revisions = self
            .content
            .get_revisions(item.id, &RevisionQuery::new())
            .await?;
        Ok(revisions
            .into_iter()
            .filter(|r| !r.transient)
            .max_by(|a, b| a.cmp_recency(b)))
    }

    /// Flag each revision as accepted and/or pending
    pub async fn mark_revisions(
        &self,
        item: &ContentItem,
        revisions: &[Revision],
    ) -> Result<Vec<RevisionMarking>> {
        let pending = self.pending_revisions(item).await?;
        Ok(revisions
            .iter()
            .map(|r| RevisionMarking {
                revision: r.id,
                accepted: r.id == pending.accepted.id,
                pending: pending.contains(r.id),
            })
            .collect())
    }
}
