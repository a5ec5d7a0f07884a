//! Notification context
//!
//! Picks the one advisory message that applies to an actor viewing an item.
//! Rules are evaluated per view, first match wins.

use crate::detector::PendingRevisionDetector;
use crate::error::Result;
use crate::gate::AccessGate;
use crate::markers::{PendingMarkerKey, PendingMarkers};
use crate::resolver::EditingModeResolver;
use editgate_types::{Actor, ContentItem, EditingMode, MessageKind};
use tracing::debug;

/// Selects advisory messages for a view
#[derive(Clone)]
pub struct NotificationContextBuilder {
    resolver: EditingModeResolver,
    gate: AccessGate,
    detector: PendingRevisionDetector,
    markers: PendingMarkers,
}

impl NotificationContextBuilder {
    pub fn new(
        resolver: EditingModeResolver,
        gate: AccessGate,
        detector: PendingRevisionDetector,
        markers: PendingMarkers,
    ) -> Self {
        Self {
            resolver,
            gate,
            detector,
            markers,
        }
    }

    /// Message kind for this view; consumes a pending marker if one is set
    pub async fn context_for(&self, item: &ContentItem, actor: &Actor) -> Result<MessageKind> {
        let kind = self.select(item, actor).await?;
        debug!(content = %item.id, actor = %actor.id, kind = ?kind, "Selected notice");
        Ok(kind)
    }

    async fn select(&self, item: &ContentItem, actor: &Actor) -> Result<MessageKind> {
        if let Some(key) = PendingMarkerKey::new(item.id, actor.id) {
            if self.markers.take(key).await? {
                let target = self.detector.accepted_revision(item).await?.id;
                return Ok(MessageKind::JustFiledAsPending { target });
            }
        }

        let can_approve = self.gate.can_approve(actor, item).await?;
        if !can_approve {
            match self.resolver.resolve(item).await? {
                EditingMode::ApprovalRequired => return Ok(MessageKind::RequiresApprovalNotice),
                EditingMode::Locked => return Ok(MessageKind::LockedNotice),
                _ => {}
            }
        }

        let pending = self.detector.pending_revisions(item).await?;
        let Some(diff) = pending.diff_target() else {
            return Ok(MessageKind::None);
        };

        let latest = self.detector.latest_revision(item).await?;
        match latest {
            Some(latest) if latest.id != pending.accepted.id => {
                Ok(MessageKind::DivergedFromAcceptedNotice {
                    diff,
                    viewer_can_approve: can_approve,
                })
            }
            _ => Ok(MessageKind::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        InMemoryContentStore, InMemoryEphemeralStore, InMemoryPointerStore, InMemoryPolicyStore,
        StaticAuthorization,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use editgate_types::{ActorId, ContentId, ContentType, DiffTarget, RevisionId};
    use std::sync::Arc;

    const EDITOR: ActorId = ActorId::new(2);
    const CONTRIBUTOR: ActorId = ActorId::new(3);

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    struct Harness {
        content: Arc<InMemoryContentStore>,
        pointers: Arc<InMemoryPointerStore>,
        markers: PendingMarkers,
        builder: NotificationContextBuilder,
        item: ContentItem,
    }

    fn harness(type_default: &str) -> Harness {
        let content = Arc::new(InMemoryContentStore::new());
        let policies = Arc::new(InMemoryPolicyStore::new());
        let pointers = Arc::new(InMemoryPointerStore::new());
        let auth = Arc::new(StaticAuthorization::new());
        auth.grant_all(EDITOR);
        policies.set_type_default(ContentType::new("post"), type_default);

        let item = ContentItem::new(ContentId::new(1), "post", at(100));
        content.insert_item(item.clone());

        let markers = PendingMarkers::new(Arc::new(InMemoryEphemeralStore::new()));
        let builder = NotificationContextBuilder::new(
            EditingModeResolver::new(policies),
            AccessGate::new(auth),
            PendingRevisionDetector::new(content.clone(), pointers.clone()),
            markers.clone(),
        );

        Harness {
            content,
            pointers,
            markers,
            builder,
            item,
        }
    }

    #[tokio::test]
    async fn test_marker_wins_and_is_consumed() {
        let h = harness("approval-required");
        let key = PendingMarkerKey::new(h.item.id, CONTRIBUTOR).unwrap();
        h.markers.set(key).await.unwrap();
        let actor = Actor::new(CONTRIBUTOR);

        let first = h.builder.context_for(&h.item, &actor).await.unwrap();
        assert_eq!(
            first,
            MessageKind::JustFiledAsPending {
                target: RevisionId::new(1)
            }
        );

        let second = h.builder.context_for(&h.item, &actor).await.unwrap();
        assert_eq!(second, MessageKind::RequiresApprovalNotice);
    }

    #[tokio::test]
    async fn test_locked_notice_for_non_approver() {
        let h = harness("locked");
        let kind = h
            .builder
            .context_for(&h.item, &Actor::new(CONTRIBUTOR))
            .await
            .unwrap();
        assert_eq!(kind, MessageKind::LockedNotice);
    }

    #[tokio::test]
    async fn test_approver_sees_nothing_without_divergence() {
        let h = harness("locked");
        let kind = h
            .builder
            .context_for(&h.item, &Actor::new(EDITOR))
            .await
            .unwrap();
        assert!(kind.is_none());
    }

    #[tokio::test]
    async fn test_divergence_notice() {
        let h = harness("open");
        let accepted = h.content.record_revision(h.item.id, EDITOR, at(200), false);
        let pending = h.content.record_revision(h.item.id, CONTRIBUTOR, at(300), false);
        h.pointers.set(h.item.id, accepted.id);

        let expected_diff = DiffTarget {
            from: accepted.id,
            to: pending.id,
        };

        let editor_view = h
            .builder
            .context_for(&h.item, &Actor::new(EDITOR))
            .await
            .unwrap();
        assert_eq!(
            editor_view,
            MessageKind::DivergedFromAcceptedNotice {
                diff: expected_diff,
                viewer_can_approve: true,
            }
        );

        let contributor_view = h
            .builder
            .context_for(&h.item, &Actor::new(CONTRIBUTOR))
            .await
            .unwrap();
        assert_eq!(
            contributor_view,
            MessageKind::DivergedFromAcceptedNotice {
                diff: expected_diff,
                viewer_can_approve: false,
            }
        );
    }

    #[tokio::test]
    async fn test_only_transient_newer_revisions_is_not_divergence() {
        let h = harness("open");
        let accepted = h.content.record_revision(h.item.id, EDITOR, at(200), false);
        h.content.record_revision(h.item.id, EDITOR, at(300), true);
        h.pointers.set(h.item.id, accepted.id);

        let kind = h
            .builder
            .context_for(&h.item, &Actor::new(EDITOR))
            .await
            .unwrap();
        assert!(kind.is_none());
    }
}
