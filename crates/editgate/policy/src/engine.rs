//! Save decision engine
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. Locked and the actor cannot approve: rejected, nothing is written.
//! 2. A pending marker is set for every save that gets past rule 1.
//! 3. Gated mode and the actor cannot approve: filed as pending.
//! 4. The actor asked to submit a suggestion: filed as pending.
//! 5. Otherwise the actor's newest revision becomes the accepted one and the
//!    marker is cleared.
//!
//! Hosts call [`SaveDecisionEngine::admit_save`] before writing (rule 1 only)
//! and [`SaveDecisionEngine::decide`] once the new revision exists.

use crate::detector::PendingRevisionDetector;
use crate::error::Result;
use crate::gate::AccessGate;
use crate::markers::{PendingMarkerKey, PendingMarkers};
use crate::resolver::EditingModeResolver;
use crate::storage::{ContentStore, PointerStore, RevisionQuery};
use chrono::{DateTime, Utc};
use editgate_types::{
    Actor, ActorId, ContentId, ContentItem, EditingMode, PendingReason, PointerUpdate, Revision,
    RevisionId, SaveAdmission, SaveOutcome,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Rule that decided a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveRule {
    LockedWithoutApproval,
    RequiresApproval,
    ExplicitPending,
    Accept,
}

impl SaveRule {
    /// Pure rule table
    pub fn classify(mode: EditingMode, can_approve: bool, explicit_pending: bool) -> Self {
        if mode == EditingMode::Locked && !can_approve {
            Self::LockedWithoutApproval
        } else if mode.is_gated() && !can_approve {
            Self::RequiresApproval
        } else if explicit_pending {
            Self::ExplicitPending
        } else {
            Self::Accept
        }
    }
}

/// Audit card for a save decision
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDecision {
    /// Unique identifier for this decision
    pub id: String,

    /// Item being saved
    pub content_id: ContentId,

    /// Actor performing the save
    pub actor_id: ActorId,

    /// Effective mode at decision time
    pub mode: EditingMode,

    /// Capability as seen by every rule of this decision
    pub can_approve: bool,

    /// Actor asked to file the save as a suggestion
    pub explicit_pending: bool,

    /// Rule that matched
    pub rule: SaveRule,

    /// What the save became
    pub outcome: SaveOutcome,

    /// When the decision was made
    pub decided_at: DateTime<Utc>,
}

/// Save-time state machine
#[derive(Clone)]
pub struct SaveDecisionEngine {
    resolver: EditingModeResolver,
    gate: AccessGate,
    detector: PendingRevisionDetector,
    content: Arc<dyn ContentStore>,
    pointers: Arc<dyn PointerStore>,
    markers: PendingMarkers,
}

impl SaveDecisionEngine {
    /// Assemble an engine from its collaborators
    pub fn new(
        resolver: EditingModeResolver,
        gate: AccessGate,
        detector: PendingRevisionDetector,
        content: Arc<dyn ContentStore>,
        pointers: Arc<dyn PointerStore>,
        markers: PendingMarkers,
    ) -> Self {
        Self {
            resolver,
            gate,
            detector,
            content,
            pointers,
            markers,
        }
    }

    /// Pre-write check: may this save be persisted at all?
    pub async fn admit_save(&self, item: &ContentItem, actor: &Actor) -> Result<SaveAdmission> {
        let mode = self.resolver.resolve(item).await?;
        if mode != EditingMode::Locked {
            return Ok(SaveAdmission::Allowed);
        }

        if self.gate.can_approve(actor, item).await? {
            Ok(SaveAdmission::Allowed)
        } else {
            warn!(
                content = %item.id,
                actor = %actor.id,
                "Save blocked: item locked"
            );
            Ok(SaveAdmission::Blocked { mode })
        }
    }

    /// Decide what a save attempt becomes
    pub async fn decide(
        &self,
        item: &ContentItem,
        actor: &Actor,
        explicit_pending: bool,
    ) -> Result<SaveDecision> {
        let mode = self.resolver.resolve(item).await?;
        let can_approve = self.gate.can_approve(actor, item).await?;
        let rule = SaveRule::classify(mode, can_approve, explicit_pending);

        debug!(
            content = %item.id,
            actor = %actor.id,
            mode = %mode,
            can_approve,
            explicit_pending,
            rule = ?rule,
            "Deciding save"
        );

        let outcome = match rule {
            SaveRule::LockedWithoutApproval => {
                warn!(
                    content = %item.id,
                    actor = %actor.id,
                    "Save rejected: item locked"
                );
                SaveOutcome::Rejected { mode }
            }
            SaveRule::RequiresApproval | SaveRule::ExplicitPending => {
                self.mark_pending(item, actor).await?;
                let reason = if rule == SaveRule::RequiresApproval {
                    PendingReason::RequiresApproval
                } else {
                    PendingReason::ExplicitRequest
                };
                let accepted = self.detector.accepted_revision(item).await?.id;
                info!(
                    content = %item.id,
                    actor = %actor.id,
                    reason = ?reason,
                    accepted = %accepted,
                    "Save filed as pending"
                );
                SaveOutcome::FiledAsPending { reason, accepted }
            }
            SaveRule::Accept => {
                self.mark_pending(item, actor).await?;
                self.accept(item, actor).await?
            }
        };

        Ok(SaveDecision {
            id: uuid::Uuid::new_v4().to_string(),
            content_id: item.id,
            actor_id: actor.id,
            mode,
            can_approve,
            explicit_pending,
            rule,
            outcome,
            decided_at: Utc::now(),
        })
    }

    async fn mark_pending(&self, item: &ContentItem, actor: &Actor) -> Result<()> {
        match PendingMarkerKey::new(item.id, actor.id) {
            Some(key) => self.markers.set(key).await,
            None => {
                debug!(content = %item.id, actor = %actor.id, "No marker for unsaved item or anonymous actor");
                Ok(())
            }
        }
    }

    async fn accept(&self, item: &ContentItem, actor: &Actor) -> Result<SaveOutcome> {
        let Some(revision) = self.newest_revision_by(item, actor).await? else {
            // Marker stays: nothing was accepted.
            debug!(
                content = %item.id,
                actor = %actor.id,
                "No revision by actor; accepted pointer left unchanged"
            );
            return Ok(SaveOutcome::AcceptedAndPublished {
                revision: None,
                pointer: PointerUpdate::Skipped,
            });
        };

        let pointer = self.advance_pointer(item.id, revision.id).await?;

        if let Some(key) = PendingMarkerKey::new(item.id, actor.id) {
            self.markers.clear(key).await?;
        }

        info!(
            content = %item.id,
            actor = %actor.id,
            revision = %revision.id,
            pointer = ?pointer,
            "Save accepted"
        );
        Ok(SaveOutcome::AcceptedAndPublished {
            revision: Some(revision.id),
            pointer,
        })
    }

    async fn newest_revision_by(&self, item: &ContentItem, actor: &Actor) -> Result<Option<Revision>> {
        let query = RevisionQuery::new().by_author(actor.id);
        let revisions = self.content.get_revisions(item.id, &query).await?;
        Ok(revisions
            .into_iter()
            .filter(|r| !r.transient && r.author == actor.id && r.content_id == item.id)
            .max_by(|a, b| a.cmp_recency(b)))
    }

    async fn advance_pointer(&self, content: ContentId, revision: RevisionId) -> Result<PointerUpdate> {
        let current = self.pointers.get(content).await?;
        if current == Some(revision) {
            return Ok(PointerUpdate::Unchanged);
        }

        if self
            .pointers
            .compare_and_set(content, current, revision)
            .await?
        {
            Ok(PointerUpdate::Advanced)
        } else {
            warn!(
                content = %content,
                revision = %revision,
                "Accepted pointer changed concurrently; keeping the other writer's value"
            );
            Ok(PointerUpdate::Superseded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        EphemeralStore, InMemoryContentStore, InMemoryEphemeralStore, InMemoryPointerStore,
        InMemoryPolicyStore, StaticAuthorization,
    };
    use chrono::TimeZone;
    use editgate_types::{ContentStatus, ContentType};
    use proptest::prelude::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    const EDITOR: ActorId = ActorId::new(2);
    const CONTRIBUTOR: ActorId = ActorId::new(3);

    struct Harness {
        content: Arc<InMemoryContentStore>,
        policies: Arc<InMemoryPolicyStore>,
        pointers: Arc<InMemoryPointerStore>,
        ephemeral: Arc<InMemoryEphemeralStore>,
        engine: SaveDecisionEngine,
        item: ContentItem,
    }

    fn harness(type_default: &str) -> Harness {
        let content = Arc::new(InMemoryContentStore::new());
        let policies = Arc::new(InMemoryPolicyStore::new());
        let pointers = Arc::new(InMemoryPointerStore::new());
        let ephemeral = Arc::new(InMemoryEphemeralStore::new());
        let auth = Arc::new(StaticAuthorization::new());
        auth.grant_all(EDITOR);
        policies.set_type_default(ContentType::new("post"), type_default);

        let item = ContentItem::new(ContentId::new(1), "post", at(100))
            .with_status(ContentStatus::Published);
        content.insert_item(item.clone());

        let detector = PendingRevisionDetector::new(content.clone(), pointers.clone());
        let engine = SaveDecisionEngine::new(
            EditingModeResolver::new(policies.clone()),
            AccessGate::new(auth),
            detector,
            content.clone(),
            pointers.clone(),
            PendingMarkers::new(ephemeral.clone()),
        );

        Harness {
            content,
            policies,
            pointers,
            ephemeral,
            engine,
            item,
        }
    }

    fn marker_key(actor: ActorId) -> String {
        PendingMarkerKey::new(ContentId::new(1), actor)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_rule_table() {
        use EditingMode::*;
        assert_eq!(SaveRule::classify(Locked, false, false), SaveRule::LockedWithoutApproval);
        assert_eq!(SaveRule::classify(Locked, false, true), SaveRule::LockedWithoutApproval);
        assert_eq!(SaveRule::classify(Locked, true, false), SaveRule::Accept);
        assert_eq!(SaveRule::classify(ApprovalRequired, false, false), SaveRule::RequiresApproval);
        assert_eq!(SaveRule::classify(ApprovalRequired, false, true), SaveRule::RequiresApproval);
        assert_eq!(SaveRule::classify(ApprovalRequired, true, true), SaveRule::ExplicitPending);
        assert_eq!(SaveRule::classify(Open, false, false), SaveRule::Accept);
        assert_eq!(SaveRule::classify(Open, false, true), SaveRule::ExplicitPending);
        assert_eq!(SaveRule::classify(Off, false, false), SaveRule::RequiresApproval);
    }

    proptest! {
        #[test]
        fn prop_locked_without_approval_always_rejected(explicit in any::<bool>()) {
            prop_assert_eq!(
                SaveRule::classify(EditingMode::Locked, false, explicit),
                SaveRule::LockedWithoutApproval
            );
        }

        #[test]
        fn prop_approvers_never_need_approval(index in 0usize..4, explicit in any::<bool>()) {
            let rule = SaveRule::classify(EditingMode::ALL[index], true, explicit);
            let expected = if explicit { SaveRule::ExplicitPending } else { SaveRule::Accept };
            prop_assert_eq!(rule, expected);
        }
    }

    #[tokio::test]
    async fn test_open_capable_accepts() {
        let h = harness("open");
        let revision = h.content.record_revision(h.item.id, EDITOR, at(200), false);

        let decision = h.engine.decide(&h.item, &Actor::new(EDITOR), false).await.unwrap();

        assert_eq!(
            decision.outcome,
            SaveOutcome::AcceptedAndPublished {
                revision: Some(revision.id),
                pointer: PointerUpdate::Advanced,
            }
        );
        assert_eq!(h.pointers.get(h.item.id).await.unwrap(), Some(revision.id));
        assert!(h.ephemeral.get(&marker_key(EDITOR)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_mode_accepts_without_capability() {
        let h = harness("open");
        let revision = h.content.record_revision(h.item.id, CONTRIBUTOR, at(200), false);

        let decision = h
            .engine
            .decide(&h.item, &Actor::new(CONTRIBUTOR), false)
            .await
            .unwrap();

        assert!(!decision.can_approve);
        assert_eq!(decision.outcome.accepted_revision(), Some(revision.id));
    }

    #[tokio::test]
    async fn test_approval_required_files_pending() {
        let h = harness("approval-required");
        let accepted = h.content.record_revision(h.item.id, EDITOR, at(150), false);
        h.pointers.set(h.item.id, accepted.id);
        h.content.record_revision(h.item.id, CONTRIBUTOR, at(200), false);

        let decision = h
            .engine
            .decide(&h.item, &Actor::new(CONTRIBUTOR), false)
            .await
            .unwrap();

        assert_eq!(
            decision.outcome,
            SaveOutcome::FiledAsPending {
                reason: PendingReason::RequiresApproval,
                accepted: accepted.id,
            }
        );
        assert_eq!(h.pointers.get(h.item.id).await.unwrap(), Some(accepted.id));
        assert!(h.ephemeral.get(&marker_key(CONTRIBUTOR)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_explicit_pending_keeps_pointer() {
        let h = harness("approval-required");
        h.content.record_revision(h.item.id, EDITOR, at(200), false);

        let decision = h.engine.decide(&h.item, &Actor::new(EDITOR), true).await.unwrap();

        assert_eq!(decision.rule, SaveRule::ExplicitPending);
        assert_eq!(
            decision.outcome,
            SaveOutcome::FiledAsPending {
                reason: PendingReason::ExplicitRequest,
                accepted: RevisionId::new(1),
            }
        );
        assert!(h.pointers.get(h.item.id).await.unwrap().is_none());
        assert!(h.ephemeral.get(&marker_key(EDITOR)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_locked_rejects_without_side_effects() {
        let h = harness("locked");

        let admission = h
            .engine
            .admit_save(&h.item, &Actor::new(CONTRIBUTOR))
            .await
            .unwrap();
        assert_eq!(
            admission,
            SaveAdmission::Blocked {
                mode: EditingMode::Locked
            }
        );

        let decision = h
            .engine
            .decide(&h.item, &Actor::new(CONTRIBUTOR), false)
            .await
            .unwrap();
        assert!(decision.outcome.is_rejected());
        assert!(h.ephemeral.is_empty());
        assert!(h.pointers.get(h.item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_locked_allows_approver() {
        let h = harness("locked");
        let admission = h.engine.admit_save(&h.item, &Actor::new(EDITOR)).await.unwrap();
        assert!(admission.is_allowed());
    }

    #[tokio::test]
    async fn test_item_override_locks_item() {
        let h = harness("open");
        h.policies.set_raw_override(h.item.id, "locked");

        let decision = h
            .engine
            .decide(&h.item, &Actor::new(CONTRIBUTOR), false)
            .await
            .unwrap();
        assert_eq!(decision.mode, EditingMode::Locked);
        assert!(decision.outcome.is_rejected());
    }

    #[tokio::test]
    async fn test_accept_ignores_transient_and_other_authors() {
        let h = harness("open");
        let own = h.content.record_revision(h.item.id, EDITOR, at(200), false);
        h.content.record_revision(h.item.id, EDITOR, at(300), true);
        h.content.record_revision(h.item.id, CONTRIBUTOR, at(400), false);

        let decision = h.engine.decide(&h.item, &Actor::new(EDITOR), false).await.unwrap();
        assert_eq!(decision.outcome.accepted_revision(), Some(own.id));
    }

    #[tokio::test]
    async fn test_accept_without_revision_is_noop() {
        let h = harness("open");

        let decision = h.engine.decide(&h.item, &Actor::new(EDITOR), false).await.unwrap();

        assert_eq!(
            decision.outcome,
            SaveOutcome::AcceptedAndPublished {
                revision: None,
                pointer: PointerUpdate::Skipped,
            }
        );
        assert!(h.pointers.get(h.item.id).await.unwrap().is_none());
        assert!(h.ephemeral.get(&marker_key(EDITOR)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_accept_twice_is_idempotent() {
        let h = harness("open");
        let revision = h.content.record_revision(h.item.id, EDITOR, at(200), false);
        let actor = Actor::new(EDITOR);

        let first = h.engine.decide(&h.item, &actor, false).await.unwrap();
        let second = h.engine.decide(&h.item, &actor, false).await.unwrap();

        assert_eq!(
            first.outcome,
            SaveOutcome::AcceptedAndPublished {
                revision: Some(revision.id),
                pointer: PointerUpdate::Advanced,
            }
        );
        assert_eq!(
            second.outcome,
            SaveOutcome::AcceptedAndPublished {
                revision: Some(revision.id),
                pointer: PointerUpdate::Unchanged,
            }
        );
        assert_eq!(h.pointers.get(h.item.id).await.unwrap(), Some(revision.id));
    }

    #[tokio::test]
    async fn test_anonymous_actor_sets_no_marker() {
        let h = harness("approval-required");
        let decision = h
            .engine
            .decide(&h.item, &Actor::new(ActorId::new(0)), false)
            .await
            .unwrap();
        assert!(decision.outcome.is_pending());
        assert!(h.ephemeral.is_empty());
    }
}
