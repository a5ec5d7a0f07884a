//! EditGate service
//!
//! The entry point used by the host's admin layer. Wires the resolver, gate,
//! detector, engine and notification builder over one set of stores.

use crate::affordances::EditorAffordances;
use crate::config::EditGateSettings;
use crate::detector::PendingRevisionDetector;
use crate::engine::{SaveDecision, SaveDecisionEngine};
use crate::error::{EditGateError, Result};
use crate::gate::AccessGate;
use crate::markers::PendingMarkers;
use crate::notify::NotificationContextBuilder;
use crate::resolver::EditingModeResolver;
use crate::storage::{
    AuthorizationProvider, ContentStore, EphemeralStore, PointerStore, PolicyStore,
};
use editgate_types::{
    Actor, ContentId, ContentItem, ContentType, EditingMode, MessageKind, PendingSet, Revision,
    RevisionMarking, SaveAdmission,
};
use std::sync::Arc;
use std::time::Duration;

/// Editing policy service
#[derive(Clone)]
pub struct EditGate {
    content: Arc<dyn ContentStore>,
    resolver: EditingModeResolver,
    gate: AccessGate,
    detector: PendingRevisionDetector,
    engine: SaveDecisionEngine,
    notifications: NotificationContextBuilder,
}

impl EditGate {
    /// Start building a service
    pub fn builder() -> EditGateBuilder {
        EditGateBuilder::new()
    }

    /// Load an item, failing with `NotFound` if it does not exist
    pub async fn item(&self, id: ContentId) -> Result<ContentItem> {
        self.content
            .get_item(id)
            .await?
            .ok_or_else(|| EditGateError::content_not_found(id))
    }

    pub async fn resolve_editing_mode(&self, item: &ContentItem) -> Result<EditingMode> {
        self.resolver.resolve(item).await
    }

    pub async fn resolve_by_id(&self, id: ContentId) -> Result<EditingMode> {
        let item = self.item(id).await?;
        self.resolver.resolve(&item).await
    }

    pub async fn enabled_types(&self, candidates: &[ContentType]) -> Result<Vec<ContentType>> {
        self.resolver.enabled_types(candidates).await
    }

    /// Validate and store an item's editing mode; unrecognized values are ignored
    pub async fn save_item_mode(&self, id: ContentId, raw: &str) -> Result<bool> {
        self.resolver.save_item_mode(id, raw).await
    }

    pub async fn admit_save(&self, item: &ContentItem, actor: &Actor) -> Result<SaveAdmission> {
        self.engine.admit_save(item, actor).await
    }

    pub async fn decide(
        &self,
        item: &ContentItem,
        actor: &Actor,
        explicit_pending: bool,
    ) -> Result<SaveDecision> {
        self.engine.decide(item, actor, explicit_pending).await
    }

    pub async fn pending_revisions(&self, item: &ContentItem) -> Result<PendingSet> {
        self.detector.pending_revisions(item).await
    }

    pub async fn pending_count(&self, item: &ContentItem) -> Result<usize> {
        self.detector.pending_count(item).await
    }

    pub async fn mark_revisions(
        &self,
        item: &ContentItem,
        revisions: &[Revision],
    ) -> Result<Vec<RevisionMarking>> {
        self.detector.mark_revisions(item, revisions).await
    }

    pub async fn context_for(&self, item: &ContentItem, actor: &Actor) -> Result<MessageKind> {
        self.notifications.context_for(item, actor).await
    }

    /// Editing controls to offer this actor
    pub async fn affordances(&self, item: &ContentItem, actor: &Actor) -> Result<EditorAffordances> {
        let mode = self.resolver.resolve(item).await?;
        let type_enabled = self.resolver.is_enabled(&item.content_type).await?;
        let can_approve = self.gate.can_approve(actor, item).await?;
        Ok(EditorAffordances::derive(
            mode,
            type_enabled,
            can_approve,
            item.is_published(),
        ))
    }
}

/// Builder for EditGate
pub struct EditGateBuilder {
    content: Option<Arc<dyn ContentStore>>,
    policies: Option<Arc<dyn PolicyStore>>,
    pointers: Option<Arc<dyn PointerStore>>,
    ephemeral: Option<Arc<dyn EphemeralStore>>,
    authorization: Option<Arc<dyn AuthorizationProvider>>,
    marker_ttl: Option<Duration>,
}

impl EditGateBuilder {
    /// Builder with no components; every store is required before `build`
    pub fn new() -> Self {
        Self {
            content: None,
            policies: None,
            pointers: None,
            ephemeral: None,
            authorization: None,
            marker_ttl: None,
        }
    }

    pub fn content_store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.content = Some(store);
        self
    }

    pub fn policy_store(mut self, store: Arc<dyn PolicyStore>) -> Self {
        self.policies = Some(store);
        self
    }

    pub fn pointer_store(mut self, store: Arc<dyn PointerStore>) -> Self {
        self.pointers = Some(store);
        self
    }

    pub fn ephemeral_store(mut self, store: Arc<dyn EphemeralStore>) -> Self {
        self.ephemeral = Some(store);
        self
    }

    pub fn authorization(mut self, provider: Arc<dyn AuthorizationProvider>) -> Self {
        self.authorization = Some(provider);
        self
    }

    /// Lifetime of pending markers
    pub fn marker_ttl(mut self, ttl: Duration) -> Self {
        self.marker_ttl = Some(ttl);
        self
    }

    /// Apply settings that affect the service itself
    pub fn with_settings(self, settings: &EditGateSettings) -> Self {
        self.marker_ttl(settings.marker_ttl())
    }

    pub fn build(self) -> Result<EditGate> {
        let content = required(self.content, "content store")?;
        let policies = required(self.policies, "policy store")?;
        let pointers = required(self.pointers, "pointer store")?;
        let ephemeral = required(self.ephemeral, "ephemeral store")?;
        let authorization = required(self.authorization, "authorization provider")?;

        let resolver = EditingModeResolver::new(policies);
        let gate = AccessGate::new(authorization);
        let detector = PendingRevisionDetector::new(Arc::clone(&content), Arc::clone(&pointers));

        let mut markers = PendingMarkers::new(ephemeral);
        if let Some(ttl) = self.marker_ttl {
            markers = markers.with_ttl(ttl);
        }

        let engine = SaveDecisionEngine::new(
            resolver.clone(),
            gate.clone(),
            detector.clone(),
            Arc::clone(&content),
            pointers,
            markers.clone(),
        );
        let notifications =
            NotificationContextBuilder::new(resolver.clone(), gate.clone(), detector.clone(), markers);

        Ok(EditGate {
            content,
            resolver,
            gate,
            detector,
            engine,
            notifications,
        })
    }
}

impl Default for EditGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn required<T>(component: Option<T>, name: &str) -> Result<T> {
    component.ok_or_else(|| EditGateError::MissingComponent {
        component: name.to_string(),
    })
}
