//! Editing mode resolution
//!
//! Combines the content type default with the item override into one
//! effective mode. A type default of `off` (or anything unrecognized) turns
//! the policy off for the whole type: the effective mode is `open` and item
//! overrides are never read.

use crate::error::Result;
use crate::storage::PolicyStore;
use editgate_types::{ContentId, ContentItem, ContentType, EditingMode};
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves the effective editing mode of content items
#[derive(Clone)]
pub struct EditingModeResolver {
    policies: Arc<dyn PolicyStore>,
}

impl EditingModeResolver {
    /// Resolver reading modes from a policy store
    pub fn new(policies: Arc<dyn PolicyStore>) -> Self {
        Self { policies }
    }

    /// Type default when the policy is enabled for the type
    pub async fn enabled_default(&self, content_type: &ContentType) -> Result<Option<EditingMode>> {
        let raw = self.policies.get_type_default_mode(content_type).await?;
        let mode = raw.as_deref().and_then(EditingMode::parse);
        Ok(mode.filter(|mode| *mode != EditingMode::Off))
    }

    /// Is the editing policy enabled for a content type?
    pub async fn is_enabled(&self, content_type: &ContentType) -> Result<bool> {
        Ok(self.enabled_default(content_type).await?.is_some())
    }

    /// Subset of the candidate types that have the policy enabled
    pub async fn enabled_types(&self, candidates: &[ContentType]) -> Result<Vec<ContentType>> {
        let mut enabled = Vec::new();
        for content_type in candidates {
            if self.is_enabled(content_type).await? {
                enabled.push(content_type.clone());
            }
        }
        Ok(enabled)
    }

    /// Effective editing mode of an item
    pub async fn resolve(&self, item: &ContentItem) -> Result<EditingMode> {
        let Some(default) = self.enabled_default(&item.content_type).await? else {
            debug!(
                content = %item.id,
                content_type = %item.content_type,
                "Editing policy off for content type"
            );
            return Ok(EditingMode::Open);
        };

        let raw = self.policies.get_item_override_mode(item.id).await?;
        let mode = match raw.as_deref().and_then(EditingMode::parse) {
            Some(mode) => mode,
            None => default,
        };

        debug!(
            content = %item.id,
            content_type = %item.content_type,
            mode = %mode,
            "Resolved editing mode"
        );
        Ok(mode)
    }

    /// Store an item override if the value is a recognized mode.
    ///
    /// Unrecognized values are ignored; returns whether anything was written.
    pub async fn save_item_mode(&self, id: ContentId, raw: &str) -> Result<bool> {
        let Some(mode) = EditingMode::parse(raw) else {
            debug!(content = %id, value = %raw, "Ignoring unrecognized editing mode");
            return Ok(false);
        };

        self.policies.set_item_override_mode(id, mode).await?;
        info!(content = %id, mode = %mode, "Editing mode override saved");
        Ok(true)
    }
}
