//! Access gate
//!
//! The single place approval capability is checked. Decisions and views ask
//! the gate once and reuse the answer for every rule they evaluate.

use crate::error::Result;
use crate::storage::AuthorizationProvider;
use editgate_types::{Actor, ContentItem};
use std::sync::Arc;
use tracing::debug;

/// Approval capability check scoped to a content item
#[derive(Clone)]
pub struct AccessGate {
    authorization: Arc<dyn AuthorizationProvider>,
}

impl AccessGate {
    pub fn new(authorization: Arc<dyn AuthorizationProvider>) -> Self {
        Self { authorization }
    }

    /// Can the actor approve changes to this item directly?
    pub async fn can_approve(&self, actor: &Actor, item: &ContentItem) -> Result<bool> {
        let allowed = self.authorization.can_approve(actor.id, item.id).await?;
        debug!(
            actor = %actor.id,
            content = %item.id,
            can_approve = allowed,
            "Checked approval capability"
        );
        Ok(allowed)
    }
}
