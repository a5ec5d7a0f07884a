//! Command implementations
//!
//! Each command returns a serializable report; `main` prints it.

use crate::fixture::{SaveStep, World};
use anyhow::Result;
use editgate_policy::{EditGateSettings, SaveDecision};
use editgate_types::{
    Actor, ContentId, ContentType, EditingMode, MessageKind, PendingSet, RevisionId,
    SaveAdmission,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
pub struct ConfigReport {
    pub marker_ttl_seconds: u64,
    pub content_types: BTreeMap<String, String>,
    pub warnings: Vec<String>,
}

pub fn check_config(settings: &EditGateSettings) -> ConfigReport {
    let warnings: Vec<String> = settings.validate().iter().map(ToString::to_string).collect();
    for warning in &warnings {
        warn!("{}", warning);
    }

    ConfigReport {
        marker_ttl_seconds: settings.marker_ttl_seconds,
        content_types: settings.content_types.clone(),
        warnings,
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveReport {
    pub content: ContentId,
    pub content_type: ContentType,
    pub type_enabled: bool,
    pub mode: EditingMode,
}

pub async fn resolve(world: &World, id: ContentId) -> Result<ResolveReport> {
    let item = world.gate.item(id).await?;
    let mode = world.gate.resolve_editing_mode(&item).await?;
    let enabled = world
        .gate
        .enabled_types(std::slice::from_ref(&item.content_type))
        .await?;

    Ok(ResolveReport {
        content: id,
        type_enabled: !enabled.is_empty(),
        content_type: item.content_type,
        mode,
    })
}

pub async fn pending(world: &World, id: ContentId) -> Result<PendingSet> {
    let item = world.gate.item(id).await?;
    Ok(world.gate.pending_revisions(&item).await?)
}

/// Result of replaying one save
#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub admission: SaveAdmission,

    /// Revision written by the host; absent when admission was blocked
    pub written: Option<RevisionId>,

    pub decision: SaveDecision,

    /// What the saving actor sees on the following view
    pub notice: MessageKind,

    pub pending_count: usize,
}

/// Replay saves in order through the host flow
pub async fn simulate(world: &World, saves: &[SaveStep]) -> Result<Vec<StepReport>> {
    let mut reports = Vec::with_capacity(saves.len());

    for (index, save) in saves.iter().enumerate() {
        let item = world.gate.item(save.content).await?;
        let actor = Actor::new(save.actor);

        let admission = world.gate.admit_save(&item, &actor).await?;
        let written = if admission.is_allowed() {
            let revision = world
                .content
                .record_revision(item.id, actor.id, save.at, false);
            Some(revision.id)
        } else {
            None
        };

        let decision = world
            .gate
            .decide(&item, &actor, save.explicit_pending)
            .await?;
        let notice = world.gate.context_for(&item, &actor).await?;
        let pending_count = world.gate.pending_count(&item).await?;

        info!(
            step = index + 1,
            content = %item.id,
            actor = %actor.id,
            outcome = decision.outcome.label(),
            "Replayed save"
        );

        reports.push(StepReport {
            step: index + 1,
            admission,
            written,
            decision,
            notice,
            pending_count,
        });
    }

    Ok(reports)
}
