//! World fixtures
//!
//! A fixture describes a small content store in TOML: items, their revision
//! history, approver grants, item overrides, accepted pointers and a list of
//! saves to replay. Timestamps are quoted RFC 3339 strings.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use editgate_policy::storage::{
    InMemoryContentStore, InMemoryEphemeralStore, InMemoryPointerStore, InMemoryPolicyStore,
    StaticAuthorization,
};
use editgate_policy::{EditGate, EditGateSettings};
use editgate_types::{ActorId, ContentId, ContentItem, ContentStatus, ContentType, Revision, RevisionId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Parsed fixture file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub items: Vec<ItemFixture>,

    #[serde(default)]
    pub revisions: Vec<RevisionFixture>,

    /// Actors allowed to approve every item
    #[serde(default)]
    pub approvers: Vec<ActorId>,

    #[serde(default)]
    pub grants: Vec<GrantFixture>,

    /// Raw per-item modes; unrecognized values are kept as-is
    #[serde(default)]
    pub overrides: Vec<OverrideFixture>,

    #[serde(default)]
    pub pointers: Vec<PointerFixture>,

    #[serde(default)]
    pub saves: Vec<SaveStep>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemFixture {
    pub id: ContentId,
    pub content_type: String,
    #[serde(default)]
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevisionFixture {
    pub id: RevisionId,
    pub content: ContentId,
    pub author: ActorId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub transient: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantFixture {
    pub actor: ActorId,
    pub content: ContentId,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideFixture {
    pub content: ContentId,
    pub mode: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointerFixture {
    pub content: ContentId,
    pub revision: RevisionId,
}

/// One host save to replay
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveStep {
    pub content: ContentId,
    pub actor: ActorId,
    pub at: DateTime<Utc>,
    #[serde(default)]
    pub explicit_pending: bool,
}

impl Fixture {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("parsing fixture {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let fixture: Self = toml::from_str(contents)?;
        fixture.check()?;
        Ok(fixture)
    }

    /// Every revision, grant, override and save must name a declared item.
    /// Pointers may dangle.
    fn check(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for item in &self.items {
            if item.id.is_unset() {
                bail!("item id 0 is reserved");
            }
            if !ids.insert(item.id) {
                bail!("item {} is declared twice", item.id);
            }
        }

        let known = |content: ContentId, what: &str| -> Result<()> {
            if ids.contains(&content) {
                Ok(())
            } else {
                bail!("{} refers to unknown item {}", what, content)
            }
        };
        for revision in &self.revisions {
            if ids.contains(&ContentId::new(revision.id.get())) {
                bail!("revision {} collides with an item id", revision.id);
            }
            known(revision.content, "revision")?;
        }
        for grant in &self.grants {
            known(grant.content, "grant")?;
        }
        for entry in &self.overrides {
            known(entry.content, "override")?;
        }
        for save in &self.saves {
            known(save.content, "save")?;
        }
        Ok(())
    }
}

/// In-memory stores seeded from a fixture, with the service on top
pub struct World {
    pub gate: EditGate,
    pub content: Arc<InMemoryContentStore>,
}

impl World {
    pub fn seed(fixture: &Fixture, settings: &EditGateSettings) -> Result<Self> {
        let content = Arc::new(InMemoryContentStore::new());
        let policies = Arc::new(InMemoryPolicyStore::from_settings(settings));
        let pointers = Arc::new(InMemoryPointerStore::new());
        let authorization = Arc::new(StaticAuthorization::new());

        for item in &fixture.items {
            let mut seeded =
                ContentItem::new(item.id, ContentType::new(item.content_type.as_str()), item.created_at)
                    .with_status(item.status);
            if let Some(updated_at) = item.updated_at {
                seeded.updated_at = updated_at;
            }
            content.insert_item(seeded);
        }
        for revision in &fixture.revisions {
            let mut seeded =
                Revision::new(revision.id, revision.content, revision.author, revision.created_at);
            seeded.transient = revision.transient;
            content.insert_revision(seeded);
        }
        for actor in &fixture.approvers {
            authorization.grant_all(*actor);
        }
        for grant in &fixture.grants {
            authorization.grant(grant.actor, grant.content);
        }
        for entry in &fixture.overrides {
            policies.set_raw_override(entry.content, entry.mode.as_str());
        }
        for pointer in &fixture.pointers {
            pointers.set(pointer.content, pointer.revision);
        }

        debug!(
            items = fixture.items.len(),
            revisions = fixture.revisions.len(),
            "Seeded world"
        );

        let gate = EditGate::builder()
            .content_store(content.clone())
            .policy_store(policies)
            .pointer_store(pointers)
            .ephemeral_store(Arc::new(InMemoryEphemeralStore::new()))
            .authorization(authorization)
            .with_settings(settings)
            .build()?;

        Ok(Self { gate, content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: &str = r#"
approvers = [2]

[[items]]
id = 1
content_type = "post"
status = "published"
created_at = "2024-01-01T00:00:00Z"

[[revisions]]
id = 10
content = 1
author = 2
created_at = "2024-01-02T00:00:00Z"

[[pointers]]
content = 1
revision = 10

[[overrides]]
content = 1
mode = "locked"
"#;

    #[test]
    fn test_parse_world() {
        let fixture = Fixture::from_toml_str(WORLD).unwrap();
        assert_eq!(fixture.items.len(), 1);
        assert_eq!(fixture.items[0].status, ContentStatus::Published);
        assert_eq!(fixture.approvers, vec![ActorId::new(2)]);
        assert!(!fixture.revisions[0].transient);
        assert!(fixture.saves.is_empty());
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let err = Fixture::from_toml_str(
            r#"
[[grants]]
actor = 2
content = 9
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown item 9"));
    }

    #[test]
    fn test_revision_id_must_not_collide_with_item() {
        let err = Fixture::from_toml_str(
            r#"
[[items]]
id = 1
content_type = "post"
created_at = "2024-01-01T00:00:00Z"

[[revisions]]
id = 1
content = 1
author = 2
created_at = "2024-01-02T00:00:00Z"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("collides"));
    }

    #[tokio::test]
    async fn test_seeded_world_resolves_override() {
        let fixture = Fixture::from_toml_str(WORLD).unwrap();
        let settings = EditGateSettings::default().with_type_default("post", "open");
        let world = World::seed(&fixture, &settings).unwrap();

        let mode = world.gate.resolve_by_id(ContentId::new(1)).await.unwrap();
        assert_eq!(mode, editgate_types::EditingMode::Locked);
        assert_eq!(world.content.revision_count(ContentId::new(1)), 1);
    }
}
