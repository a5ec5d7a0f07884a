//! # EditGate Policy
//!
//! Editing policy resolution and save-time decisions for content that may
//! require approval before changes go live.
//!
//! ## Overview
//!
//! Every content type has a default editing mode and every item may override
//! it:
//!
//! - **off**: the policy is disabled for the type; every item behaves as open
//! - **open**: all saves are accepted
//! - **approval-required**: saves by non-approvers become pending suggestions
//! - **locked**: non-approvers cannot save at all
//!
//! ## Key Components
//!
//! - [`EditingModeResolver`]: Effective mode per item
//! - [`AccessGate`]: Approval capability check
//! - [`PendingRevisionDetector`]: Revisions newer than the accepted one
//! - [`SaveDecisionEngine`]: Save-time state machine
//! - [`NotificationContextBuilder`]: Advisory message selection
//! - [`EditGate`]: Service wiring them together
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use editgate_policy::storage::{
//!     InMemoryContentStore, InMemoryEphemeralStore, InMemoryPointerStore,
//!     InMemoryPolicyStore, StaticAuthorization,
//! };
//! use editgate_policy::{EditGate, EditGateSettings};
//! use editgate_types::{Actor, ActorId, ContentId, SaveAdmission, SaveOutcome};
//!
//! # async fn example() -> editgate_policy::Result<()> {
//! let settings = EditGateSettings::default().with_type_default("post", "approval-required");
//! let gate = EditGate::builder()
//!     .content_store(Arc::new(InMemoryContentStore::new()))
//!     .policy_store(Arc::new(InMemoryPolicyStore::from_settings(&settings)))
//!     .pointer_store(Arc::new(InMemoryPointerStore::new()))
//!     .ephemeral_store(Arc::new(InMemoryEphemeralStore::new()))
//!     .authorization(Arc::new(StaticAuthorization::new()))
//!     .with_settings(&settings)
//!     .build()?;
//!
//! let item = gate.item(ContentId::new(1)).await?;
//! let actor = Actor::new(ActorId::new(7));
//!
//! // Before writing: may this save be persisted at all?
//! if let SaveAdmission::Blocked { .. } = gate.admit_save(&item, &actor).await? {
//!     return Ok(());
//! }
//!
//! // After writing the revision
//! match gate.decide(&item, &actor, false).await?.outcome {
//!     SaveOutcome::AcceptedAndPublished { revision, .. } => println!("live: {:?}", revision),
//!     SaveOutcome::FiledAsPending { reason, .. } => println!("pending: {:?}", reason),
//!     SaveOutcome::Rejected { .. } => println!("locked"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod affordances;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod gate;
pub mod markers;
pub mod notify;
pub mod resolver;
pub mod service;
pub mod storage;

// Re-exports
pub use affordances::{EditorAffordances, SubmitLabel};
pub use config::{EditGateSettings, NoticeTemplates, SettingsWarning, DEFAULT_MARKER_TTL_SECONDS};
pub use detector::PendingRevisionDetector;
pub use engine::{SaveDecision, SaveDecisionEngine, SaveRule};
pub use error::{EditGateError, Result};
pub use gate::AccessGate;
pub use markers::{PendingMarkerKey, PendingMarkers};
pub use notify::NotificationContextBuilder;
pub use resolver::EditingModeResolver;
pub use service::{EditGate, EditGateBuilder};
