//! EditGate Types - Core types for editing policies and revision approval
//!
//! EditGate decides, per content item, whether a saved change becomes the
//! accepted version or is filed as a pending suggestion that an authorized
//! actor must approve.
//!
//! ## Key Concepts
//!
//! - **ContentItem**: A piece of content owned by the host store
//! - **Revision**: An immutable snapshot of a content item
//! - **EditingMode**: The editing policy (`off`, `open`, `approval-required`, `locked`)
//! - **AcceptedRevision**: The revision currently treated as authoritative
//! - **PendingSet**: Revisions newer than the accepted one
//! - **SaveOutcome**: What happened to a save attempt
//! - **MessageKind**: Which advisory notice applies to a view

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod content;
pub mod ids;
pub mod mode;
pub mod notice;
pub mod outcome;
pub mod pending;

// Re-export main types
pub use content::{Actor, ContentItem, ContentStatus, ContentType, Revision};
pub use ids::{ActorId, ContentId, RevisionId};
pub use mode::EditingMode;
pub use notice::{DiffTarget, MessageKind};
pub use outcome::{PendingReason, PointerUpdate, SaveAdmission, SaveOutcome};
pub use pending::{AcceptedRevision, AcceptedSource, PendingSet, RevisionMarking};
