//! Store ports and backends.
//!
//! Provides the interfaces the policy core needs from its host, plus
//! in-memory backends for tests, fixtures and local simulation.

pub mod memory;
pub mod traits;

pub use memory::{
    InMemoryContentStore, InMemoryEphemeralStore, InMemoryPointerStore, InMemoryPolicyStore,
    StaticAuthorization,
};
pub use traits::{
    AuthorizationProvider, ContentStore, EphemeralStore, PointerStore, PolicyStore, RevisionQuery,
};
