//! Staleness-aware entity store
//!
//! One store abstraction fronts every backend resource: per-entity
//! collections with freshness metadata, a fetch-or-skip policy driven by TTL
//! classes, and optimistic merging of mutation results into local state.
//!
//! # Design
//!
//! - **Fetch-or-skip**: a fetch within the entity's TTL window is served
//!   from the already-loaded collection unless forced
//! - **Optimistic merge**: create/update/delete patch the local collection
//!   from the mutation's own response, no re-fetch
//! - **Serialized per entity**: fetch and mutate for one entity queue behind
//!   the same async lock, so a slow fetch cannot clobber a merge that landed
//!   after it
//! - **Failure keeps data**: a failed fetch records the error and leaves the
//!   previous collection in place

mod fleet;
mod meta;
mod slot;

pub use fleet::{FleetGateways, FleetStore};
pub use meta::{DocumentSnapshot, EntityMeta, FetchOutcome, MutationOutcome, Snapshot};
