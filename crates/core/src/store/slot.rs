//! Per-entity state slots
//!
//! An [`EntitySlot`] owns one entity collection, its metadata, and the async
//! lock that serializes fetch and mutate for that entity. The generic
//! fetch/mutate bodies live here; `fleet.rs` only wires gateways in.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use fleetline_common::time::Clock;
use fleetline_domain::ApiError;
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::meta::{DocumentSnapshot, EntityMeta, FetchOutcome, MutationOutcome, Snapshot};

/// Records that can be located in a collection by their id.
pub(crate) trait Identified {
    fn entity_id(&self) -> Uuid;
}

struct SlotState<T> {
    records: Vec<T>,
    meta: EntityMeta,
}

impl<T> Default for SlotState<T> {
    fn default() -> Self {
        Self { records: Vec::new(), meta: EntityMeta::default() }
    }
}

/// State container for one entity collection.
pub(crate) struct EntitySlot<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: RwLock<SlotState<T>>,
    /// Serializes fetch and mutate; held across the gateway call so a
    /// fetch sampled before a mutation cannot overwrite its merge.
    gate: Mutex<()>,
}

impl<T: Clone> EntitySlot<T> {
    pub(crate) fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { name, ttl, clock, state: RwLock::new(SlotState::default()), gate: Mutex::new(()) }
    }

    /// Fetch-or-skip: hit the gateway only when forced or stale.
    ///
    /// On success the collection is replaced wholesale; on failure the error
    /// is recorded and the previous collection kept.
    pub(crate) async fn fetch_with<F>(&self, force: bool, fetch: F) -> FetchOutcome
    where
        F: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let _guard = self.gate.lock().await;

        if !force {
            let state = self.state.read();
            if state.meta.is_fresh(self.ttl, self.clock.now()) {
                debug!(entity = self.name, "collection fresh, skipping fetch");
                return FetchOutcome::Fresh;
            }
        }

        {
            let mut state = self.state.write();
            state.meta.loading = true;
            state.meta.error = None;
        }

        match fetch.await {
            Ok(records) => {
                let mut state = self.state.write();
                state.records = records;
                state.meta.loading = false;
                state.meta.last_fetched_at = Some(self.clock.now());
                debug!(entity = self.name, count = state.records.len(), "collection replaced");
                FetchOutcome::Fetched
            }
            Err(err) => {
                warn!(entity = self.name, error = %err, "fetch failed, keeping previous data");
                let mut state = self.state.write();
                state.meta.loading = false;
                state.meta.error = Some(err.to_string());
                FetchOutcome::Failed
            }
        }
    }

    /// Run a mutation and merge its result into the collection.
    pub(crate) async fn mutate_with<F, M>(&self, mutation: F, merge: M) -> MutationOutcome<T>
    where
        F: Future<Output = Result<T, ApiError>>,
        M: FnOnce(&mut Vec<T>, &T),
    {
        let _guard = self.gate.lock().await;

        match mutation.await {
            Ok(record) => {
                let mut state = self.state.write();
                merge(&mut state.records, &record);
                MutationOutcome::Success(record)
            }
            Err(err) => {
                warn!(entity = self.name, error = %err, "mutation rejected");
                MutationOutcome::Failure(err.to_string())
            }
        }
    }

    /// Run a delete mutation and drop the record locally on success.
    pub(crate) async fn delete_with<F>(&self, id: Uuid, mutation: F) -> MutationOutcome<Uuid>
    where
        F: Future<Output = Result<(), ApiError>>,
        T: Identified,
    {
        let _guard = self.gate.lock().await;

        match mutation.await {
            Ok(()) => {
                let mut state = self.state.write();
                state.records.retain(|record| record.entity_id() != id);
                MutationOutcome::Success(id)
            }
            Err(err) => {
                warn!(entity = self.name, %id, error = %err, "delete rejected");
                MutationOutcome::Failure(err.to_string())
            }
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot<T> {
        let state = self.state.read();
        Snapshot {
            records: state.records.clone(),
            loading: state.meta.loading,
            error: state.meta.error.clone(),
            last_fetched_at: state.meta.last_fetched_at,
        }
    }
}

/// Replace the record with a matching id, or append it.
///
/// Covers both create (no match, append) and update (match, replace in
/// place, order preserved).
pub(crate) fn merge_upsert<T: Identified>(records: &mut Vec<T>, record: &T)
where
    T: Clone,
{
    match records.iter_mut().find(|existing| existing.entity_id() == record.entity_id()) {
        Some(existing) => *existing = record.clone(),
        None => records.push(record.clone()),
    }
}

struct DocState<T> {
    document: Option<T>,
    meta: EntityMeta,
}

/// State container for a singleton document (settings, dashboard metrics).
///
/// Same staleness and failure semantics as [`EntitySlot`], with the
/// collection collapsed to an `Option<T>` replaced wholesale.
pub(crate) struct DocumentSlot<T> {
    name: &'static str,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    state: RwLock<DocState<T>>,
    gate: Mutex<()>,
}

impl<T: Clone> DocumentSlot<T> {
    pub(crate) fn new(name: &'static str, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            name,
            ttl,
            clock,
            state: RwLock::new(DocState { document: None, meta: EntityMeta::default() }),
            gate: Mutex::new(()),
        }
    }

    pub(crate) async fn fetch_with<F>(&self, force: bool, fetch: F) -> FetchOutcome
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let _guard = self.gate.lock().await;

        if !force {
            let state = self.state.read();
            if state.meta.is_fresh(self.ttl, self.clock.now()) {
                debug!(entity = self.name, "document fresh, skipping fetch");
                return FetchOutcome::Fresh;
            }
        }

        {
            let mut state = self.state.write();
            state.meta.loading = true;
            state.meta.error = None;
        }

        match fetch.await {
            Ok(document) => {
                let mut state = self.state.write();
                state.document = Some(document);
                state.meta.loading = false;
                state.meta.last_fetched_at = Some(self.clock.now());
                FetchOutcome::Fetched
            }
            Err(err) => {
                warn!(entity = self.name, error = %err, "fetch failed, keeping previous document");
                let mut state = self.state.write();
                state.meta.loading = false;
                state.meta.error = Some(err.to_string());
                FetchOutcome::Failed
            }
        }
    }

    pub(crate) async fn mutate_with<F>(&self, mutation: F) -> MutationOutcome<T>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let _guard = self.gate.lock().await;

        match mutation.await {
            Ok(document) => {
                let mut state = self.state.write();
                state.document = Some(document.clone());
                MutationOutcome::Success(document)
            }
            Err(err) => {
                warn!(entity = self.name, error = %err, "mutation rejected");
                MutationOutcome::Failure(err.to_string())
            }
        }
    }

    pub(crate) fn snapshot(&self) -> DocumentSnapshot<T> {
        let state = self.state.read();
        DocumentSnapshot {
            document: state.document.clone(),
            loading: state.meta.loading,
            error: state.meta.error.clone(),
            last_fetched_at: state.meta.last_fetched_at,
        }
    }
}
