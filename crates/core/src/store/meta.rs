//! Freshness metadata and store result types

use std::time::{Duration, Instant};

/// Per-collection freshness and progress metadata.
///
/// `loading` is advisory state for UI consumers; the store serializes
/// conflicting work internally. `last_fetched_at` moves only on a fetch
/// that actually hit the network and succeeded.
#[derive(Debug, Clone, Default)]
pub struct EntityMeta {
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<Instant>,
}

impl EntityMeta {
    /// Whether the collection is still inside its TTL window.
    ///
    /// Never-fetched collections are stale by definition. An age exactly at
    /// the TTL counts as stale, matching the response cache boundary.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        match self.last_fetched_at {
            Some(fetched_at) => now.saturating_duration_since(fetched_at) < ttl,
            None => false,
        }
    }
}

/// Cloned view of one entity collection plus its metadata.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    pub records: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<Instant>,
}

/// Cloned view of a singleton document (settings, dashboard metrics).
#[derive(Debug, Clone)]
pub struct DocumentSnapshot<T> {
    pub document: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched_at: Option<Instant>,
}

/// What a fetch call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was fresh enough; no network call was made.
    Fresh,
    /// The network was hit and the collection replaced.
    Fetched,
    /// The network was hit and failed; previous data was kept.
    Failed,
}

impl FetchOutcome {
    /// Whether this outcome involved a network call.
    pub fn hit_network(&self) -> bool {
        !matches!(self, Self::Fresh)
    }
}

/// Result of a mutation, as a value rather than an error.
///
/// Mutation failures (validation, conflicts) are expected user-facing
/// outcomes; callers branch on the variant instead of catching errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<T> {
    Success(T),
    Failure(String),
}

impl<T> MutationOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The merged record, if the mutation succeeded.
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Success(record) => Some(record),
            Self::Failure(_) => None,
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure(message) => Some(message),
        }
    }
}
