//! Ordered interceptor chains for requests and responses
//!
//! Request interceptors run before dispatch and may rewrite the outgoing
//! request; response interceptors run after decoding and may rewrite the
//! parsed body. Either side can abort the call by returning an error, which
//! propagates to the caller as-is. Registration returns a handle whose
//! `unregister` removes exactly the entry it created.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fleetline_domain::ApiError;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use serde_json::Value;

use crate::http::PreparedRequest;

/// Async transform applied to an outgoing request.
pub type RequestTransform =
    Arc<dyn Fn(PreparedRequest) -> BoxFuture<'static, Result<PreparedRequest, ApiError>> + Send + Sync>;

/// Async transform applied to a decoded response body.
pub type ResponseTransform =
    Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, ApiError>> + Send + Sync>;

/// Removes one registered interceptor when invoked.
pub struct InterceptorHandle {
    remove: Option<Box<dyn FnOnce() + Send>>,
}

impl InterceptorHandle {
    /// Remove the interceptor this handle was issued for. Idempotent by
    /// construction: the handle is consumed.
    pub fn unregister(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}

impl std::fmt::Debug for InterceptorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptorHandle").finish_non_exhaustive()
    }
}

/// An ordered, shareable list of transforms.
///
/// Entries run in registration order. `snapshot` clones the current list so
/// dispatched requests keep a stable chain even if interceptors are removed
/// mid-flight.
pub(crate) struct InterceptorChain<T> {
    entries: Arc<RwLock<Vec<(u64, T)>>>,
    next_id: AtomicU64,
}

impl<T: Clone + Send + Sync + 'static> InterceptorChain<T> {
    pub(crate) fn new() -> Self {
        Self { entries: Arc::new(RwLock::new(Vec::new())), next_id: AtomicU64::new(0) }
    }

    pub(crate) fn register(&self, transform: T) -> InterceptorHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries.write().push((id, transform));

        let entries = Arc::clone(&self.entries);
        InterceptorHandle {
            remove: Some(Box::new(move || {
                entries.write().retain(|(entry_id, _)| *entry_id != id);
            })),
        }
    }

    /// Clone the current chain in registration order.
    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.entries.read().iter().map(|(_, transform)| transform.clone()).collect()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }
}
