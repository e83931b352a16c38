//! Request coordination: cache lookups and in-flight deduplication
//!
//! Every dispatched call goes through [`RequestCoordinator`]. Cacheable
//! reads check the response cache first; misses are deduplicated against
//! the in-flight map so that K concurrent callers with the same cache key
//! share one network request. Both checks and the publication of the new
//! in-flight handle happen under a single lock acquisition, so there is no
//! window where two callers can both miss and both dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use fleetline_common::time::{Clock, SystemClock};
use fleetline_common::{CacheKey, ResponseCache};
use fleetline_domain::ApiError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, trace};

type SharedOutcome = Shared<BoxFuture<'static, Result<Arc<Value>, ApiError>>>;

/// Deduplicating dispatcher over a shared response cache.
///
/// Cloning shares the cache and the in-flight map. The clock parameter is
/// the cache's; tests substitute a mock to steer freshness.
pub struct RequestCoordinator<C = SystemClock>
where
    C: Clock + Clone,
{
    cache: ResponseCache<C>,
    inflight: Arc<Mutex<HashMap<String, SharedOutcome>>>,
}

impl<C> RequestCoordinator<C>
where
    C: Clock + Clone + 'static,
{
    pub fn new(cache: ResponseCache<C>) -> Self {
        Self { cache, inflight: Arc::new(Mutex::new(HashMap::new())) }
    }

    /// The response cache this coordinator reads and writes.
    pub fn cache(&self) -> &ResponseCache<C> {
        &self.cache
    }

    /// Number of requests currently in flight.
    pub fn inflight_len(&self) -> usize {
        self.inflight.lock().len()
    }

    /// Dispatch `work`, deduplicating by cache key.
    ///
    /// For cacheable calls a fresh cached body short-circuits the dispatch
    /// and the successful result is written back to the cache before other
    /// waiters observe it. The work future is driven by a spawned task, so
    /// it runs to completion even if every caller is dropped; late callers
    /// arriving before settlement attach to the same task.
    ///
    /// # Errors
    /// Propagates the work future's error to every attached caller.
    pub async fn dispatch(
        &self,
        key: &CacheKey,
        cacheable: bool,
        max_age: Duration,
        work: BoxFuture<'static, Result<Value, ApiError>>,
    ) -> Result<Arc<Value>, ApiError> {
        let key = key.as_str().to_string();

        let handle = {
            let mut inflight = self.inflight.lock();

            if cacheable {
                if let Some(hit) = self.cache.get(&key, max_age) {
                    trace!(key = %key, "cache hit");
                    return Ok(hit);
                }
            }

            if let Some(existing) = inflight.get(&key) {
                debug!(key = %key, "joining in-flight request");
                existing.clone()
            } else {
                let cache = self.cache.clone();
                let map = Arc::clone(&self.inflight);
                let task_key = key.clone();
                let task = tokio::spawn(async move {
                    let outcome = work.await.map(Arc::new);
                    if cacheable {
                        if let Ok(value) = &outcome {
                            cache.set(task_key.clone(), Arc::clone(value));
                        }
                    }
                    // Settle before waiters resume so a follow-up call with
                    // the same key starts a fresh request.
                    map.lock().remove(&task_key);
                    outcome
                });
                let handle: SharedOutcome = async move {
                    match task.await {
                        Ok(outcome) => outcome,
                        Err(err) => Err(ApiError::Network(format!("request task failed: {err}"))),
                    }
                }
                .boxed()
                .shared();
                inflight.insert(key, handle.clone());
                handle
            }
        };

        handle.await
    }
}

impl<C> Clone for RequestCoordinator<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self { cache: self.cache.clone(), inflight: Arc::clone(&self.inflight) }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for api::coordinator.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fleetline_common::{MockClock, ResponseCache};
    use serde_json::json;

    use super::*;

    fn key(path: &str) -> CacheKey {
        CacheKey::new("GET", &format!("http://api.test{path}"), &[], None)
    }

    fn counted_work(counter: &Arc<AtomicUsize>, value: Value) -> BoxFuture<'static, Result<Value, ApiError>> {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            // Yield so concurrent callers pile up before completion.
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(value)
        }
        .boxed()
    }

    /// Validates K concurrent identical reads share one execution.
    ///
    /// Assertions:
    /// - Confirms five concurrent dispatches run the work exactly once.
    /// - Confirms every caller receives the same body.
    #[tokio::test]
    async fn test_concurrent_dispatches_share_one_execution() {
        let coordinator = RequestCoordinator::new(ResponseCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let coordinator = coordinator.clone();
            let work = counted_work(&counter, json!({"drivers": [1, 2]}));
            handles.push(tokio::spawn(async move {
                coordinator.dispatch(&key("/drivers"), true, Duration::from_secs(60), work).await
            }));
        }

        for handle in handles {
            let value = handle.await.unwrap().unwrap();
            assert_eq!(*value, json!({"drivers": [1, 2]}));
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.inflight_len(), 0);
    }

    /// Validates distinct keys do not deduplicate against each other.
    ///
    /// Assertions:
    /// - Confirms two different keys run the work twice.
    #[tokio::test]
    async fn test_distinct_keys_dispatch_independently() {
        let coordinator = RequestCoordinator::new(ResponseCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let drivers_key = key("/drivers");
        let routes_key = key("/routes");
        let a = coordinator.dispatch(
            &drivers_key,
            true,
            Duration::from_secs(60),
            counted_work(&counter, json!(1)),
        );
        let b = coordinator.dispatch(
            &routes_key,
            true,
            Duration::from_secs(60),
            counted_work(&counter, json!(2)),
        );

        let (a, b) = tokio::join!(a, b);
        assert_eq!(*a.unwrap(), json!(1));
        assert_eq!(*b.unwrap(), json!(2));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    /// Validates successful cacheable results are served from cache.
    ///
    /// Assertions:
    /// - Confirms the second dispatch after settlement does not re-run
    ///   the work while the entry is fresh.
    /// - Confirms the work runs again once the entry expires.
    #[tokio::test]
    async fn test_cache_write_back_and_expiry() {
        let clock = MockClock::new();
        let coordinator =
            RequestCoordinator::new(ResponseCache::with_clock(clock.clone()));
        let counter = Arc::new(AtomicUsize::new(0));
        let max_age = Duration::from_secs(60);

        let first = coordinator
            .dispatch(&key("/drivers"), true, max_age, counted_work(&counter, json!("a")))
            .await
            .unwrap();
        assert_eq!(*first, json!("a"));

        clock.advance(Duration::from_secs(30));
        let second = coordinator
            .dispatch(&key("/drivers"), true, max_age, counted_work(&counter, json!("b")))
            .await
            .unwrap();
        assert_eq!(*second, json!("a"));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        clock.advance(Duration::from_secs(31));
        let third = coordinator
            .dispatch(&key("/drivers"), true, max_age, counted_work(&counter, json!("b")))
            .await
            .unwrap();
        assert_eq!(*third, json!("b"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    /// Validates uncacheable dispatches never touch the cache.
    ///
    /// Assertions:
    /// - Confirms back-to-back uncacheable dispatches each run the work.
    /// - Confirms nothing is stored in the cache.
    #[tokio::test]
    async fn test_uncacheable_dispatch_bypasses_cache() {
        let coordinator = RequestCoordinator::new(ResponseCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            coordinator
                .dispatch(
                    &key("/drivers"),
                    false,
                    Duration::from_secs(60),
                    counted_work(&counter, json!(null)),
                )
                .await
                .unwrap();
        }

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(coordinator.cache().len(), 0);
    }

    /// Validates errors fan out to every waiter and are not cached.
    ///
    /// Assertions:
    /// - Confirms both concurrent callers see the same error.
    /// - Confirms a retry after settlement runs fresh work.
    #[tokio::test]
    async fn test_error_fan_out_not_cached() {
        let coordinator = RequestCoordinator::new(ResponseCache::new());
        let failing: BoxFuture<'static, Result<Value, ApiError>> = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(ApiError::Server { status: 503, message: "maintenance".into() })
        }
        .boxed();

        let trips_key = key("/trips");
        let a = coordinator.dispatch(&trips_key, true, Duration::from_secs(60), failing);
        let b = coordinator.dispatch(
            &trips_key,
            true,
            Duration::from_secs(60),
            async { Ok(json!("unused")) }.boxed(),
        );
        let (a, b) = tokio::join!(a, b);
        assert!(a.is_err());
        assert_eq!(a.unwrap_err(), b.unwrap_err());

        assert_eq!(coordinator.cache().len(), 0);
        let counter = Arc::new(AtomicUsize::new(0));
        coordinator
            .dispatch(&key("/trips"), true, Duration::from_secs(60), counted_work(&counter, json!(1)))
            .await
            .unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    /// Validates the work runs to completion when callers drop early.
    ///
    /// Assertions:
    /// - Confirms the cache is populated even though the only caller was
    ///   dropped before the request settled.
    #[tokio::test]
    async fn test_work_survives_dropped_caller() {
        let coordinator = RequestCoordinator::new(ResponseCache::new());
        let counter = Arc::new(AtomicUsize::new(0));

        let schools_key = key("/schools");
        let dispatch = coordinator.dispatch(
            &schools_key,
            true,
            Duration::from_secs(60),
            counted_work(&counter, json!({"schools": []})),
        );
        // Poll once to publish the in-flight task, then drop the caller.
        tokio::select! {
            biased;
            _ = dispatch => panic!("work should not settle immediately"),
            () = std::future::ready(()) => {}
        }

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(coordinator.cache().len(), 1);
    }
}
