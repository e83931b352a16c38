//! Integration tests for the response cache
//!
//! **Purpose**: exercise the cache the way the HTTP layer drives it, with
//! canonical keys built per request and freshness decided per read.
//!
//! **Coverage:**
//! - Keyed reads survive param and body permutations
//! - Mutation-style substring invalidation across related keys
//! - Per-entity TTL classes over one shared cache, on a mock clock
//! - Counter accounting over a realistic request sequence
//! - Concurrent writers from tokio tasks

use std::sync::Arc;
use std::time::Duration;

use fleetline_common::cache::{CacheKey, ResponseCache};
use fleetline_common::time::MockClock;
use serde_json::json;

const LIST_TTL: Duration = Duration::from_secs(300);
const SETTINGS_TTL: Duration = Duration::from_secs(900);

fn list_key(entity: &str, params: &[(String, String)]) -> CacheKey {
    CacheKey::new("GET", &format!("https://api.example/api/v1/{entity}"), params, None)
}

/// Validates the fetch-then-hit flow with permuted request shapes.
///
/// Assertions:
/// - Confirms a read keyed with reordered params lands on the entry the
///   original request stored.
/// - Confirms a reordered JSON body does the same for an enveloped read.
#[test]
fn test_permuted_requests_share_entries() {
    let cache = ResponseCache::new();

    let params =
        vec![("schoolId".to_string(), "s1".to_string()), ("grade".to_string(), "4".to_string())];
    cache.set(list_key("students", &params).as_str(), Arc::new(json!([{"id": "stu-1"}])));

    let mut reordered = params.clone();
    reordered.reverse();
    let hit = cache.get(list_key("students", &reordered).as_str(), LIST_TTL);
    assert_eq!(hit.unwrap()[0]["id"], "stu-1");

    let post = CacheKey::new(
        "POST",
        "https://api.example/api/v1/notifications/query",
        &[],
        Some(&json!({"actorId": "u1", "unreadOnly": true})),
    );
    cache.set(post.as_str(), Arc::new(json!({"items": []})));

    let permuted = CacheKey::new(
        "POST",
        "https://api.example/api/v1/notifications/query",
        &[],
        Some(&json!({"unreadOnly": true, "actorId": "u1"})),
    );
    assert!(cache.get(permuted.as_str(), LIST_TTL).is_some());
}

/// Validates mutation-style invalidation across keyed entries.
///
/// Assertions:
/// - Confirms a path-fragment invalidation drops the list and the detail
///   entry for the mutated entity.
/// - Confirms entries for other entities survive.
#[test]
fn test_mutation_flushes_related_keys() {
    let cache = ResponseCache::new();

    cache.set(list_key("drivers", &[]).as_str(), Arc::new(json!([])));
    cache.set(
        CacheKey::new("GET", "https://api.example/api/v1/drivers/d-42", &[], None).as_str(),
        Arc::new(json!({"id": "d-42"})),
    );
    cache.set(list_key("routes", &[]).as_str(), Arc::new(json!([])));

    let removed = cache.invalidate(Some("/drivers"));
    assert_eq!(removed, 2);
    assert!(cache.get(list_key("drivers", &[]).as_str(), LIST_TTL).is_none());
    assert!(cache.get(list_key("routes", &[]).as_str(), LIST_TTL).is_some());
}

/// Validates one cache serving two TTL classes.
///
/// Assertions:
/// - Confirms an entry stale for a list reader still hits for the settings
///   reader at the same age.
#[test]
fn test_ttl_classes_share_one_cache() {
    let clock = MockClock::new();
    let cache = ResponseCache::with_clock(clock.clone());

    cache.set(list_key("drivers", &[]).as_str(), Arc::new(json!([])));
    cache.set(list_key("settings", &[]).as_str(), Arc::new(json!({"distanceUnit": "miles"})));

    clock.advance(Duration::from_secs(600));
    assert!(cache.get(list_key("drivers", &[]).as_str(), LIST_TTL).is_none());
    assert!(cache.get(list_key("settings", &[]).as_str(), SETTINGS_TTL).is_some());
}

/// Validates counter accounting over a fetch, hit, expire sequence.
///
/// Assertions:
/// - Confirms hits, misses, inserts, and expirations line up with the
///   sequence driven through the cache.
#[test]
fn test_stats_over_request_sequence() {
    let clock = MockClock::new();
    let cache = ResponseCache::with_clock(clock.clone());
    let key = list_key("shifts", &[]);

    assert!(cache.get(key.as_str(), LIST_TTL).is_none()); // Cold miss
    cache.set(key.as_str(), Arc::new(json!([])));
    assert!(cache.get(key.as_str(), LIST_TTL).is_some()); // Hit

    clock.advance(Duration::from_secs(301));
    assert!(cache.get(key.as_str(), LIST_TTL).is_none()); // Expired

    let stats = cache.stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.inserts, 1);
    assert_eq!(stats.expirations, 1);
    assert_eq!(stats.size, 0);
}

/// Validates the cache under concurrent task access.
///
/// Assertions:
/// - Confirms writers on separate tasks settle with every written key
///   readable.
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_task_access() {
    let cache = Arc::new(ResponseCache::new());

    let writers: Vec<_> = (0..8)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for j in 0..25 {
                    cache.set(
                        format!("GET:https://api.example/api/v1/trips/{i}-{j}"),
                        Arc::new(json!({"trip": i * 25 + j})),
                    );
                }
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap();
    }

    assert_eq!(cache.len(), 200);
    for i in 0..8 {
        let hit = cache.get(&format!("GET:https://api.example/api/v1/trips/{i}-0"), LIST_TTL);
        assert!(hit.is_some());
    }
}
