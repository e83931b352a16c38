//! Benchmark harness crate for measuring response cache performance.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

/// A JSON body shaped like a single driver record from the list endpoints.
pub fn sample_record(index: usize) -> Value {
    json!({
        "id": Uuid::now_v7().to_string(),
        "firstName": format!("Driver{index}"),
        "lastName": "Benchmark",
        "email": format!("driver{index}@example.com"),
        "licenseNumber": format!("CDL-{index:05}"),
        "status": "active",
    })
}

/// A list body with `count` records, as cached after a collection fetch.
pub fn sample_list(count: usize) -> Arc<Value> {
    Arc::new(Value::Array((0..count).map(sample_record).collect()))
}
