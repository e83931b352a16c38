//! The shared API client
//!
//! Every domain service speaks to the backend through one [`ApiClient`],
//! which composes the retrying executor, the response cache, and the
//! request coordinator. The coordinator is where the caching and
//! deduplication guarantees live; the client adds verb-shaped helpers,
//! token state, interceptor chains, and URL composition on top.

mod client;
mod coordinator;
mod interceptor;
mod options;

pub use client::ApiClient;
pub use coordinator::RequestCoordinator;
pub use interceptor::{InterceptorHandle, RequestTransform, ResponseTransform};
pub use options::{CallOptions, HttpMethod};
