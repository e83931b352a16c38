//! HTTP transport layer
//!
//! The [`Transport`] trait is the seam between the request pipeline and the
//! actual network stack: production wires in the reqwest-backed
//! [`HttpExecutor`], tests and demo builds swap in [`FakeTransport`]
//! wholesale at construction time. Retry, status mapping, and JSON decoding
//! sit on top in [`RetryingExecutor`], so they apply identically to both.

mod executor;
mod transport;

pub(crate) use executor::decode_response;
pub use executor::{HttpExecutor, RetryingExecutor};
pub use transport::{
    FakeTransport, MultipartRequest, PreparedRequest, Transport, TransportResponse, UploadPart,
};
