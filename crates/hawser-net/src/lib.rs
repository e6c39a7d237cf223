//! HTTP plumbing for the pinning endpoint and the retrieval gateways.
//!
//! Two seams, both behind traits so tests can substitute in-memory fakes
//! with failure injection for the real HTTP transports:
//!
//! - [`PinningService`]: authenticated calls against the pinning endpoint
//!   (upload, pin, unpin), implemented by [`HttpPinningService`].
//! - [`GatewayFetcher`]: a single fetch attempt against a single gateway,
//!   implemented by [`HttpGatewayFetcher`]. [`GatewayRetriever`] owns the
//!   failover walk across the configured gateway list.

use bytes::Bytes;
use hawser_types::ContentId;
use url::Url;

mod error;
mod gateway;
mod pinning;

pub use error::NetError;
pub use gateway::{GatewayRetriever, HttpGatewayFetcher};
pub use pinning::HttpPinningService;

/// Authenticated operations against the pinning endpoint.
#[async_trait::async_trait]
pub trait PinningService: Send + Sync {
    /// Upload one payload, returning the identifier the network assigned
    /// to it.
    async fn add(&self, payload: Bytes, credential: &str) -> Result<ContentId, NetError>;

    /// Mark previously uploaded content as pinned on the remote service.
    async fn pin(&self, id: &ContentId) -> Result<(), NetError>;

    /// Release a remote pin. The content itself is not deleted.
    async fn unpin(&self, id: &ContentId) -> Result<(), NetError>;
}

/// One fetch attempt against one gateway.
#[async_trait::async_trait]
pub trait GatewayFetcher: Send + Sync {
    /// Fetch `id` from `gateway`. A non-success status is an error here;
    /// failover across gateways lives in [`GatewayRetriever`], not in the
    /// fetcher.
    async fn fetch(&self, gateway: &Url, id: &ContentId) -> Result<Bytes, NetError>;
}
