//! Gateway retrieval with ordered failover.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hawser_types::ContentId;
use tracing::{debug, warn};
use url::Url;

use crate::GatewayFetcher;
use crate::error::NetError;

/// Plain HTTP gateway fetch: GET `<gateway>/<id>`.
#[derive(Default)]
pub struct HttpGatewayFetcher {
    client: reqwest::Client,
}

impl HttpGatewayFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl GatewayFetcher for HttpGatewayFetcher {
    async fn fetch(&self, gateway: &Url, id: &ContentId) -> Result<Bytes, NetError> {
        let url = format!("{}/{}", gateway.as_str().trim_end_matches('/'), id);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetError::GatewayFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetError::GatewayFetch(format!("status {status}")));
        }

        response
            .bytes()
            .await
            .map_err(|e| NetError::GatewayFetch(e.to_string()))
    }
}

/// Walks an ordered gateway list until one attempt yields the payload.
///
/// Each gateway gets one attempt with its own full timeout; a timed-out
/// attempt is dropped, not left running. Attempts are strictly sequential
/// in list order and a failed attempt is logged and skipped, never
/// retried. Once every gateway has been tried the retrieval fails with
/// [`NetError::AllGatewaysExhausted`].
pub struct GatewayRetriever {
    gateways: Vec<Url>,
    timeout: Duration,
    fetcher: Arc<dyn GatewayFetcher>,
}

impl GatewayRetriever {
    pub fn new(gateways: Vec<Url>, timeout: Duration) -> Self {
        Self {
            gateways,
            timeout,
            fetcher: Arc::new(HttpGatewayFetcher::new()),
        }
    }

    /// Replace the fetch transport, keeping the gateway list and timeout.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn GatewayFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn gateways(&self) -> &[Url] {
        &self.gateways
    }

    /// Retrieve `id`, trying gateways in configured order.
    pub async fn retrieve(&self, id: &ContentId) -> Result<Bytes, NetError> {
        for gateway in &self.gateways {
            match tokio::time::timeout(self.timeout, self.fetcher.fetch(gateway, id)).await {
                Ok(Ok(payload)) => {
                    debug!(%id, %gateway, size = payload.len(), "gateway fetch succeeded");
                    return Ok(payload);
                }
                Ok(Err(err)) => {
                    warn!(%id, %gateway, %err, "gateway fetch failed, trying next");
                }
                Err(_) => {
                    warn!(
                        %id, %gateway,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "gateway fetch timed out, trying next"
                    );
                }
            }
        }

        Err(NetError::AllGatewaysExhausted {
            attempts: self.gateways.len(),
        })
    }
}
