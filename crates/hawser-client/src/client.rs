//! Client orchestration: upload, retrieval, and pin management.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hawser_cache::TtlCache;
use hawser_cas::Chunker;
use hawser_dispatch::run_bounded;
use hawser_net::{GatewayFetcher, GatewayRetriever, PinningService};
use hawser_registry::PinRegistry;
use hawser_types::{ContentId, PinRecord, PinScope, UploadReceipt};
use tracing::{debug, info};
use url::Url;

use crate::error::ClientError;

/// Client tuning knobs.
#[derive(Debug, Clone)]
pub struct HawserConfig {
    /// Payloads of at most this many bytes upload in one piece; larger
    /// payloads are split into parts of this size.
    pub chunk_size: u32,
    /// Maximum number of upload tasks in flight at once.
    pub max_in_flight: usize,
    /// Ordered gateway base URLs for retrieval, most preferred first.
    /// There is no usable default; at least one gateway must be given.
    pub gateways: Vec<Url>,
    /// Timeout for each single gateway attempt.
    pub gateway_timeout: Duration,
    /// How long retrieved payloads stay fresh in the cache.
    pub cache_max_age: Duration,
}

impl Default for HawserConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10 * 1024 * 1024,
            max_in_flight: 3,
            gateways: Vec::new(),
            gateway_timeout: Duration::from_secs(30),
            cache_max_age: Duration::from_secs(60 * 60),
        }
    }
}

/// Facade over the upload, retrieval, and pin components.
///
/// Owns its cache and registry: two clients share nothing unless they
/// were handed the same registry path. The pinning service and the
/// gateway transport sit behind traits so tests can swap them out.
pub struct HawserClient {
    pinning: Arc<dyn PinningService>,
    retriever: GatewayRetriever,
    cache: TtlCache,
    registry: PinRegistry,
    chunker: Chunker,
    chunk_size: u32,
    max_in_flight: usize,
}

impl HawserClient {
    /// Build a client from config, a pinning service, and a registry.
    ///
    /// Fails if the gateway list is empty, since retrieval would have
    /// nowhere to go.
    pub fn new(
        config: HawserConfig,
        pinning: Arc<dyn PinningService>,
        registry: PinRegistry,
    ) -> Result<Self, ClientError> {
        if config.gateways.is_empty() {
            return Err(ClientError::NoGateways);
        }
        Ok(Self {
            pinning,
            retriever: GatewayRetriever::new(config.gateways, config.gateway_timeout),
            cache: TtlCache::new(config.cache_max_age),
            registry,
            chunker: Chunker::new(config.chunk_size),
            chunk_size: config.chunk_size,
            max_in_flight: config.max_in_flight,
        })
    }

    /// Swap the gateway transport, keeping everything else.
    pub fn with_gateway_fetcher(mut self, fetcher: Arc<dyn GatewayFetcher>) -> Self {
        self.retriever = self.retriever.with_fetcher(fetcher);
        self
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    pub fn registry(&self) -> &PinRegistry {
        &self.registry
    }

    // ------------------------------------------------------------------
    // Upload path
    // ------------------------------------------------------------------

    /// Upload one payload.
    ///
    /// Payloads of at most `chunk_size` bytes go up in a single request.
    /// Larger payloads are split into parts which upload through the
    /// bounded dispatcher; the receipt then lists every part identifier
    /// in payload order, with the first as the representative.
    pub async fn upload(
        &self,
        payload: Bytes,
        credential: &str,
    ) -> Result<UploadReceipt, ClientError> {
        let size_bytes = payload.len() as u64;
        if size_bytes <= self.chunk_size as u64 {
            info!(size_bytes, "upload: direct");
            let id = self.pinning.add(payload, credential).await?;
            return Ok(UploadReceipt::single(id, size_bytes));
        }

        let chunks = self.chunker.chunk(&payload);
        info!(size_bytes, parts = chunks.len(), "upload: chunked");

        let tasks: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let pinning = Arc::clone(&self.pinning);
                let credential = credential.to_string();
                async move { pinning.add(chunk.data, &credential).await }
            })
            .collect();

        let part_ids = run_bounded(tasks, self.max_in_flight).await?;
        let content_id = part_ids
            .first()
            .cloned()
            .expect("oversized payload yields at least one part");

        debug!(%content_id, parts = part_ids.len(), "upload: all parts accepted");
        Ok(UploadReceipt {
            content_id,
            size_bytes,
            part_ids,
        })
    }

    /// Upload a batch of payloads, at most `max_in_flight` at a time
    /// across the whole batch.
    ///
    /// Each payload goes up in one piece, exactly as submitted. Receipts
    /// come back in input order. The first failed upload fails the whole
    /// batch with that error.
    pub async fn batch_upload(
        &self,
        payloads: Vec<Bytes>,
        credential: &str,
    ) -> Result<Vec<UploadReceipt>, ClientError> {
        if payloads.is_empty() {
            return Ok(Vec::new());
        }
        info!(count = payloads.len(), limit = self.max_in_flight, "batch upload");

        let tasks: Vec<_> = payloads
            .into_iter()
            .map(|payload| {
                let pinning = Arc::clone(&self.pinning);
                let credential = credential.to_string();
                async move {
                    let size_bytes = payload.len() as u64;
                    let id = pinning.add(payload, &credential).await?;
                    Ok::<UploadReceipt, hawser_net::NetError>(UploadReceipt::single(id, size_bytes))
                }
            })
            .collect();

        Ok(run_bounded(tasks, self.max_in_flight).await?)
    }

    // ------------------------------------------------------------------
    // Read path
    // ------------------------------------------------------------------

    /// Retrieve a payload by identifier.
    ///
    /// Fresh cache entries come back without any network traffic.
    /// Otherwise the gateways are walked in order and the first success
    /// is cached and returned.
    pub async fn retrieve(&self, id: &ContentId) -> Result<Bytes, ClientError> {
        if let Some(payload) = self.cache.get(id) {
            debug!(%id, "retrieve: cache hit");
            return Ok(payload);
        }

        let payload = self.retriever.retrieve(id).await?;
        self.cache.set(id.clone(), payload.clone());
        info!(%id, size = payload.len(), "retrieve: fetched from gateway");
        Ok(payload)
    }

    // ------------------------------------------------------------------
    // Pin management
    // ------------------------------------------------------------------

    /// Pin content and record the confirmed state.
    ///
    /// The remote call comes first: if it fails, the registry is left
    /// untouched and keeps the last confirmed state.
    pub async fn pin(&self, id: &ContentId, scope: PinScope) -> Result<(), ClientError> {
        self.pinning.pin(id).await?;
        self.registry.set_pinned(id, scope, true)?;
        info!(%id, %scope, "pinned");
        Ok(())
    }

    /// Release a pin and record the confirmed state.
    ///
    /// Same ordering as [`HawserClient::pin`]: a failed remote call
    /// leaves the registry record as it was.
    pub async fn unpin(&self, id: &ContentId, scope: PinScope) -> Result<(), ClientError> {
        self.pinning.unpin(id).await?;
        self.registry.set_pinned(id, scope, false)?;
        info!(%id, %scope, "unpinned");
        Ok(())
    }

    /// Currently pinned records in one scope.
    pub fn list_pinned(&self, scope: PinScope) -> Result<Vec<PinRecord>, ClientError> {
        Ok(self.registry.list_pinned(scope)?)
    }
}
