//! Shared harness for hawser integration tests.
//!
//! Provides in-memory fakes for the two network seams:
//!
//! - [`MockPinningService`] stands in for the pinning endpoint. It derives
//!   identifiers from payload content the way the real network does, and
//!   supports failure injection, per-size delays, and concurrency
//!   instrumentation.
//! - [`MockGatewayFetcher`] answers retrieval attempts from a per-gateway
//!   script and keeps an ordered log of which gateways were tried.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use hawser_client::{HawserClient, HawserConfig};
use hawser_net::{GatewayFetcher, NetError, PinningService};
use hawser_registry::PinRegistry;
use hawser_types::ContentId;
use url::Url;

// =========================================================================
// Test data
// =========================================================================

/// Deterministic pseudo-random payload.
pub fn test_payload(size: usize) -> Bytes {
    test_payload_seeded(size, 0x5eed)
}

pub fn test_payload_seeded(size: usize, seed: u64) -> Bytes {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push((state >> 16) as u8);
    }
    Bytes::from(data)
}

pub fn gateway_url(n: usize) -> Url {
    Url::parse(&format!("https://gw{n}.example.com")).unwrap()
}

// =========================================================================
// Mock pinning service
// =========================================================================

/// In-memory stand-in for the pinning endpoint.
pub struct MockPinningService {
    /// Payload size of every `add` call, in call order.
    upload_sizes: Mutex<Vec<usize>>,
    /// Stored payloads by assigned identifier.
    stored: Mutex<HashMap<ContentId, Bytes>>,
    /// Remote pin state.
    pinned: Mutex<HashSet<ContentId>>,
    /// Artificial upload latency, keyed by payload size.
    delays: Mutex<HashMap<usize, Duration>>,
    /// `add` fails once this many calls have been made.
    fail_uploads_after: Mutex<Option<usize>>,
    /// When set, pin and unpin calls fail.
    fail_pin_calls: AtomicBool,
    /// Concurrency instrumentation.
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockPinningService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            upload_sizes: Mutex::new(Vec::new()),
            stored: Mutex::new(HashMap::new()),
            pinned: Mutex::new(HashSet::new()),
            delays: Mutex::new(HashMap::new()),
            fail_uploads_after: Mutex::new(None),
            fail_pin_calls: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    /// Identifier the service will assign to `payload`.
    pub fn content_id_for(payload: &[u8]) -> ContentId {
        ContentId::from(format!("bafy-{}", blake3::hash(payload).to_hex()))
    }

    pub fn upload_sizes(&self) -> Vec<usize> {
        self.upload_sizes.lock().unwrap().clone()
    }

    pub fn upload_count(&self) -> usize {
        self.upload_sizes.lock().unwrap().len()
    }

    pub fn stored_payload(&self, id: &ContentId) -> Option<Bytes> {
        self.stored.lock().unwrap().get(id).cloned()
    }

    pub fn is_pinned(&self, id: &ContentId) -> bool {
        self.pinned.lock().unwrap().contains(id)
    }

    /// Highest number of uploads that were ever in flight at once.
    pub fn max_observed_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Delay every upload of a payload with exactly this size.
    pub fn set_delay_for_size(&self, size: usize, delay: Duration) {
        self.delays.lock().unwrap().insert(size, delay);
    }

    /// Fail every `add` call after the first `calls` calls.
    pub fn set_fail_uploads_after(&self, calls: usize) {
        *self.fail_uploads_after.lock().unwrap() = Some(calls);
    }

    pub fn set_fail_pin_calls(&self, fail: bool) {
        self.fail_pin_calls.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PinningService for MockPinningService {
    async fn add(&self, payload: Bytes, _credential: &str) -> Result<ContentId, NetError> {
        let call_index = {
            let mut sizes = self.upload_sizes.lock().unwrap();
            sizes.push(payload.len());
            sizes.len() - 1
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(&payload.len()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(limit) = *self.fail_uploads_after.lock().unwrap()
            && call_index >= limit
        {
            return Err(NetError::UploadFailed(format!(
                "injected failure on call {call_index}"
            )));
        }

        let id = Self::content_id_for(&payload);
        self.stored.lock().unwrap().insert(id.clone(), payload);
        Ok(id)
    }

    async fn pin(&self, id: &ContentId) -> Result<(), NetError> {
        if self.fail_pin_calls.load(Ordering::SeqCst) {
            return Err(NetError::PinFailed("injected pin failure".into()));
        }
        self.pinned.lock().unwrap().insert(id.clone());
        Ok(())
    }

    async fn unpin(&self, id: &ContentId) -> Result<(), NetError> {
        if self.fail_pin_calls.load(Ordering::SeqCst) {
            return Err(NetError::PinFailed("injected unpin failure".into()));
        }
        self.pinned.lock().unwrap().remove(id);
        Ok(())
    }
}

// =========================================================================
// Mock gateway fetcher
// =========================================================================

/// Scripted behavior for one gateway.
#[derive(Clone)]
pub enum GatewayBehavior {
    /// Serve this payload for any identifier.
    Serve(Bytes),
    /// Fail the attempt.
    Fail,
    /// Sleep far past any test timeout.
    Hang,
}

/// Gateway transport answering from a per-gateway script.
pub struct MockGatewayFetcher {
    behaviors: Mutex<HashMap<String, GatewayBehavior>>,
    calls: Mutex<Vec<String>>,
}

impl MockGatewayFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            behaviors: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn set(&self, gateway: &Url, behavior: GatewayBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(gateway.as_str().to_string(), behavior);
    }

    /// Gateways tried so far, in attempt order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl GatewayFetcher for MockGatewayFetcher {
    async fn fetch(&self, gateway: &Url, _id: &ContentId) -> Result<Bytes, NetError> {
        self.calls.lock().unwrap().push(gateway.as_str().to_string());

        let behavior = self.behaviors.lock().unwrap().get(gateway.as_str()).cloned();
        match behavior {
            Some(GatewayBehavior::Serve(payload)) => Ok(payload),
            Some(GatewayBehavior::Fail) => Err(NetError::GatewayFetch("injected failure".into())),
            Some(GatewayBehavior::Hang) => {
                tokio::time::sleep(Duration::from_secs(300)).await;
                Err(NetError::GatewayFetch("still hanging".into()))
            }
            None => Err(NetError::GatewayFetch("no behavior for gateway".into())),
        }
    }
}

// =========================================================================
// Client assembly
// =========================================================================

/// Config with fast timeouts suited to tests: 64-byte chunk threshold,
/// 3 uploads in flight, 100ms gateway timeout, 60s cache.
pub fn test_config(gateways: Vec<Url>) -> HawserConfig {
    HawserConfig {
        chunk_size: 64,
        max_in_flight: 3,
        gateways,
        gateway_timeout: Duration::from_millis(100),
        cache_max_age: Duration::from_secs(60),
    }
}

/// Client wired to the mocks, with a temporary registry.
pub fn test_client(
    config: HawserConfig,
    pinning: Arc<MockPinningService>,
    fetcher: Arc<MockGatewayFetcher>,
) -> HawserClient {
    HawserClient::new(
        config,
        pinning,
        PinRegistry::open_temporary().expect("temp registry"),
    )
    .expect("client construction")
    .with_gateway_fetcher(fetcher)
}
