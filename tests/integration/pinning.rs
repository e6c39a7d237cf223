//! Pin management tests: remote-then-local ordering, idempotence, scope
//! isolation, and the full upload-pin-retrieve pipeline.

use std::sync::Arc;

use hawser_client::{ClientError, HawserClient};
use hawser_integration_tests::{
    GatewayBehavior, MockGatewayFetcher, MockPinningService, gateway_url, test_client, test_config,
    test_payload,
};
use hawser_net::NetError;
use hawser_types::{ContentId, PinScope};

fn pin_client() -> (Arc<MockPinningService>, Arc<MockGatewayFetcher>, HawserClient) {
    let pinning = MockPinningService::new();
    let fetcher = MockGatewayFetcher::new();
    let client = test_client(
        test_config(vec![gateway_url(1)]),
        pinning.clone(),
        fetcher.clone(),
    );
    (pinning, fetcher, client)
}

/// A pin lands remotely first and the registry records the confirmed
/// state.
#[tokio::test]
async fn test_pin_records_confirmed_state() {
    let (pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    client.pin(&id, PinScope::Remote).await.unwrap();

    assert!(pinning.is_pinned(&id));
    let records = client.list_pinned(PinScope::Remote).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].content_id, id);
    assert!(records[0].pinned);
}

/// Pinning twice leaves a single record.
#[tokio::test]
async fn test_pin_is_idempotent() {
    let (_pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    client.pin(&id, PinScope::Remote).await.unwrap();
    client.pin(&id, PinScope::Remote).await.unwrap();

    assert_eq!(client.list_pinned(PinScope::Remote).unwrap().len(), 1);
}

/// Unpinning drops the identifier from the pinned list but keeps its
/// history in the registry.
#[tokio::test]
async fn test_unpin_releases_but_keeps_history() {
    let (pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    client.pin(&id, PinScope::Remote).await.unwrap();
    client.unpin(&id, PinScope::Remote).await.unwrap();

    assert!(!pinning.is_pinned(&id));
    assert!(client.list_pinned(PinScope::Remote).unwrap().is_empty());

    let record = client.registry().get(&id, PinScope::Remote).unwrap().unwrap();
    assert!(!record.pinned, "record stays behind with pinned=false");
}

/// A failed remote unpin leaves the local record pinned.
#[tokio::test]
async fn test_failed_unpin_preserves_pinned_state() {
    let (pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    client.pin(&id, PinScope::Remote).await.unwrap();
    pinning.set_fail_pin_calls(true);

    let err = client.unpin(&id, PinScope::Remote).await.unwrap_err();
    assert!(matches!(err, ClientError::Net(NetError::PinFailed(_))));

    let records = client.list_pinned(PinScope::Remote).unwrap();
    assert_eq!(records.len(), 1, "failed unpin must not clear the pin");
    assert!(records[0].pinned);
}

/// A failed remote pin records nothing locally.
#[tokio::test]
async fn test_failed_pin_records_nothing() {
    let (pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    pinning.set_fail_pin_calls(true);
    let err = client.pin(&id, PinScope::Remote).await.unwrap_err();

    assert!(matches!(err, ClientError::Net(NetError::PinFailed(_))));
    assert!(client.registry().get(&id, PinScope::Remote).unwrap().is_none());
    assert!(client.list_pinned(PinScope::Remote).unwrap().is_empty());
}

/// Local and remote scopes for the same identifier move independently.
#[tokio::test]
async fn test_scopes_track_independently() {
    let (_pinning, _fetcher, client) = pin_client();
    let id = ContentId::from("bafy-1");

    client.pin(&id, PinScope::Local).await.unwrap();
    client.pin(&id, PinScope::Remote).await.unwrap();
    client.unpin(&id, PinScope::Local).await.unwrap();

    assert_eq!(client.list_pinned(PinScope::Remote).unwrap().len(), 1);
    assert!(client.list_pinned(PinScope::Local).unwrap().is_empty());

    let local = client.registry().get(&id, PinScope::Local).unwrap().unwrap();
    assert!(!local.pinned);
}

/// Upload, pin, then retrieve the same content through a gateway.
#[tokio::test]
async fn test_upload_pin_retrieve_pipeline() {
    let (pinning, fetcher, client) = pin_client();
    let payload = test_payload(64);

    let receipt = client.upload(payload.clone(), "cred").await.unwrap();
    client.pin(&receipt.content_id, PinScope::Remote).await.unwrap();

    assert_eq!(pinning.stored_payload(&receipt.content_id), Some(payload.clone()));

    fetcher.set(&gateway_url(1), GatewayBehavior::Serve(payload.clone()));
    let got = client.retrieve(&receipt.content_id).await.unwrap();

    assert_eq!(got, payload);
    assert_eq!(client.list_pinned(PinScope::Remote).unwrap().len(), 1);
}
