//! Integration tests for PortalClient.
//!
//! Uses wiremock to stand in for the portal's `/skynet/registry` endpoint.

use std::sync::Arc;

use serde_json::json;
use skyns_core::{
    KeyDerivation, KeyPair, RegistryClient, RegistryEntry, RegistryUpdateFlow, SeedKeyDerivation,
    UpdateError, hash_data_key,
};
use skyns_portal::{PortalClient, PortalConfig};
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SKYLINK: &str = "XABvi7JtJbQSMAcDwnUnmp2FKDPjg8_tTTFP4BwMSxVdEg";

fn test_keys() -> KeyPair {
    SeedKeyDerivation.key_pair_from_seed("test-seed")
}

fn hashed_data_key() -> String {
    hex::encode(hash_data_key("test-key"))
}

fn create_test_client(mock_server: &MockServer) -> PortalClient {
    PortalClient::new(PortalConfig {
        url: mock_server.uri(),
        timeout_secs: 5,
    })
    .expect("failed to create client")
}

fn entry_response(keys: &KeyPair, revision: u64, data: &[u8]) -> serde_json::Value {
    let signed = RegistryEntry::new("test-key", revision, data.to_vec())
        .unwrap()
        .sign(&keys.private_key);
    json!({
        "data": hex::encode(data),
        "revision": revision,
        "signature": hex::encode(signed.signature.to_bytes()),
    })
}

#[tokio::test]
async fn test_get_entry_not_found() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .and(query_param("publickey", keys.public_key.to_portal_string()))
        .and(query_param("datakey", hashed_data_key()))
        .and(query_param("timeout", "5"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let entry = client
        .get_entry(&keys.public_key, "test-key")
        .await
        .expect("get failed");
    assert!(entry.is_none());
}

#[tokio::test]
async fn test_get_entry_success() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_response(
            &keys,
            5,
            SKYLINK.as_bytes(),
        )))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let signed = client
        .get_entry(&keys.public_key, "test-key")
        .await
        .expect("get failed")
        .expect("expected Some");
    assert_eq!(signed.entry.revision, 5);
    assert_eq!(signed.entry.data_key, "test-key");
    assert_eq!(signed.entry.data.as_ref(), SKYLINK.as_bytes());
    assert!(signed.verify(&keys.public_key));
}

#[tokio::test]
async fn test_get_entry_invalid_signature_is_ignored() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();
    let intruder = SeedKeyDerivation.key_pair_from_seed("intruder");

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_response(
            &intruder,
            9,
            b"forged",
        )))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let entry = client
        .get_entry(&keys.public_key, "test-key")
        .await
        .expect("get failed");
    assert!(entry.is_none());
}

#[tokio::test]
async fn test_get_entry_server_error() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client
        .get_entry(&keys.public_key, "test-key")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("internal error"));
}

#[tokio::test]
async fn test_set_entry_posts_signed_entry() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();
    let entry = RegistryEntry::new("test-key", 3, SKYLINK.as_bytes().to_vec()).unwrap();
    let signed = entry.clone().sign(&keys.private_key);

    Mock::given(method("POST"))
        .and(path("/skynet/registry"))
        .and(body_partial_json(json!({
            "publickey": {
                "algorithm": "ed25519",
                "key": keys.public_key.as_bytes().to_vec(),
            },
            "datakey": hashed_data_key(),
            "revision": 3,
            "data": SKYLINK.as_bytes().to_vec(),
            "signature": signed.signature.to_bytes().to_vec(),
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    client
        .set_entry(&keys.private_key, entry)
        .await
        .expect("set failed");
}

#[tokio::test]
async fn test_set_entry_rejected() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();

    Mock::given(method("POST"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(400).set_body_string(
            "{\"message\":\"unable to update the registry: provided revision number is invalid\"}",
        ))
        .mount(&mock_server)
        .await;

    let client = create_test_client(&mock_server);
    let err = client
        .set_entry(
            &keys.private_key,
            RegistryEntry::new("test-key", 0, &b"x"[..]).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(err.to_string().contains("400"));
    assert!(err.to_string().contains("revision number is invalid"));
}

#[tokio::test]
async fn test_update_flow_against_portal() {
    let mock_server = MockServer::start().await;
    let keys = test_keys();

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(200).set_body_json(entry_response(
            &keys,
            5,
            b"previous",
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/skynet/registry"))
        .and(body_partial_json(json!({ "revision": 6 })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let flow = RegistryUpdateFlow::new(Arc::new(create_test_client(&mock_server)));
    let uri = flow
        .update("test-seed", "test-key", SKYLINK)
        .await
        .expect("update failed");

    assert_eq!(
        uri.to_string(),
        format!(
            "skyns://ed25519%3A{}/{}",
            keys.public_key.to_hex(),
            hashed_data_key()
        )
    );
}

#[tokio::test]
async fn test_update_flow_write_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/skynet/registry"))
        .respond_with(ResponseTemplate::new(400).set_body_string("revision number too low"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let flow = RegistryUpdateFlow::new(Arc::new(create_test_client(&mock_server)));
    let err = flow
        .update("test-seed", "test-key", SKYLINK)
        .await
        .unwrap_err();
    assert!(matches!(err, UpdateError::WriteRejected(_)));
}

#[tokio::test]
async fn test_missing_input_sends_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&mock_server)
        .await;

    let flow = RegistryUpdateFlow::new(Arc::new(create_test_client(&mock_server)));
    let err = flow.update("", "test-key", SKYLINK).await.unwrap_err();
    assert!(matches!(err, UpdateError::MissingInput));
}
