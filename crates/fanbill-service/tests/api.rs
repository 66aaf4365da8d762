//! Integration tests for the operational API surface.

mod common;

use common::TestHarness;

use serde_json::{json, Value};

use fanbill_core::{CreatorId, UserId};

#[tokio::test]
async fn health_is_public() {
    let harness = TestHarness::new();
    let response = harness.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], json!("ok"));
}

#[tokio::test]
async fn operational_endpoints_require_api_key() {
    let harness = TestHarness::new();
    let creator_id = CreatorId::generate();

    let response = harness
        .server
        .get(&format!("/v1/referrals/{creator_id}"))
        .await;
    response.assert_status_unauthorized();

    let response = harness
        .server
        .get("/v1/ledger/transactions")
        .add_query_param("payee_id", "PLATFORM")
        .add_header("x-api-key", "wrong-key")
        .await;
    response.assert_status_unauthorized();
}

#[tokio::test]
async fn referral_pointer_roundtrip() {
    let harness = TestHarness::new();
    let creator_id = CreatorId::generate();
    let referrer_id = CreatorId::generate();

    // Initially unset
    let response = harness
        .server
        .get(&format!("/v1/referrals/{creator_id}"))
        .add_header("x-api-key", harness.service_api_key.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["referred_by"], Value::Null);

    // Set and read back
    let response = harness
        .server
        .put(&format!("/v1/referrals/{creator_id}"))
        .add_header("x-api-key", harness.service_api_key.clone())
        .json(&json!({ "referred_by": referrer_id.to_string() }))
        .await;
    response.assert_status_ok();

    let response = harness
        .server
        .get(&format!("/v1/referrals/{creator_id}"))
        .add_header("x-api-key", harness.service_api_key.clone())
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["referred_by"], json!(referrer_id.to_string()));
}

#[tokio::test]
async fn self_referral_is_rejected() {
    let harness = TestHarness::new();
    let creator_id = CreatorId::generate();

    let response = harness
        .server
        .put(&format!("/v1/referrals/{creator_id}"))
        .add_header("x-api-key", harness.service_api_key.clone())
        .json(&json!({ "referred_by": creator_id.to_string() }))
        .await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn missing_subscription_is_not_found() {
    let harness = TestHarness::new();
    let response = harness
        .server
        .get(&format!("/v1/subscriptions/{}", UserId::generate()))
        .add_header("x-api-key", harness.service_api_key.clone())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn empty_ledger_lists_nothing() {
    let harness = TestHarness::new();
    let response = harness
        .server
        .get("/v1/ledger/transactions")
        .add_query_param("payee_id", CreatorId::generate().to_string())
        .add_header("x-api-key", harness.service_api_key.clone())
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn missing_transaction_is_not_found() {
    let harness = TestHarness::new();
    let response = harness
        .server
        .get(&format!(
            "/v1/ledger/transactions/{}",
            fanbill_core::TransactionId::generate()
        ))
        .add_header("x-api-key", harness.service_api_key.clone())
        .await;
    response.assert_status_not_found();
}
