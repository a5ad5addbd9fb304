//! Priority fees attached during a scenario run

use mockito::Matcher;
use serde_json::json;
use solana_sdk::compute_budget::ComputeBudgetInstruction;

use super::test_helpers::{driver_with, mock_config};
use crate::errors::DriverError;
use crate::priority_fee::PriorityFeeError;
use crate::test_utils::{test_participants, MockLedger};

const ESTIMATE: &str = r#"{
    "jsonrpc": "2.0",
    "id": 1,
    "result": {
        "context": { "slot": 1 },
        "per_compute_unit": {
            "extreme": 500000,
            "high": 260140,
            "medium": 10714,
            "low": 100,
            "percentiles": { "50": 10714 }
        }
    }
}"#;

#[tokio::test]
async fn test_fee_attached_to_every_transaction() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "qn_estimatePriorityFees",
            "params": { "api_version": 2, "last_n_blocks": 100 }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ESTIMATE)
        .expect(3)
        .create_async()
        .await;

    let ledger = MockLedger::new();
    let mut config = mock_config();
    config.priority_fee.enabled = true;
    config.priority_fee.endpoint = Some(server.url());
    config.priority_fee.last_n_blocks = Some(100);
    let mut driver = driver_with(&ledger, config);

    let report = driver.run(&test_participants()).await.unwrap();

    assert!(report.is_complete());
    let price = ComputeBudgetInstruction::set_compute_unit_price(260_140);
    for tx in ledger.sent_transactions().await {
        assert_eq!(tx.message.instructions[1].data, price.data);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_configured_level_used() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(ESTIMATE)
        .create_async()
        .await;

    let ledger = MockLedger::new();
    let mut config = mock_config();
    config.priority_fee.enabled = true;
    config.priority_fee.endpoint = Some(server.url());
    config.priority_fee.level = "medium".to_string();
    let mut driver = driver_with(&ledger, config);

    driver.run(&test_participants()).await.unwrap();

    let price = ComputeBudgetInstruction::set_compute_unit_price(10_714);
    let sent = ledger.sent_transactions().await;
    assert_eq!(sent[0].message.instructions[1].data, price.data);
}

#[tokio::test]
async fn test_missing_level_aborts_tree_step() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(ESTIMATE)
        .create_async()
        .await;

    let ledger = MockLedger::new();
    let mut config = mock_config();
    config.priority_fee.enabled = true;
    config.priority_fee.endpoint = Some(server.url());
    config.priority_fee.level = "ultra".to_string();
    let mut driver = driver_with(&ledger, config);

    let err = driver.run(&test_participants()).await.unwrap_err();

    assert!(matches!(
        err,
        DriverError::PriorityFee(PriorityFeeError::MissingLevel(_))
    ));
    assert_eq!(ledger.send_attempts().await, 0);
}

#[tokio::test]
async fn test_endpoint_http_error_surfaces() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/")
        .with_status(429)
        .create_async()
        .await;

    let ledger = MockLedger::new();
    let mut config = mock_config();
    config.priority_fee.enabled = true;
    config.priority_fee.endpoint = Some(server.url());
    let mut driver = driver_with(&ledger, config);

    let err = driver.run(&test_participants()).await.unwrap_err();

    assert_eq!(err.category(), "priority_fee");
}
