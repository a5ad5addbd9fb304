//! Airdrop funding

use solana_sdk::{pubkey::Pubkey, signature::Signer};

use super::test_helpers::{driver_with, mock_config};
use crate::errors::DriverError;
use crate::funding::{airdrop, DEFAULT_AIRDROP_LAMPORTS};
use crate::rpc::RpcError;
use crate::test_utils::{test_participants, MockLedger};

#[tokio::test]
async fn test_airdrop_every_address() {
    let ledger = MockLedger::new();
    let addresses = [Pubkey::new_unique(), Pubkey::new_unique()];

    let signatures = airdrop(&ledger, DEFAULT_AIRDROP_LAMPORTS, &addresses)
        .await
        .unwrap();

    assert_eq!(signatures.len(), 2);
    assert_ne!(signatures[0], signatures[1]);
    let recorded = ledger.airdrops().await;
    assert_eq!(recorded.len(), 2);
    for address in &addresses {
        assert!(recorded.contains(&(*address, 10_000_000_000)));
    }

    let confirmed = ledger.confirmed_signatures().await;
    for signature in &signatures {
        assert!(confirmed.contains(signature));
    }
}

#[tokio::test]
async fn test_confirmation_failure_fails_helper() {
    let ledger = MockLedger::new();
    ledger.fail_confirmations().await;
    let addresses = [Pubkey::new_unique(), Pubkey::new_unique()];

    let result = airdrop(&ledger, DEFAULT_AIRDROP_LAMPORTS, &addresses).await;

    assert!(matches!(result, Err(RpcError::TransactionExpired { .. })));
    assert!(ledger.confirmed_signatures().await.is_empty());
}

#[tokio::test]
async fn test_airdrop_failure_fails_helper() {
    let ledger = MockLedger::new();
    ledger.fail_airdrops().await;

    let result = airdrop(&ledger, 1, &[Pubkey::new_unique()]).await;

    assert!(matches!(result, Err(RpcError::AirdropUnavailable { .. })));
}

#[tokio::test]
async fn test_scenario_funds_creator_and_fee_payer() {
    let ledger = MockLedger::new();
    let participants = test_participants();
    let mut driver = driver_with(&ledger, mock_config());

    let report = driver.run(&participants).await.unwrap();

    assert_eq!(report.funding.len(), 2);
    let funded: Vec<Pubkey> = ledger.airdrops().await.into_iter().map(|(k, _)| k).collect();
    assert!(funded.contains(&participants.creator.pubkey()));
    assert!(funded.contains(&participants.fee_payer.pubkey()));
    assert!(!funded.contains(&participants.leaf_owner.pubkey()));
}

#[tokio::test]
async fn test_scenario_aborts_when_funding_fails() {
    let ledger = MockLedger::new();
    ledger.fail_airdrops().await;
    let mut driver = driver_with(&ledger, mock_config());

    let err = driver.run(&test_participants()).await.unwrap_err();

    assert!(matches!(err, DriverError::Rpc(RpcError::AirdropUnavailable { .. })));
    assert_eq!(ledger.send_attempts().await, 0);
}

#[tokio::test]
async fn test_funding_disabled() {
    let ledger = MockLedger::new();
    let mut config = mock_config();
    config.funding.enabled = false;
    let mut driver = driver_with(&ledger, config);

    let report = driver.run(&test_participants()).await.unwrap();

    assert!(report.funding.is_empty());
    assert!(ledger.airdrops().await.is_empty());
}
