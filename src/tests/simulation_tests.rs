//! Compute-unit estimation through the mock simulator

use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use super::test_helpers::{driver_with, mock_config, program_of};
use crate::rpc::SimulationOutcome;
use crate::test_utils::{test_participants, MockLedger, MOCK_UNITS_CONSUMED};
use crate::tx_builder::{estimate_compute_units, DEFAULT_COMPUTE_UNITS, MAX_COMPUTE_UNITS};

fn program_ix() -> Instruction {
    Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &[1],
        vec![AccountMeta::new(Pubkey::new_unique(), false)],
    )
}

#[tokio::test]
async fn test_estimate_returns_units() {
    let ledger = MockLedger::new();
    let payer = Pubkey::new_unique();

    let units = estimate_compute_units(&ledger, &[program_ix()], &payer)
        .await
        .unwrap();

    assert_eq!(units, Some(MOCK_UNITS_CONSUMED));

    let simulated = ledger.simulated_transactions().await;
    let tx = &simulated[0];
    assert_eq!(tx.message.account_keys[0], payer);
    let first = &tx.message.instructions[0];
    assert_eq!(program_of(tx, first), compute_budget::id());
    assert_eq!(
        first.data,
        ComputeBudgetInstruction::set_compute_unit_limit(MAX_COMPUTE_UNITS).data
    );
}

#[tokio::test]
async fn test_estimate_none_on_execution_error() {
    let ledger = MockLedger::new();
    ledger
        .set_simulation(SimulationOutcome {
            err: Some("InstructionError(0, Custom(6000))".to_string()),
            units_consumed: Some(1_200),
            logs: vec![],
        })
        .await;

    let units = estimate_compute_units(&ledger, &[program_ix()], &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(units, None);
}

#[tokio::test]
async fn test_estimate_none_without_unit_count() {
    let ledger = MockLedger::new();
    ledger.set_simulation(SimulationOutcome::default()).await;

    let units = estimate_compute_units(&ledger, &[program_ix()], &Pubkey::new_unique())
        .await
        .unwrap();

    assert_eq!(units, None);
}

#[tokio::test]
async fn test_scenario_falls_back_to_default_limit() {
    let ledger = MockLedger::new();
    ledger
        .set_simulation(SimulationOutcome {
            err: Some("AccountNotFound".to_string()),
            units_consumed: None,
            logs: vec![],
        })
        .await;
    let mut driver = driver_with(&ledger, mock_config());

    let report = driver.run(&test_participants()).await.unwrap();

    assert!(report.is_complete());
    let expected = ComputeBudgetInstruction::set_compute_unit_limit(DEFAULT_COMPUTE_UNITS);
    for tx in ledger.sent_transactions().await {
        assert_eq!(tx.message.instructions[0].data, expected.data);
    }
    // one simulation per submitted step
    assert_eq!(ledger.simulated_transactions().await.len(), 3);
}
