//! Compute-unit estimation through simulation
//!
//! The candidate instructions are simulated once with the maximum compute
//! ceiling and a placeholder blockhash (the node replaces it). The consumed
//! units then size the real transaction's compute-unit limit.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, hash::Hash, instruction::Instruction,
    message::Message, pubkey::Pubkey, transaction::Transaction,
};
use tracing::debug;

use crate::rpc::LedgerRpc;
use crate::tx_builder::errors::TransactionBuilderError;

/// Highest compute-unit limit a transaction may request
pub const MAX_COMPUTE_UNITS: u32 = 1_400_000;
/// Limit used when no estimate is available
pub const DEFAULT_COMPUTE_UNITS: u32 = 500_000;
/// Floor applied to estimated limits
pub const MIN_COMPUTE_UNITS: u32 = 1_000;

/// Build the unsigned trial transaction that gets simulated
pub fn build_sim_tx(instructions: &[Instruction], payer: &Pubkey) -> Transaction {
    let mut sim_ixs = Vec::with_capacity(instructions.len() + 1);
    sim_ixs.push(ComputeBudgetInstruction::set_compute_unit_limit(
        MAX_COMPUTE_UNITS,
    ));
    sim_ixs.extend_from_slice(instructions);

    let mut message = Message::new(&sim_ixs, Some(payer));
    message.recent_blockhash = Hash::default();
    Transaction::new_unsigned(message)
}

/// Simulate `instructions` paid by `payer` and return the consumed units
///
/// Returns `Ok(None)` when the simulation ran but reported an execution
/// error (or no unit count). Only transport-level failures are errors.
pub async fn estimate_compute_units(
    rpc: &dyn LedgerRpc,
    instructions: &[Instruction],
    payer: &Pubkey,
) -> Result<Option<u64>, TransactionBuilderError> {
    if instructions.is_empty() {
        return Err(TransactionBuilderError::Simulation(
            "nothing to simulate".to_string(),
        ));
    }

    let sim_tx = build_sim_tx(instructions, payer);
    let outcome = rpc.simulate(&sim_tx).await?;

    if let Some(err) = outcome.err {
        debug!(
            error = %err,
            logs = ?outcome.logs,
            "Simulation reported an execution error, no CU estimate"
        );
        return Ok(None);
    }

    Ok(outcome.units_consumed)
}

/// Turn an estimate into a compute-unit limit
///
/// Adds `margin_percent` on top of the estimate and clamps the result to
/// `[MIN_COMPUTE_UNITS, MAX_COMPUTE_UNITS]`. Without an estimate the fixed
/// `DEFAULT_COMPUTE_UNITS` is used.
pub fn compute_unit_limit(estimate: Option<u64>, margin_percent: u32) -> u32 {
    match estimate {
        Some(units) => {
            let with_margin = units.saturating_mul(100 + u64::from(margin_percent)) / 100;
            with_margin.clamp(u64::from(MIN_COMPUTE_UNITS), u64::from(MAX_COMPUTE_UNITS)) as u32
        }
        None => DEFAULT_COMPUTE_UNITS,
    }
}
