//! Structured logging for scenario runs
//!
//! Events go to three targets: `log` (identities and derived addresses),
//! `compute` (compute-unit estimates and limits) and `tx_id` (submitted
//! transaction signatures). Every event carries the run id.

use solana_sdk::{pubkey::Pubkey, signature::Signature};
use uuid::Uuid;

use crate::errors::DriverError;

/// Structured logger for scenario events
#[derive(Debug, Clone)]
pub struct ScenarioLogger {
    run_id: String,
}

impl ScenarioLogger {
    pub fn new(run_id: String) -> Self {
        Self { run_id }
    }

    /// Logger tagged with a fresh v4 UUID
    pub fn for_new_run() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn address(&self, label: &str, address: &Pubkey) {
        tracing::info!(
            target: "log",
            run_id = %self.run_id,
            label = %label,
            address = %address,
            "{label} {address}"
        );
    }

    pub fn tree_size(&self, max_depth: u32, max_buffer_size: u32, bytes: usize, rent_lamports: u64) {
        tracing::info!(
            target: "log",
            run_id = %self.run_id,
            max_depth = max_depth,
            max_buffer_size = max_buffer_size,
            bytes = bytes,
            rent_lamports = rent_lamports,
            "Merkle tree account sized"
        );
    }

    pub fn compute(&self, step: &str, estimate: Option<u64>, limit: u32) {
        tracing::info!(
            target: "compute",
            run_id = %self.run_id,
            step = %step,
            estimate = ?estimate,
            limit = limit,
            "Compute units required to {step}"
        );
    }

    pub fn priority_fee(&self, step: &str, level: &str, micro_lamports: u64) {
        tracing::info!(
            target: "compute",
            run_id = %self.run_id,
            step = %step,
            level = %level,
            micro_lamports = micro_lamports,
            "Priority fee attached"
        );
    }

    pub fn tx_id(&self, step: &str, signature: &Signature) {
        tracing::info!(
            target: "tx_id",
            run_id = %self.run_id,
            step = %step,
            signature = %signature,
            "Transaction id for {step}: {signature}"
        );
    }

    pub fn step_failed(&self, step: &str, error: &DriverError) {
        tracing::error!(
            run_id = %self.run_id,
            step = %step,
            category = error.category(),
            error = %error,
            "Step failed"
        );
    }

    pub fn step_skipped(&self, step: &str, reason: &str) {
        tracing::warn!(
            run_id = %self.run_id,
            step = %step,
            reason = %reason,
            "Step skipped"
        );
    }
}

impl Default for ScenarioLogger {
    fn default() -> Self {
        Self::for_new_run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = ScenarioLogger::for_new_run();
        let b = ScenarioLogger::for_new_run();
        assert_ne!(a.run_id(), b.run_id());
        assert!(Uuid::parse_str(a.run_id()).is_ok());
    }
}
