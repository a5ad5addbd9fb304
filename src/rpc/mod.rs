//! Ledger RPC seam
//!
//! The scenario only needs a handful of ledger operations. They are
//! expressed as a trait so the driver can run against a live node
//! (`SolanaRpc`) or the in-memory mock used by the tests.

use async_trait::async_trait;
use solana_sdk::{pubkey::Pubkey, signature::Signature, transaction::Transaction};

pub mod client;
pub mod errors;

pub use client::SolanaRpc;
pub use errors::RpcError;

use crate::tx_builder::ValidityAnchor;

/// Result of a `simulateTransaction` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Execution error reported by the simulator, if any
    pub err: Option<String>,
    pub units_consumed: Option<u64>,
    pub logs: Vec<String>,
}

/// Ledger operations used by the scenario driver
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Endpoint URL, used for error context and as the default fee endpoint
    fn endpoint(&self) -> &str;

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError>;

    /// Wait until the signature reaches the configured commitment
    ///
    /// Fails if the transaction landed with an error.
    async fn confirm_signature(&self, signature: &Signature) -> Result<(), RpcError>;

    async fn latest_blockhash(&self) -> Result<ValidityAnchor, RpcError>;

    async fn block_height(&self) -> Result<u64, RpcError>;

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64, RpcError>;

    /// Simulate without signature verification, replacing the blockhash
    async fn simulate(&self, tx: &Transaction) -> Result<SimulationOutcome, RpcError>;

    /// Submit with preflight skipped
    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, RpcError>;
}
