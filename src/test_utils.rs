//! Test Utilities Module
//!
//! In-memory ledger used to run the scenario deterministically, without a
//! validator. Records every airdrop and submitted transaction so tests can
//! inspect what the driver sent.
//!
//! These utilities are only compiled when running tests or when the
//! `test_utils` feature is enabled.

#![cfg(any(test, feature = "test_utils"))]

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};
use tokio::sync::Mutex;

use crate::rpc::{LedgerRpc, RpcError, SimulationOutcome};
use crate::tx_builder::ValidityAnchor;
use crate::wallet::Participants;

pub const MOCK_ENDPOINT: &str = "mock://ledger";

/// Blocks a mock blockhash stays valid for
pub const MOCK_BLOCKHASH_LIFETIME: u64 = 150;

/// Units reported by a successful mock simulation
pub const MOCK_UNITS_CONSUMED: u64 = 42_000;

#[derive(Default)]
struct LedgerState {
    /// Heights still to be reported; the last one sticks
    heights: VecDeque<u64>,
    current_height: u64,
    simulation: SimulationOutcome,
    failing_sends: HashSet<usize>,
    airdrops_fail: bool,
    confirmations_fail: bool,
    send_count: usize,
    sent: Vec<Transaction>,
    simulated: Vec<Transaction>,
    airdrops: Vec<(Pubkey, u64)>,
    confirmed: Vec<Signature>,
    blockhashes_served: Vec<ValidityAnchor>,
}

/// Mock ledger implementing `LedgerRpc`
#[derive(Clone)]
pub struct MockLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MockLedger {
    /// Ledger at height 100 whose simulations succeed
    pub fn new() -> Self {
        let state = LedgerState {
            current_height: 100,
            simulation: SimulationOutcome {
                err: None,
                units_consumed: Some(MOCK_UNITS_CONSUMED),
                logs: vec!["Program log: mock".to_string()],
            },
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Report these block heights, one per `block_height` call
    pub async fn set_block_heights(&self, heights: impl IntoIterator<Item = u64>) {
        let mut state = self.state.lock().await;
        state.heights = heights.into_iter().collect();
    }

    pub async fn set_simulation(&self, outcome: SimulationOutcome) {
        self.state.lock().await.simulation = outcome;
    }

    /// Make the n-th `send_transaction` call (0-based) fail
    pub async fn fail_send_at(&self, index: usize) {
        self.state.lock().await.failing_sends.insert(index);
    }

    pub async fn fail_airdrops(&self) {
        self.state.lock().await.airdrops_fail = true;
    }

    /// Every confirmation wait fails as if the blockhash expired
    pub async fn fail_confirmations(&self) {
        self.state.lock().await.confirmations_fail = true;
    }

    pub async fn sent_transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.sent.clone()
    }

    pub async fn simulated_transactions(&self) -> Vec<Transaction> {
        self.state.lock().await.simulated.clone()
    }

    pub async fn send_attempts(&self) -> usize {
        self.state.lock().await.send_count
    }

    pub async fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().await.airdrops.clone()
    }

    pub async fn confirmed_signatures(&self) -> Vec<Signature> {
        self.state.lock().await.confirmed.clone()
    }

    pub async fn blockhashes_served(&self) -> Vec<ValidityAnchor> {
        self.state.lock().await.blockhashes_served.clone()
    }
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError> {
        let mut state = self.state.lock().await;
        if state.airdrops_fail {
            return Err(RpcError::AirdropUnavailable {
                endpoint: MOCK_ENDPOINT.to_string(),
                message: "faucet disabled".to_string(),
            });
        }
        state.airdrops.push((*to, lamports));
        let mut bytes = [0u8; 64];
        bytes[..8].copy_from_slice(&(state.airdrops.len() as u64).to_le_bytes());
        Ok(Signature::from(bytes))
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<(), RpcError> {
        let mut state = self.state.lock().await;
        if state.confirmations_fail {
            return Err(RpcError::TransactionExpired {
                endpoint: MOCK_ENDPOINT.to_string(),
            });
        }
        state.confirmed.push(*signature);
        Ok(())
    }

    async fn latest_blockhash(&self) -> Result<ValidityAnchor, RpcError> {
        let mut state = self.state.lock().await;
        let anchor = ValidityAnchor {
            blockhash: Hash::new_unique(),
            last_valid_block_height: state.current_height + MOCK_BLOCKHASH_LIFETIME,
        };
        state.blockhashes_served.push(anchor);
        Ok(anchor)
    }

    async fn block_height(&self) -> Result<u64, RpcError> {
        let mut state = self.state.lock().await;
        let next = if state.heights.len() > 1 {
            state.heights.pop_front()
        } else {
            state.heights.front().copied()
        };
        if let Some(height) = next {
            state.current_height = height;
        }
        Ok(state.current_height)
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64, RpcError> {
        // 3480 lamports per byte-year, two years, 128 bytes of account overhead
        Ok((128 + space as u64) * 3480 * 2)
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulationOutcome, RpcError> {
        let mut state = self.state.lock().await;
        state.simulated.push(tx.clone());
        Ok(state.simulation.clone())
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, RpcError> {
        let mut state = self.state.lock().await;
        let index = state.send_count;
        state.send_count += 1;

        let signature = tx.signatures.first().copied().unwrap_or_default();
        if state.failing_sends.contains(&index) {
            return Err(RpcError::TransactionFailed {
                signature: signature.to_string(),
                message: "custom program error: 0x1".to_string(),
            });
        }

        state.sent.push(tx.clone());
        Ok(signature)
    }
}

/// Three freshly generated participants
pub fn test_participants() -> Participants {
    Participants {
        creator: Keypair::new(),
        fee_payer: Keypair::new(),
        leaf_owner: Keypair::new(),
    }
}
