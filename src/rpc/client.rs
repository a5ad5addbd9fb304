//! `LedgerRpc` implementation over the non-blocking Solana RPC client

use std::time::Duration;

use async_trait::async_trait;
use solana_client::{
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcSendTransactionConfig, RpcSimulateTransactionConfig},
};
use solana_sdk::{
    commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use tracing::debug;

use super::{LedgerRpc, RpcError, SimulationOutcome};
use crate::tx_builder::ValidityAnchor;

const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Ledger RPC backed by a single Solana JSON-RPC endpoint
pub struct SolanaRpc {
    client: RpcClient,
    endpoint: String,
    commitment: CommitmentConfig,
    blockhash_commitment: CommitmentConfig,
}

impl SolanaRpc {
    pub fn new(
        endpoint: &str,
        timeout: Duration,
        commitment: CommitmentConfig,
        blockhash_commitment: CommitmentConfig,
    ) -> Self {
        Self {
            client: RpcClient::new_with_timeout_and_commitment(
                endpoint.to_string(),
                timeout,
                commitment,
            ),
            endpoint: endpoint.to_string(),
            commitment,
            blockhash_commitment,
        }
    }

    /// Wrap an existing client (mock senders in tests)
    pub fn from_client(
        client: RpcClient,
        endpoint: &str,
        commitment: CommitmentConfig,
        blockhash_commitment: CommitmentConfig,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            commitment,
            blockhash_commitment,
        }
    }

    fn map_err(&self, operation: &'static str) -> impl Fn(solana_client::client_error::ClientError) -> RpcError + '_ {
        move |e| RpcError::from_client_error(e, operation, &self.endpoint)
    }
}

#[async_trait]
impl LedgerRpc for SolanaRpc {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_airdrop(&self, to: &Pubkey, lamports: u64) -> Result<Signature, RpcError> {
        self.client
            .request_airdrop(to, lamports)
            .await
            .map_err(self.map_err("request_airdrop"))
    }

    async fn confirm_signature(&self, signature: &Signature) -> Result<(), RpcError> {
        // Bound the wait by the lifetime of a blockhash fetched now, the same
        // window a transaction signed now would have.
        let anchor = self.latest_blockhash().await?;

        loop {
            let status = self
                .client
                .get_signature_status_with_commitment(signature, self.commitment)
                .await
                .map_err(self.map_err("confirm_signature"))?;

            match status {
                Some(Ok(())) => return Ok(()),
                Some(Err(e)) => {
                    return Err(RpcError::TransactionFailed {
                        signature: signature.to_string(),
                        message: e.to_string(),
                    })
                }
                None => {}
            }

            let height = self.block_height().await?;
            if anchor.is_expired_at(height) {
                return Err(RpcError::TransactionExpired {
                    endpoint: self.endpoint.clone(),
                });
            }

            debug!(signature = %signature, block_height = height, "Awaiting confirmation");
            tokio::time::sleep(CONFIRM_POLL_INTERVAL).await;
        }
    }

    async fn latest_blockhash(&self) -> Result<ValidityAnchor, RpcError> {
        let (blockhash, last_valid_block_height) = self
            .client
            .get_latest_blockhash_with_commitment(self.blockhash_commitment)
            .await
            .map_err(self.map_err("get_latest_blockhash"))?;
        Ok(ValidityAnchor {
            blockhash,
            last_valid_block_height,
        })
    }

    async fn block_height(&self) -> Result<u64, RpcError> {
        self.client
            .get_block_height()
            .await
            .map_err(self.map_err("get_block_height"))
    }

    async fn minimum_balance_for_rent_exemption(&self, space: usize) -> Result<u64, RpcError> {
        self.client
            .get_minimum_balance_for_rent_exemption(space)
            .await
            .map_err(self.map_err("get_minimum_balance_for_rent_exemption"))
    }

    async fn simulate(&self, tx: &Transaction) -> Result<SimulationOutcome, RpcError> {
        let config = RpcSimulateTransactionConfig {
            sig_verify: false,
            replace_recent_blockhash: true,
            commitment: Some(self.commitment),
            ..Default::default()
        };
        let response = self
            .client
            .simulate_transaction_with_config(tx, config)
            .await
            .map_err(self.map_err("simulate_transaction"))?;

        let value = response.value;
        Ok(SimulationOutcome {
            err: value.err.map(|e| e.to_string()),
            units_consumed: value.units_consumed,
            logs: value.logs.unwrap_or_default(),
        })
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<Signature, RpcError> {
        let config = RpcSendTransactionConfig {
            skip_preflight: true,
            preflight_commitment: Some(self.commitment.commitment),
            ..Default::default()
        };
        self.client
            .send_transaction_with_config(tx, config)
            .await
            .map_err(self.map_err("send_transaction"))
    }
}
