//! Validity anchor management
//!
//! A transaction is only accepted while the block height has not passed the
//! `last_valid_block_height` of its blockhash. `AnchorCache` keeps the last
//! fetched anchor and replaces it as soon as it is known to be expired, so a
//! transaction is never signed with a stale one.

use solana_sdk::hash::Hash;
use tracing::debug;

use crate::rpc::LedgerRpc;
use crate::tx_builder::errors::TransactionBuilderError;

/// Recent blockhash plus the last block height at which it is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityAnchor {
    pub blockhash: Hash,
    pub last_valid_block_height: u64,
}

impl ValidityAnchor {
    /// Expired once the chain has moved past the last valid height
    pub fn is_expired_at(&self, block_height: u64) -> bool {
        block_height > self.last_valid_block_height
    }
}

/// Caches the most recent anchor across the scenario's transactions
#[derive(Debug, Default)]
pub struct AnchorCache {
    cached: Option<ValidityAnchor>,
    refreshes: u64,
}

impl AnchorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with a previously fetched anchor
    pub fn with_anchor(anchor: ValidityAnchor) -> Self {
        Self {
            cached: Some(anchor),
            refreshes: 0,
        }
    }

    pub fn cached(&self) -> Option<ValidityAnchor> {
        self.cached
    }

    /// Number of times a new anchor had to be fetched
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Return an anchor that is valid at the current block height
    ///
    /// Reuses the cached anchor while it is valid; otherwise fetches a new
    /// one. A freshly fetched anchor that is already expired is an error.
    pub async fn fresh(
        &mut self,
        rpc: &dyn LedgerRpc,
    ) -> Result<ValidityAnchor, TransactionBuilderError> {
        let height = rpc.block_height().await?;

        if let Some(anchor) = self.cached {
            if !anchor.is_expired_at(height) {
                return Ok(anchor);
            }
            debug!(
                blockhash = %anchor.blockhash,
                last_valid_block_height = anchor.last_valid_block_height,
                block_height = height,
                "Cached blockhash expired, fetching a new one"
            );
        }

        let anchor = rpc.latest_blockhash().await?;
        self.refreshes += 1;

        if anchor.is_expired_at(height) {
            return Err(TransactionBuilderError::blockhash_unavailable(format!(
                "node returned blockhash {} valid until {} but block height is {}",
                anchor.blockhash, anchor.last_valid_block_height, height
            )));
        }

        self.cached = Some(anchor);
        Ok(anchor)
    }
}
