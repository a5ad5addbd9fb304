//! Airdrop funding for the scenario's paying identities

use futures::future::try_join_all;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use tracing::{debug, info};

use crate::rpc::{LedgerRpc, RpcError};

/// 10 SOL
pub const DEFAULT_AIRDROP_LAMPORTS: u64 = 10_000_000_000;

async fn airdrop_one(rpc: &dyn LedgerRpc, address: &Pubkey, lamports: u64) -> Result<Signature, RpcError> {
    let signature = rpc.request_airdrop(address, lamports).await?;
    debug!(address = %address, signature = %signature, "Airdrop requested");
    rpc.confirm_signature(&signature).await?;
    Ok(signature)
}

/// Airdrop `lamports` to every address and wait for all confirmations
///
/// Requests run concurrently. Signatures come back in input order. The
/// first failure fails the whole call.
pub async fn airdrop(
    rpc: &dyn LedgerRpc,
    lamports: u64,
    addresses: &[Pubkey],
) -> Result<Vec<Signature>, RpcError> {
    let signatures = try_join_all(
        addresses
            .iter()
            .map(|address| airdrop_one(rpc, address, lamports)),
    )
    .await?;

    info!(
        count = addresses.len(),
        lamports = lamports,
        "Airdrops confirmed"
    );
    Ok(signatures)
}
