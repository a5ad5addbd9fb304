//! Program-derived address helpers
//!
//! All addresses here are pure functions of their seeds and the owning
//! program; nothing is fetched from the network.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address_with_program_id;

use crate::program::{MPL_BUBBLEGUM_PROGRAM_ID, TOKEN_METADATA_PROGRAM_ID};

pub const METADATA_SEED: &[u8] = b"metadata";
pub const EDITION_SEED: &[u8] = b"edition";

/// Tree config account owned by Bubblegum, seeded by the tree address
pub fn tree_authority(merkle_tree: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[merkle_tree.as_ref()], &MPL_BUBBLEGUM_PROGRAM_ID)
}

/// Token Metadata account of a mint
pub fn metadata(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Master edition account of a mint
pub fn master_edition(mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
            EDITION_SEED,
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
}

/// Associated token account of `wallet` for `mint` under `token_program`
pub fn associated_token(wallet: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(wallet, mint, token_program)
}

/// Every address the collection steps need, derived from one mint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionAddresses {
    pub mint: Pubkey,
    pub metadata: Pubkey,
    pub master_edition: Pubkey,
    pub associated_token: Pubkey,
}

impl CollectionAddresses {
    pub fn derive(mint: Pubkey, owner: &Pubkey, token_program: &Pubkey) -> Self {
        Self {
            mint,
            metadata: metadata(&mint).0,
            master_edition: master_edition(&mint).0,
            associated_token: associated_token(owner, &mint, token_program),
        }
    }
}
