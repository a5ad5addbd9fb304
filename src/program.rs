//! Client-side instruction builders for the bubblegum-cpi program
//!
//! The program is an Anchor program, so every instruction is an 8-byte
//! discriminator (`sha256("global:<name>")[..8]`) followed by the Borsh
//! encoded arguments. Account metas are listed in the order the program's
//! `Accounts` structs declare them.

use borsh::BorshSerialize;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::errors::DriverError;

pub const BUBBLEGUM_CPI_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("F7uCq1ZAShY1bjMiMMwRkMsCdpgTgwhYtaQorHE9snca");
pub const MPL_BUBBLEGUM_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("BGUMAp9Gq7iTEuizy4pqaxsTyUCBK68MDfK752saRPUY");
pub const SPL_NOOP_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("noopb9bkMVfRPU8AsbpTUg8AQkHtKwMYZiFUjNRtMmV");
pub const SPL_ACCOUNT_COMPRESSION_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("cmtDvXumGCrqC1Age74AVPhSRVXJMd8PJS91L8KbNCK");
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");
pub const TOKEN_2022_PROGRAM_ID: Pubkey =
    solana_sdk::pubkey!("TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb");

/// Token Metadata limits enforced on-chain
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_URI_LENGTH: usize = 200;

/// Token program owning the collection mint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenProgram {
    #[default]
    #[serde(rename = "spl-token")]
    SplToken,
    #[serde(rename = "token-2022")]
    Token2022,
}

impl TokenProgram {
    pub fn id(&self) -> Pubkey {
        match self {
            Self::SplToken => spl_token::id(),
            Self::Token2022 => TOKEN_2022_PROGRAM_ID,
        }
    }
}

/// Anchor instruction discriminator
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut hasher = Sha256::new();
    hasher.update(format!("global:{}", name));
    let hash = hasher.finalize();
    let mut disc = [0u8; 8];
    disc.copy_from_slice(&hash[..8]);
    disc
}

fn instruction_data<T: BorshSerialize>(name: &str, args: &T) -> Result<Vec<u8>, DriverError> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)
        .map_err(|e| DriverError::Validation(format!("{} args: {}", name, e)))?;
    Ok(data)
}

/// Same checks the program runs before its CPI
pub fn validate_name(name: &str) -> Result<(), DriverError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_NAME_LENGTH {
        return Err(DriverError::Validation(format!(
            "name must be 1..={} bytes, got {:?}",
            MAX_NAME_LENGTH, name
        )));
    }
    Ok(())
}

pub fn validate_uri(uri: &str) -> Result<(), DriverError> {
    if uri.len() > MAX_URI_LENGTH {
        return Err(DriverError::Validation(format!(
            "uri longer than {} bytes",
            MAX_URI_LENGTH
        )));
    }
    Url::parse(uri).map_err(|e| DriverError::Validation(format!("invalid uri {:?}: {}", uri, e)))?;
    Ok(())
}

#[derive(BorshSerialize)]
struct CreateTreeArgs {
    max_depth: u32,
    max_buffer_size: u32,
    public: Option<bool>,
}

#[derive(BorshSerialize)]
struct MetadataArgs<'a> {
    uri: &'a str,
    name: &'a str,
}

/// Accounts of `create_tree`
#[derive(Debug, Clone, Copy)]
pub struct CreateTreeAccounts {
    pub tree_authority: Pubkey,
    pub merkle_tree: Pubkey,
    pub payer: Pubkey,
    pub tree_creator: Pubkey,
}

/// Accounts of `create_collection_nft`
#[derive(Debug, Clone, Copy)]
pub struct CreateCollectionAccounts {
    pub collection_mint: Pubkey,
    pub payer: Pubkey,
    pub wallet: Pubkey,
    pub token_metadata: Pubkey,
    pub master_edition: Pubkey,
    pub associated_token: Pubkey,
    pub token_program: Pubkey,
}

/// Accounts of `mint_comp_nft_to_collection`
#[derive(Debug, Clone, Copy)]
pub struct MintToCollectionAccounts {
    pub tree_config: Pubkey,
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub merkle_tree: Pubkey,
    pub payer: Pubkey,
    pub tree_creator: Pubkey,
    pub collection_authority: Pubkey,
    pub collection_mint: Pubkey,
    pub collection_metadata: Pubkey,
    pub edition_account: Pubkey,
}

pub fn create_tree(
    program_id: &Pubkey,
    accounts: &CreateTreeAccounts,
    max_depth: u32,
    max_buffer_size: u32,
    public: Option<bool>,
) -> Result<Instruction, DriverError> {
    let data = instruction_data(
        "create_tree",
        &CreateTreeArgs {
            max_depth,
            max_buffer_size,
            public,
        },
    )?;
    let metas = vec![
        AccountMeta::new(accounts.tree_authority, false),
        AccountMeta::new(accounts.merkle_tree, true),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(accounts.tree_creator, true),
        AccountMeta::new_readonly(SPL_NOOP_PROGRAM_ID, false),
        AccountMeta::new_readonly(SPL_ACCOUNT_COMPRESSION_PROGRAM_ID, false),
        AccountMeta::new_readonly(MPL_BUBBLEGUM_PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];
    Ok(Instruction::new_with_bytes(*program_id, &data, metas))
}

pub fn create_collection_nft(
    program_id: &Pubkey,
    accounts: &CreateCollectionAccounts,
    uri: &str,
    name: &str,
) -> Result<Instruction, DriverError> {
    validate_name(name)?;
    validate_uri(uri)?;

    let data = instruction_data("create_collection_nft", &MetadataArgs { uri, name })?;
    let metas = vec![
        AccountMeta::new(accounts.collection_mint, true),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(accounts.wallet, false),
        AccountMeta::new(accounts.token_metadata, false),
        AccountMeta::new(accounts.master_edition, false),
        AccountMeta::new(accounts.associated_token, false),
        AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
        AccountMeta::new_readonly(accounts.token_program, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
    ];
    Ok(Instruction::new_with_bytes(*program_id, &data, metas))
}

pub fn mint_comp_nft_to_collection(
    program_id: &Pubkey,
    accounts: &MintToCollectionAccounts,
    uri: &str,
    name: &str,
) -> Result<Instruction, DriverError> {
    validate_name(name)?;
    validate_uri(uri)?;

    let data = instruction_data("mint_comp_nft_to_collection", &MetadataArgs { uri, name })?;
    let metas = vec![
        AccountMeta::new(accounts.tree_config, false),
        AccountMeta::new_readonly(accounts.leaf_owner, false),
        AccountMeta::new_readonly(accounts.leaf_delegate, false),
        AccountMeta::new(accounts.merkle_tree, false),
        AccountMeta::new(accounts.payer, true),
        AccountMeta::new_readonly(accounts.tree_creator, true),
        AccountMeta::new_readonly(accounts.collection_authority, true),
        AccountMeta::new_readonly(accounts.collection_mint, false),
        AccountMeta::new(accounts.collection_metadata, false),
        AccountMeta::new_readonly(accounts.edition_account, false),
        AccountMeta::new_readonly(SPL_NOOP_PROGRAM_ID, false),
        AccountMeta::new_readonly(SPL_ACCOUNT_COMPRESSION_PROGRAM_ID, false),
        AccountMeta::new_readonly(TOKEN_METADATA_PROGRAM_ID, false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(MPL_BUBBLEGUM_PROGRAM_ID, false),
    ];
    Ok(Instruction::new_with_bytes(*program_id, &data, metas))
}
