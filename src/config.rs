//! Configuration module for the scenario driver
//!
//! This module handles configuration loading from TOML files and
//! environment variables, and provides structured configuration types.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

use crate::errors::DriverError;
use crate::merkle;
use crate::program::TokenProgram;

/// Environment variable overriding `rpc.url`
pub const ENV_RPC_URL: &str = "CNFT_RPC_URL";
/// Environment variable overriding `priority_fee.endpoint`
pub const ENV_PRIORITY_FEE_URL: &str = "CNFT_PRIORITY_FEE_URL";

/// Main scenario configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger RPC connection
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Keypair files for the fixed participants
    #[serde(default)]
    pub keypairs: KeypairPaths,

    /// Airdrop amounts
    #[serde(default)]
    pub funding: FundingConfig,

    /// Merkle tree parameters
    #[serde(default)]
    pub tree: TreeConfig,

    /// Collection NFT metadata
    #[serde(default = "default_collection")]
    pub collection: NftMetadataConfig,

    /// Compressed NFT metadata
    #[serde(default = "default_cnft")]
    pub cnft: NftMetadataConfig,

    /// Compute budget sizing
    #[serde(default)]
    pub compute: ComputeConfig,

    /// Priority fee attachment
    #[serde(default)]
    pub priority_fee: PriorityFeeConfig,

    /// Token program used for the collection mint
    #[serde(default)]
    pub token_program: TokenProgram,

    /// What to do after the collection step fails
    #[serde(default)]
    pub continuation: ContinuationPolicy,

    /// Address of the bubblegum-cpi program
    #[serde(default = "default_program_id")]
    pub program_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Ledger RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,

    /// Commitment used when waiting for confirmations
    #[serde(default = "default_commitment")]
    pub commitment: String,

    /// Commitment used when fetching blockhashes
    #[serde(default = "default_blockhash_commitment")]
    pub blockhash_commitment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeypairPaths {
    #[serde(default = "default_creator_path")]
    pub creator: PathBuf,

    #[serde(default = "default_fee_payer_path")]
    pub fee_payer: PathBuf,

    #[serde(default = "default_leaf_owner_path")]
    pub leaf_owner: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Skip airdrops entirely (networks without a faucet)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Lamports requested per participant
    #[serde(default = "default_airdrop_lamports")]
    pub lamports: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    #[serde(default = "default_max_buffer_size")]
    pub max_buffer_size: u32,

    #[serde(default)]
    pub canopy_depth: u32,

    /// Whether anyone may mint into the tree; `None` keeps the program default
    #[serde(default)]
    pub public: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NftMetadataConfig {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeConfig {
    /// Safety margin added on top of simulated units (percent)
    #[serde(default = "default_cu_margin")]
    pub margin_percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityFeeConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Fee estimation endpoint; defaults to the ledger RPC endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Percentile label read from the estimate
    #[serde(default = "default_fee_level")]
    pub level: String,

    #[serde(default)]
    pub last_n_blocks: Option<u64>,

    #[serde(default)]
    pub account: Option<String>,
}

/// Behavior after a failed collection-NFT step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContinuationPolicy {
    /// Attempt the compressed mint anyway
    #[default]
    BestEffort,
    /// Skip the compressed mint and record it as skipped
    StopOnFailure,
}

// Default value functions
fn default_rpc_url() -> String { "http://127.0.0.1:8899".to_string() }
fn default_rpc_timeout() -> u64 { 30 }
fn default_commitment() -> String { "confirmed".to_string() }
fn default_blockhash_commitment() -> String { "finalized".to_string() }
fn default_creator_path() -> PathBuf { PathBuf::from("keypairs/creator.json") }
fn default_fee_payer_path() -> PathBuf { PathBuf::from("keypairs/fee-payer.json") }
fn default_leaf_owner_path() -> PathBuf { PathBuf::from("keypairs/leaf-owner.json") }
fn default_airdrop_lamports() -> u64 { 10_000_000_000 }
fn default_max_depth() -> u32 { 3 }
fn default_max_buffer_size() -> u32 { 8 }
fn default_cu_margin() -> u32 { 10 }
fn default_fee_level() -> String { "high".to_string() }
fn default_true() -> bool { true }
fn default_program_id() -> String { crate::program::BUBBLEGUM_CPI_PROGRAM_ID.to_string() }

fn default_collection() -> NftMetadataConfig {
    NftMetadataConfig {
        uri: "https://example.com/my-collection.json".to_string(),
        name: "My Collection".to_string(),
    }
}

fn default_cnft() -> NftMetadataConfig {
    NftMetadataConfig {
        uri: "https://example.com/my-collection-cNft.json".to_string(),
        name: "My Collection cNFT 1".to_string(),
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
            timeout_secs: default_rpc_timeout(),
            commitment: default_commitment(),
            blockhash_commitment: default_blockhash_commitment(),
        }
    }
}

impl Default for KeypairPaths {
    fn default() -> Self {
        Self {
            creator: default_creator_path(),
            fee_payer: default_fee_payer_path(),
            leaf_owner: default_leaf_owner_path(),
        }
    }
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            lamports: default_airdrop_lamports(),
        }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_buffer_size: default_max_buffer_size(),
            canopy_depth: 0,
            public: None,
        }
    }
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            margin_percent: default_cu_margin(),
        }
    }
}

impl Default for PriorityFeeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            level: default_fee_level(),
            last_n_blocks: None,
            account: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            keypairs: KeypairPaths::default(),
            funding: FundingConfig::default(),
            tree: TreeConfig::default(),
            collection: default_collection(),
            cnft: default_cnft(),
            compute: ComputeConfig::default(),
            priority_fee: PriorityFeeConfig::default(),
            token_program: TokenProgram::default(),
            continuation: ContinuationPolicy::default(),
            program_id: default_program_id(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with `.env` and environment variable overrides
    pub fn from_file_with_env(path: &str) -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `CNFT_*` environment overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(ENV_RPC_URL) {
            self.rpc.url = url;
        }
        if let Ok(url) = std::env::var(ENV_PRIORITY_FEE_URL) {
            self.priority_fee.endpoint = Some(url);
        }
    }

    /// Check values that would otherwise only fail on-chain
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.rpc.url.is_empty() {
            return Err(DriverError::Configuration("rpc.url is empty".to_string()));
        }
        parse_commitment(&self.rpc.commitment)?;
        parse_commitment(&self.rpc.blockhash_commitment)?;
        merkle::validate_tree_params(self.tree.max_depth, self.tree.max_buffer_size)
            .map_err(DriverError::Configuration)?;
        if self.tree.canopy_depth >= self.tree.max_depth {
            return Err(DriverError::Configuration(format!(
                "tree.canopy_depth ({}) must be smaller than tree.max_depth ({})",
                self.tree.canopy_depth, self.tree.max_depth
            )));
        }
        if self.funding.enabled && self.funding.lamports == 0 {
            return Err(DriverError::Configuration(
                "funding.lamports must be positive when funding is enabled".to_string(),
            ));
        }
        if self.priority_fee.level.is_empty() {
            return Err(DriverError::Configuration(
                "priority_fee.level is empty".to_string(),
            ));
        }
        self.program_id()?;
        Ok(())
    }

    /// Parsed bubblegum-cpi program address
    pub fn program_id(&self) -> Result<Pubkey, DriverError> {
        self.program_id
            .parse()
            .map_err(|e| DriverError::Configuration(format!("program_id: {}", e)))
    }

    /// Confirmation commitment
    pub fn commitment(&self) -> Result<CommitmentConfig, DriverError> {
        parse_commitment(&self.rpc.commitment)
    }

    /// Blockhash commitment
    pub fn blockhash_commitment(&self) -> Result<CommitmentConfig, DriverError> {
        parse_commitment(&self.rpc.blockhash_commitment)
    }

    /// Fee estimation endpoint, falling back to the ledger RPC endpoint
    pub fn priority_fee_endpoint(&self) -> &str {
        self.priority_fee
            .endpoint
            .as_deref()
            .unwrap_or(&self.rpc.url)
    }
}

fn parse_commitment(value: &str) -> Result<CommitmentConfig, DriverError> {
    match value {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(DriverError::Configuration(format!(
            "unknown commitment level '{}'",
            other
        ))),
    }
}
