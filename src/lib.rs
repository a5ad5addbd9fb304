//! cNFT scenario driver library
//!
//! Creates a Merkle tree, a collection NFT and a compressed NFT minted into
//! that collection through the bubblegum-cpi program. The binary in
//! `main.rs` is a thin CLI around [`scenario::ScenarioDriver`].

pub mod config;
pub mod errors;
pub mod funding;
pub mod merkle;
pub mod pda;
pub mod priority_fee;
pub mod program;
pub mod rpc;
pub mod scenario;
pub mod structured_logging;
pub mod tx_builder;
pub mod wallet;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

// Re-export commonly used types
pub use config::{Config, ContinuationPolicy};
pub use errors::{DriverError, DriverResult};
pub use scenario::{run_scenario, ScenarioDriver, ScenarioReport, StepOutcome};
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
