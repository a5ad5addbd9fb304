//! Error types for transaction assembly and submission

use thiserror::Error;

use crate::rpc::RpcError;

/// Error type for transaction builder operations
///
/// Covers the lifecycle of one scenario transaction:
/// - Instruction ordering
/// - Compute-unit simulation
/// - Validity anchor (blockhash) handling
/// - Signing
/// - Submission and confirmation (wrapped RPC errors)
#[derive(Error, Debug)]
pub enum TransactionBuilderError {
    /// Simulation could not be performed at all
    ///
    /// Execution errors reported by the simulator are not errors; the
    /// estimator returns `None` for those.
    #[error("Simulation failed: {0}")]
    Simulation(String),

    /// Failed to sign the transaction
    ///
    /// Usually a required signer was not supplied.
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Blockhash-related errors
    #[error("Blockhash error: {0}")]
    Blockhash(String),

    /// Compute-budget instructions must precede program instructions
    #[error("Invalid instruction order: {0}")]
    InvalidInstructionOrder(String),

    /// Invalid builder input
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Ledger RPC failure
    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl TransactionBuilderError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Simulation(_) => "simulation",
            Self::Signing(_) => "signing",
            Self::Blockhash(_) => "blockhash",
            Self::InvalidInstructionOrder(_) => "validation",
            Self::Configuration(_) => "config",
            Self::Rpc(e) => e.category(),
        }
    }
}

// Convenience constructors for common error scenarios
impl TransactionBuilderError {
    /// Create a blockhash error
    pub fn blockhash_unavailable(reason: impl Into<String>) -> Self {
        Self::Blockhash(reason.into())
    }

    /// Create an invalid instruction order error
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidInstructionOrder(reason.into())
    }
}
