//! Crate-level error taxonomy
//!
//! Each layer owns a focused error type; `DriverError` is what the scenario
//! driver and the binary see. Conversions are provided so `?` works across
//! layers.

use thiserror::Error;

use crate::priority_fee::PriorityFeeError;
use crate::rpc::RpcError;
use crate::tx_builder::TransactionBuilderError;
use crate::wallet::KeypairError;

/// Error returned by scenario-level operations
#[derive(Error, Debug)]
pub enum DriverError {
    /// Keypair file missing or malformed
    #[error(transparent)]
    Keypair(#[from] KeypairError),

    /// Ledger RPC failure (transport, response or failed transaction)
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// Priority-fee endpoint failure
    #[error(transparent)]
    PriorityFee(#[from] PriorityFeeError),

    /// Transaction assembly, signing or simulation failure
    #[error(transparent)]
    TxBuilder(#[from] TransactionBuilderError),

    /// Invalid or inconsistent configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Client-side validation of instruction arguments failed
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DriverError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Keypair(_) => "keypair",
            Self::Rpc(e) => e.category(),
            Self::PriorityFee(_) => "priority_fee",
            Self::TxBuilder(e) => e.category(),
            Self::Configuration(_) => "config",
            Self::Validation(_) => "validation",
        }
    }
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            DriverError::Configuration("x".to_string()).category(),
            "config"
        );
        assert_eq!(
            DriverError::Validation("x".to_string()).category(),
            "validation"
        );
        let err: DriverError = TransactionBuilderError::Signing("x".to_string()).into();
        assert_eq!(err.category(), "signing");
    }
}
