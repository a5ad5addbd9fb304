use solana_client::client_error::{ClientError, ClientErrorKind};
use thiserror::Error;

/// Ledger RPC error types
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// Transport-level errors (network, connection)
    #[error("Transport error during {operation}: {message} (endpoint: {endpoint})")]
    Transport {
        operation: &'static str,
        endpoint: String,
        message: String,
    },

    /// Timeout errors
    #[error("Timeout during {operation} (endpoint: {endpoint})")]
    Timeout {
        operation: &'static str,
        endpoint: String,
    },

    /// RPC response errors (from the RPC server)
    #[error("RPC response error during {operation}: {message} (endpoint: {endpoint}, code: {code:?})")]
    RpcResponse {
        operation: &'static str,
        endpoint: String,
        message: String,
        code: Option<i64>,
    },

    #[error("Blockhash not found (endpoint: {endpoint})")]
    BlockhashNotFound { endpoint: String },

    #[error("Transaction expired (endpoint: {endpoint})")]
    TransactionExpired { endpoint: String },

    #[error("Insufficient funds (endpoint: {endpoint})")]
    InsufficientFunds { endpoint: String },

    /// Faucet refused or throttled the airdrop
    #[error("Airdrop unavailable: {message} (endpoint: {endpoint})")]
    AirdropUnavailable { endpoint: String, message: String },

    /// The transaction landed but failed, or never reached the commitment
    #[error("Transaction {signature} failed: {message}")]
    TransactionFailed { signature: String, message: String },
}

impl RpcError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::RpcResponse { .. } => "rpc",
            Self::BlockhashNotFound { .. } => "blockhash",
            Self::TransactionExpired { .. } => "blockhash",
            Self::InsufficientFunds { .. } => "funds",
            Self::AirdropUnavailable { .. } => "funding",
            Self::TransactionFailed { .. } => "transaction",
        }
    }

    /// Get the endpoint associated with this error, if any
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Timeout { endpoint, .. }
            | Self::RpcResponse { endpoint, .. }
            | Self::BlockhashNotFound { endpoint }
            | Self::TransactionExpired { endpoint }
            | Self::InsufficientFunds { endpoint }
            | Self::AirdropUnavailable { endpoint, .. } => Some(endpoint),
            Self::TransactionFailed { .. } => None,
        }
    }

    /// Create from ClientError with context
    pub fn from_client_error(err: ClientError, operation: &'static str, endpoint: &str) -> Self {
        let endpoint = endpoint.to_string();

        if let ClientErrorKind::Reqwest(e) = err.kind() {
            if e.is_timeout() {
                return Self::Timeout { operation, endpoint };
            }
            return Self::Transport {
                operation,
                endpoint,
                message: e.to_string(),
            };
        }

        let err_str = err.to_string().to_lowercase();

        // Classify based on error message
        if err_str.contains("blockhash not found") {
            Self::BlockhashNotFound { endpoint }
        } else if err_str.contains("transaction expired")
            || err_str.contains("block height exceeded")
        {
            Self::TransactionExpired { endpoint }
        } else if err_str.contains("insufficient funds")
            || err_str.contains("insufficient lamports")
        {
            Self::InsufficientFunds { endpoint }
        } else if operation == "request_airdrop"
            && (err_str.contains("airdrop") || err_str.contains("429") || err_str.contains("faucet"))
        {
            Self::AirdropUnavailable {
                endpoint,
                message: err.to_string(),
            }
        } else if err_str.contains("timeout") || err_str.contains("timed out") {
            Self::Timeout { operation, endpoint }
        } else {
            // Extract error code if available
            let code = err_str
                .split("code:")
                .nth(1)
                .and_then(|s| s.split_whitespace().next())
                .and_then(|s| s.trim_end_matches(|c: char| !c.is_ascii_digit()).parse::<i64>().ok());

            Self::RpcResponse {
                operation,
                endpoint,
                message: err.to_string(),
                code,
            }
        }
    }
}
