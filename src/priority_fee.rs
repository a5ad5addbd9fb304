//! Priority-fee estimation over JSON-RPC
//!
//! Queries a `qn_estimatePriorityFees` endpoint and exposes the
//! per-compute-unit levels it returns. One request per call, no retry and
//! no cache.

use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

pub const ESTIMATE_METHOD: &str = "qn_estimatePriorityFees";
pub const API_VERSION: u8 = 2;

#[derive(Error, Debug)]
pub enum PriorityFeeError {
    #[error("Priority fee endpoint {endpoint} returned HTTP {status}")]
    HttpStatus { endpoint: String, status: StatusCode },

    #[error("Priority fee request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Priority fee response from {endpoint} could not be decoded: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Priority fee endpoint {endpoint} returned JSON-RPC error {code}: {message}")]
    JsonRpc {
        endpoint: String,
        code: i64,
        message: String,
    },

    #[error("Priority fee level '{0}' missing from the estimate")]
    MissingLevel(String),
}

/// Optional filters for the estimate request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EstimateFilter {
    pub last_n_blocks: Option<u64>,
    pub account: Option<String>,
}

/// Fee levels in micro-lamports per compute unit
///
/// Keyed by label (`extreme`, `high`, `medium`, `low`, ...). Non-numeric
/// entries such as the nested `percentiles` object are kept as raw values
/// and ignored by `level`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeLevels(HashMap<String, Value>);

impl FeeLevels {
    pub fn level(&self, label: &str) -> Option<u64> {
        let value = self.0.get(label)?;
        value
            .as_u64()
            .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
    }

    /// Like `level`, but a missing label is an error
    pub fn require(&self, label: &str) -> Result<u64, PriorityFeeError> {
        self.level(label)
            .ok_or_else(|| PriorityFeeError::MissingLevel(label.to_string()))
    }

    /// Numeric labels present in the estimate
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self
            .0
            .iter()
            .filter(|(_, v)| v.is_number())
            .map(|(k, _)| k.as_str())
            .collect();
        labels.sort_unstable();
        labels
    }
}

/// `result` object of the estimate response
#[derive(Debug, Clone, Deserialize)]
pub struct FeeEstimate {
    pub per_compute_unit: FeeLevels,
    #[serde(default)]
    pub per_transaction: Option<FeeLevels>,
    #[serde(default)]
    pub context: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<FeeEstimate>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

fn request_body(filter: &EstimateFilter) -> Value {
    let mut params = json!({ "api_version": API_VERSION });
    if let Some(n) = filter.last_n_blocks {
        params["last_n_blocks"] = json!(n);
    }
    if let Some(account) = &filter.account {
        params["account"] = json!(account);
    }

    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": ESTIMATE_METHOD,
        "params": params,
    })
}

/// POST one `qn_estimatePriorityFees` request to `endpoint`
pub async fn fetch_estimate_priority_fees(
    client: &Client,
    endpoint: &str,
    filter: &EstimateFilter,
) -> Result<FeeEstimate, PriorityFeeError> {
    let response = client
        .post(endpoint)
        .json(&request_body(filter))
        .send()
        .await
        .map_err(|source| PriorityFeeError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(PriorityFeeError::HttpStatus {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    let body = response
        .text()
        .await
        .map_err(|source| PriorityFeeError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

    let envelope: RpcEnvelope =
        serde_json::from_str(&body).map_err(|e| PriorityFeeError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

    if let Some(err) = envelope.error {
        return Err(PriorityFeeError::JsonRpc {
            endpoint: endpoint.to_string(),
            code: err.code,
            message: err.message,
        });
    }

    let estimate = envelope.result.ok_or_else(|| PriorityFeeError::Decode {
        endpoint: endpoint.to_string(),
        message: "response has neither result nor error".to_string(),
    })?;

    debug!(
        endpoint = %endpoint,
        levels = ?estimate.per_compute_unit.labels(),
        "Fetched priority fee estimate"
    );

    Ok(estimate)
}
