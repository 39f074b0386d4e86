// src/blockchain/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::blockchain::chains::{Chain, FraxChain};

// --- Error types for tool execution ---

/// Every failure a tool can report. The registry turns these into envelopes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    /// The provider answered, but in a shape none of our matchers recognise.
    #[error("{0}")]
    UpstreamFormat(String),
    /// Network or HTTP level failure talking to the provider.
    #[error("{0}")]
    UpstreamCall(String),
    /// The request is well formed but cannot be satisfied as asked.
    #[error("{0}")]
    Domain(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Tool not found: {0}")]
    NotFound(String),
}

impl ToolError {
    /// Prefix the message with the tool-level context, e.g.
    /// `"Wallet balance fetch failed: Invalid address format"`.
    ///
    /// Rate limit and lookup failures are returned untouched.
    pub fn with_context(self, context: &str) -> Self {
        match self {
            ToolError::UpstreamFormat(m) => ToolError::UpstreamFormat(format!("{context}: {m}")),
            ToolError::UpstreamCall(m) => ToolError::UpstreamCall(format!("{context}: {m}")),
            ToolError::Domain(m) => ToolError::Domain(format!("{context}: {m}")),
            other => other,
        }
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ToolError::UpstreamFormat(err.to_string())
        } else {
            ToolError::UpstreamCall(err.to_string())
        }
    }
}

// --- Tool arguments ---

#[derive(Debug, Clone, Deserialize)]
pub struct WalletBalanceArgs {
    pub address: String,
    #[serde(default)]
    pub chain: Chain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CryptoConverterArgs {
    /// Symbol or CoinGecko id, e.g. `BTC` or `bitcoin`.
    pub from: String,
    /// Symbol or fiat, e.g. `USD`.
    pub to: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GasEstimatorArgs {
    #[serde(default)]
    pub chain: Chain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FraxTransactionsArgs {
    pub address: String,
    #[serde(default)]
    pub chain: FraxChain,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessageArgs {
    pub message: String,
}

// --- Canonical tool results ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletBalance {
    pub chain: Chain,
    /// Native balance as a decimal string, e.g. `"1.5"`.
    pub balance: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub rate: f64,
    pub converted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPrices {
    pub chain: Chain,
    pub safe_gas_price: String,
    pub propose_gas_price: String,
    pub fast_gas_price: String,
    pub last_block: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    /// ISO-8601, millisecond precision, UTC.
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraxTransactions {
    pub chain: FraxChain,
    pub address: String,
    pub transactions: Vec<TokenTransfer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageDelivery {
    pub success: bool,
    pub result: Value,
}

/// Uniform result of one dispatch through the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallEnvelope {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Public description of a registered tool, as returned by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}
