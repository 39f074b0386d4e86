// src/blockchain/services/mod.rs
//
// Upstream data providers. Tools only see these traits, so tests can swap
// the HTTP clients for in-memory stubs.

pub mod coingecko;
pub mod etherscan;

use async_trait::async_trait;
use serde_json::Value;

use crate::blockchain::models::ToolError;

pub use coingecko::CoinGeckoClient;
pub use etherscan::EtherscanClient;

/// Filter for a token transfer listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransferQuery {
    pub chain_id: u64,
    pub contract_address: String,
    /// Empty means "any account".
    pub address: String,
    pub limit: u32,
}

/// Block explorer style account and gas data. Methods return the raw
/// provider body; normalisation is the tool's job.
#[async_trait]
pub trait ChainDataProvider: Send + Sync {
    async fn account_balance(&self, chain_id: u64, address: &str) -> Result<Value, ToolError>;

    async fn gas_oracle(&self, chain_id: u64) -> Result<Value, ToolError>;

    async fn token_transfers(&self, query: &TokenTransferQuery) -> Result<Value, ToolError>;
}

/// Spot price lookups keyed by provider coin id and quote currency.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn simple_price(&self, coin_id: &str, vs_currency: &str) -> Result<Value, ToolError>;
}

/// Read a provider body, turning non-2xx statuses into `UpstreamCall` and
/// unparseable bodies into `UpstreamFormat`.
pub(crate) async fn read_json(resp: reqwest::Response) -> Result<Value, ToolError> {
    let status = resp.status();
    let text = resp.text().await?;
    if !status.is_success() {
        return Err(ToolError::UpstreamCall(format!("HTTP {}: {}", status, text)));
    }
    serde_json::from_str(&text)
        .map_err(|e| ToolError::UpstreamFormat(format!("Invalid JSON from provider: {}", e)))
}
