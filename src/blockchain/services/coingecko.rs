// src/blockchain/services/coingecko.rs

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{read_json, PriceOracle};
use crate::blockchain::models::ToolError;

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoClient {
    async fn simple_price(&self, coin_id: &str, vs_currency: &str) -> Result<Value, ToolError> {
        let url = format!("{}/simple/price", self.base_url.trim_end_matches('/'));
        debug!(coin_id, vs_currency, "CoinGecko price request");
        let resp = self
            .client
            .get(url)
            .query(&[("ids", coin_id), ("vs_currencies", vs_currency)])
            .send()
            .await?;
        read_json(resp).await
    }
}
