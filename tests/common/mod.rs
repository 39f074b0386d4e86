//! Canned upstream providers for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use blockchain_mcp_server::{
    blockchain::{
        models::ToolError,
        services::{ChainDataProvider, PriceOracle, TokenTransferQuery},
    },
    config::Config,
    AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct CannedChainData {
    pub balance: Value,
    pub gas: Value,
    pub transfers: Value,
}

impl Default for CannedChainData {
    fn default() -> Self {
        Self {
            balance: json!({"status": "1", "message": "OK", "result": "1500000000000000000"}),
            gas: json!({"status": "1", "result": {
                "SafeGasPrice": "10", "ProposeGasPrice": "12",
                "FastGasPrice": "15", "LastBlock": "19000000"
            }}),
            transfers: json!({"status": "1", "result": []}),
        }
    }
}

#[async_trait]
impl ChainDataProvider for CannedChainData {
    async fn account_balance(&self, _chain_id: u64, _address: &str) -> Result<Value, ToolError> {
        Ok(self.balance.clone())
    }

    async fn gas_oracle(&self, _chain_id: u64) -> Result<Value, ToolError> {
        Ok(self.gas.clone())
    }

    async fn token_transfers(&self, _query: &TokenTransferQuery) -> Result<Value, ToolError> {
        Ok(self.transfers.clone())
    }
}

pub struct CannedPrices(pub Value);

#[async_trait]
impl PriceOracle for CannedPrices {
    async fn simple_price(&self, _coin_id: &str, _vs: &str) -> Result<Value, ToolError> {
        Ok(self.0.clone())
    }
}

pub fn test_state(chain_data: CannedChainData) -> AppState {
    AppState::with_providers(
        Config::default(),
        Arc::new(chain_data),
        Arc::new(CannedPrices(json!({"bitcoin": {"usd": 50000}}))),
        None,
    )
    .unwrap()
}
