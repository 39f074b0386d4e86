// src/tools/wallet_balance.rs

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{
    shape::{unwrap_first, JsonKind, Shape},
    to_json, Tool,
};
use crate::{
    blockchain::{
        chains::Chain,
        models::{ToolError, WalletBalance, WalletBalanceArgs},
        services::{etherscan::provider_error, ChainDataProvider},
    },
    governance::{CallPolicy, Governor},
    utils::{format_token_amount, parse_args},
};

pub const NAME: &str = "wallet_balance";

const POLICY: CallPolicy = CallPolicy::new(5, Duration::from_secs(60), Duration::from_secs(60));
const CONTEXT: &str = "Wallet balance fetch failed";
const NATIVE_DECIMALS: u32 = 18;
const BALANCE_SHAPES: [Shape; 1] = [Shape::new("/result", JsonKind::String)];

pub struct WalletBalanceTool {
    governor: Governor,
    provider: Arc<dyn ChainDataProvider>,
}

impl WalletBalanceTool {
    pub fn new(governor: Governor, provider: Arc<dyn ChainDataProvider>) -> Self {
        Self { governor, provider }
    }

    pub async fn balance(&self, args: WalletBalanceArgs) -> Result<WalletBalance, ToolError> {
        let chain = args.chain;
        let address = args.address.trim().to_string();
        let key = format!("balance-{}-{}", chain, address.to_lowercase());

        let balance: String = self
            .governor
            .guarded(&key, &POLICY, move || async move {
                self.fetch_balance(chain, &address)
                    .await
                    .map_err(|e| e.with_context(CONTEXT))
            })
            .await?;

        Ok(WalletBalance { chain, balance })
    }

    async fn fetch_balance(&self, chain: Chain, address: &str) -> Result<String, ToolError> {
        info!(%chain, address, "Fetching native balance");
        let body = self
            .provider
            .account_balance(chain.chain_id(), address)
            .await?;

        if body.get("status").and_then(Value::as_str) != Some("1") {
            let reason =
                provider_error(&body).unwrap_or_else(|| "Unknown provider error".to_string());
            return Err(ToolError::Domain(reason));
        }

        let wei = unwrap_first(&body, &BALANCE_SHAPES, "balance")?
            .as_str()
            .unwrap_or_default();
        format_token_amount(wei, NATIVE_DECIMALS)
    }
}

#[async_trait]
impl Tool for WalletBalanceTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Get wallet balance across Ethereum, Polygon, or Arbitrum"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {"type": "string", "description": "The 0x... wallet address to check."},
                "chain": {"type": "string", "enum": Chain::names()}
            },
            "required": ["address"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let result = self.balance(parse_args(&args)?).await?;
        to_json(&result)
    }
}
