// src/tools/crypto_converter.rs

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{to_json, Tool};
use crate::{
    blockchain::{
        models::{Conversion, CryptoConverterArgs, ToolError},
        services::PriceOracle,
    },
    governance::{CallPolicy, Governor},
    utils::parse_args,
};

pub const NAME: &str = "crypto_converter";

const POLICY: CallPolicy = CallPolicy::new(10, Duration::from_secs(60), Duration::from_secs(60));
const CONTEXT: &str = "Crypto conversion failed";

/// CoinGecko ids for common tickers; anything else is passed through lowercased.
fn coin_id(symbol: &str) -> String {
    match symbol.to_uppercase().as_str() {
        "BTC" => "bitcoin".to_string(),
        "ETH" => "ethereum".to_string(),
        "USDC" => "usd-coin".to_string(),
        "BNB" => "binancecoin".to_string(),
        "DAI" => "dai".to_string(),
        _ => symbol.to_lowercase(),
    }
}

pub struct CryptoConverterTool {
    governor: Governor,
    oracle: Arc<dyn PriceOracle>,
}

impl CryptoConverterTool {
    pub fn new(governor: Governor, oracle: Arc<dyn PriceOracle>) -> Self {
        Self { governor, oracle }
    }

    pub async fn convert(&self, args: CryptoConverterArgs) -> Result<Conversion, ToolError> {
        let from = args.from.trim().to_string();
        let to = args.to.trim().to_string();
        let key = format!("crypto-{}-{}", from.to_uppercase(), to.to_uppercase());

        // Only the rate is cached; the amount varies per call.
        let rate: f64 = self
            .governor
            .guarded(&key, &POLICY, move || async move {
                self.fetch_rate(&from, &to)
                    .await
                    .map_err(|e| e.with_context(CONTEXT))
            })
            .await?;

        Ok(Conversion {
            rate,
            converted: rate * args.amount,
        })
    }

    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, ToolError> {
        let from_id = coin_id(from);
        let to_id = to.to_lowercase();
        info!(from = %from_id, to = %to_id, "Fetching conversion rate");

        let body = self.oracle.simple_price(&from_id, &to_id).await?;
        body.get(&from_id)
            .and_then(|quotes| quotes.get(&to_id))
            .and_then(Value::as_f64)
            .filter(|rate| *rate != 0.0)
            .ok_or_else(|| {
                ToolError::Domain(format!("Conversion not available from {} to {}", from, to))
            })
    }
}

#[async_trait]
impl Tool for CryptoConverterTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Convert cryptocurrency to another coin or fiat using real-time rates"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from": {"type": "string", "description": "Symbol or CoinGecko id, e.g. BTC or bitcoin"},
                "to": {"type": "string", "description": "Target coin or fiat, e.g. USD"},
                "amount": {"type": "number"}
            },
            "required": ["from", "to", "amount"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let result = self.convert(parse_args(&args)?).await?;
        to_json(&result)
    }
}
