// src/tools/gas_estimator.rs

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
        models::{GasEstimatorArgs, GasPrices, ToolError},
        services::{etherscan::provider_error, ChainDataProvider},
    },
    governance::{CallPolicy, Governor},
    utils::{parse_args, string_field},
};

pub const NAME: &str = "gas_estimator";

const POLICY: CallPolicy = CallPolicy::new(10, Duration::from_secs(60), Duration::from_secs(60));
const CONTEXT: &str = "Gas estimator failed";
const ORACLE_SHAPES: [Shape; 1] = [Shape::new("/result", JsonKind::Object)];

pub struct GasEstimatorTool {
    governor: Governor,
    provider: Arc<dyn ChainDataProvider>,
}

impl GasEstimatorTool {
    pub fn new(governor: Governor, provider: Arc<dyn ChainDataProvider>) -> Self {
        Self { governor, provider }
    }

    pub async fn gas_prices(&self, args: GasEstimatorArgs) -> Result<GasPrices, ToolError> {
        let chain = args.chain;
        let key = format!("gas-{}", chain);
        self.governor
            .guarded(&key, &POLICY, move || async move {
                self.fetch_prices(chain)
                    .await
                    .map_err(|e| e.with_context(CONTEXT))
            })
            .await
    }

    async fn fetch_prices(&self, chain: Chain) -> Result<GasPrices, ToolError> {
        info!(%chain, "Fetching gas oracle");
        let body = self.provider.gas_oracle(chain.chain_id()).await?;

        if body.get("status").and_then(Value::as_str) == Some("0") {
            let reason = provider_error(&body).unwrap_or_else(|| "Invalid gas oracle response".into());
            return Err(ToolError::Domain(reason));
        }

        let oracle = unwrap_first(&body, &ORACLE_SHAPES, "gas oracle")?;
        let field = |name: &str| {
            string_field(oracle, name).ok_or_else(|| {
                ToolError::UpstreamFormat(format!("Gas oracle response missing {}", name))
            })
        };

        Ok(GasPrices {
            chain,
            safe_gas_price: field("SafeGasPrice")?,
            propose_gas_price: field("ProposeGasPrice")?,
            fast_gas_price: field("FastGasPrice")?,
            last_block: field("LastBlock")?,
        })
    }
}

#[async_trait]
impl Tool for GasEstimatorTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Fetch current gas prices using Etherscan Gas Oracle (V2)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "chain": {"type": "string", "enum": Chain::names()}
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let result = self.gas_prices(parse_args(&args)?).await?;
        to_json(&result)
    }
}
