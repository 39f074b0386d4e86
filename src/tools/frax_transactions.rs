// src/tools/frax_transactions.rs

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
        chains::FraxChain,
        models::{FraxTransactions, FraxTransactionsArgs, TokenTransfer, ToolError},
        services::{ChainDataProvider, TokenTransferQuery},
    },
    governance::{CallPolicy, Governor},
    utils::{format_token_amount, iso_timestamp, parse_args, string_field},
};

pub const NAME: &str = "frax_transactions";

const POLICY: CallPolicy = CallPolicy::new(5, Duration::from_secs(60), Duration::from_secs(60));
const CONTEXT: &str = "FRAX transactions fetch failed";
const MAX_TRANSFERS: usize = 5;
const DEFAULT_DECIMALS: u32 = 18;

/// Etherscan puts the listing under `result`; some mirrors use `data.items`.
const TRANSFER_SHAPES: [Shape; 2] = [
    Shape::new("/result", JsonKind::Array),
    Shape::new("/data/items", JsonKind::Array),
];

pub struct FraxTransactionsTool {
    governor: Governor,
    provider: Arc<dyn ChainDataProvider>,
}

impl FraxTransactionsTool {
    pub fn new(governor: Governor, provider: Arc<dyn ChainDataProvider>) -> Self {
        Self { governor, provider }
    }

    pub async fn transactions(
        &self,
        args: FraxTransactionsArgs,
    ) -> Result<FraxTransactions, ToolError> {
        let chain = args.chain;
        let address = args.address.trim().to_string();
        let key = format!("frax-tx-{}-{}", chain, address.to_lowercase());

        self.governor
            .guarded(&key, &POLICY, move || async move {
                self.fetch_transactions(chain, address)
                    .await
                    .map_err(|e| e.with_context(CONTEXT))
            })
            .await
    }

    async fn fetch_transactions(
        &self,
        chain: FraxChain,
        address: String,
    ) -> Result<FraxTransactions, ToolError> {
        info!(%chain, address = %address, "Fetching FRAX transfers");
        let query = TokenTransferQuery {
            chain_id: chain.chain_id(),
            contract_address: chain.frax_token().to_string(),
            address: address.clone(),
            limit: MAX_TRANSFERS as u32,
        };
        let body = self.provider.token_transfers(&query).await?;

        let transactions = unwrap_first(&body, &TRANSFER_SHAPES, "token transfer")?
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .take(MAX_TRANSFERS)
                    .map(parse_transfer)
                    .collect::<Result<Vec<_>, _>>()
            })
            .unwrap_or_else(|| Ok(Vec::new()))?;

        Ok(FraxTransactions {
            chain,
            address,
            transactions,
        })
    }
}

fn parse_transfer(tx: &Value) -> Result<TokenTransfer, ToolError> {
    let decimals = match string_field(tx, "tokenDecimal") {
        Some(d) => d
            .parse::<u32>()
            .map_err(|e| ToolError::UpstreamFormat(format!("Invalid tokenDecimal '{}': {}", d, e)))?,
        None => DEFAULT_DECIMALS,
    };
    let value = string_field(tx, "value").unwrap_or_else(|| "0".to_string());

    let timestamp = string_field(tx, "timeStamp")
        .ok_or_else(|| ToolError::UpstreamFormat("Transfer missing timeStamp".into()))?;
    let secs = timestamp
        .parse::<i64>()
        .map_err(|e| ToolError::UpstreamFormat(format!("Invalid timeStamp '{}': {}", timestamp, e)))?;

    Ok(TokenTransfer {
        hash: string_field(tx, "hash").unwrap_or_default(),
        from: string_field(tx, "from").unwrap_or_default(),
        to: string_field(tx, "to").unwrap_or_default(),
        amount: format_token_amount(&value, decimals)?,
        timestamp: iso_timestamp(secs)?,
    })
}

#[async_trait]
impl Tool for FraxTransactionsTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Fetch latest 5 FRAX token transactions"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "address": {"type": "string"},
                "chain": {"type": "string", "enum": ["ethereum", "fraxtal"]}
            },
            "required": ["address"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let result = self.transactions(parse_args(&args)?).await?;
        to_json(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubChainData;

    fn transfer(i: u64) -> Value {
        json!({
            "hash": format!("0xhash{}", i),
            "from": "0xfrom",
            "to": "0xto",
            "value": "2500000000000000000",
            "tokenDecimal": "18",
            "timeStamp": "1700000000"
        })
    }

    #[tokio::test]
    async fn test_etherscan_listing_is_normalized() {
        let stub = Arc::new(StubChainData::default());
        stub.set_transfers(json!({
            "status": "1",
            "result": (0..7).map(transfer).collect::<Vec<_>>()
        }));
        let tool = FraxTransactionsTool::new(Governor::default(), stub.clone());

        let result: FraxTransactions = serde_json::from_value(
            tool.execute(json!({"address": "0xabc", "chain": "fraxtal"}))
                .await
                .unwrap(),
        )
        .unwrap();

        assert_eq!(result.chain, FraxChain::Fraxtal);
        assert_eq!(result.address, "0xabc");
        assert_eq!(result.transactions.len(), 5);
        assert_eq!(
            result.transactions[0],
            TokenTransfer {
                hash: "0xhash0".into(),
                from: "0xfrom".into(),
                to: "0xto".into(),
                amount: "2.5".into(),
                timestamp: "2023-11-14T22:13:20.000Z".into(),
            }
        );

        let queries = stub.transfer_requests();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].chain_id, 252);
        assert_eq!(queries[0].contract_address, FraxChain::Fraxtal.frax_token());
        assert_eq!(queries[0].limit, 5);
    }

    #[tokio::test]
    async fn test_nested_items_shape_is_accepted() {
        let stub = Arc::new(StubChainData::default());
        stub.set_transfers(json!({
            "data": {"items": [{
                "hash": "0x1",
                "from": "0xa",
                "to": "0xb",
                "value": "1000000",
                "tokenDecimal": "6",
                "timeStamp": 0
            }]}
        }));
        let tool = FraxTransactionsTool::new(Governor::default(), stub);

        let result = tool.execute(json!({"address": "0xabc"})).await.unwrap();
        assert_eq!(result["chain"], "ethereum");
        assert_eq!(result["transactions"][0]["amount"], "1.0");
        assert_eq!(result["transactions"][0]["timestamp"], "1970-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_decimals_default_to_eighteen() {
        let tx = json!({"hash": "0x1", "value": "1000000000000000000", "timeStamp": "1"});
        assert_eq!(parse_transfer(&tx).unwrap().amount, "1.0");
    }

    #[tokio::test]
    async fn test_unrecognized_shape_fails() {
        let stub = Arc::new(StubChainData::default());
        stub.set_transfers(json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"}));
        let tool = FraxTransactionsTool::new(Governor::default(), stub);

        let err = tool.execute(json!({"address": "0xabc"})).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::UpstreamFormat(
                "FRAX transactions fetch failed: Unexpected token transfer response format".into()
            )
        );
    }

    #[tokio::test]
    async fn test_empty_listing_is_not_an_error() {
        let stub = Arc::new(StubChainData::default());
        stub.set_transfers(json!({"status": "0", "message": "No transactions found", "result": []}));
        let tool = FraxTransactionsTool::new(Governor::default(), stub);

        let result = tool.execute(json!({"address": ""})).await.unwrap();
        assert_eq!(result["transactions"], json!([]));
    }
}
