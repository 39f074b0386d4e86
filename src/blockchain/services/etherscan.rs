// src/blockchain/services/etherscan.rs

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{read_json, ChainDataProvider, TokenTransferQuery};
use crate::blockchain::models::ToolError;

/// Etherscan v2 multichain API: one endpoint, chain selected by `chainid`.
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let api_key = api_key.filter(|k| !k.is_empty());
        if api_key.is_none() {
            warn!("ETHERSCAN_KEY is not set; Etherscan requests will be unauthenticated");
        }
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    async fn get(&self, params: &[(&str, String)]) -> Result<Value, ToolError> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }
        debug!(
            module = %params_value(params, "module"),
            action = %params_value(params, "action"),
            "Etherscan request"
        );
        let resp = self.client.get(&self.base_url).query(&query).send().await?;
        read_json(resp).await
    }
}

fn params_value<'a>(params: &'a [(&str, String)], name: &str) -> &'a str {
    params
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

#[async_trait]
impl ChainDataProvider for EtherscanClient {
    async fn account_balance(&self, chain_id: u64, address: &str) -> Result<Value, ToolError> {
        self.get(&[
            ("chainid", chain_id.to_string()),
            ("module", "account".into()),
            ("action", "balance".into()),
            ("address", address.to_string()),
            ("tag", "latest".into()),
        ])
        .await
    }

    async fn gas_oracle(&self, chain_id: u64) -> Result<Value, ToolError> {
        self.get(&[
            ("chainid", chain_id.to_string()),
            ("module", "gastracker".into()),
            ("action", "gasoracle".into()),
        ])
        .await
    }

    async fn token_transfers(&self, query: &TokenTransferQuery) -> Result<Value, ToolError> {
        let mut params = vec![
            ("chainid", query.chain_id.to_string()),
            ("module", "account".into()),
            ("action", "tokentx".into()),
            ("contractaddress", query.contract_address.clone()),
            ("page", "1".into()),
            ("offset", query.limit.to_string()),
            ("sort", "desc".into()),
        ];
        if !query.address.is_empty() {
            params.push(("address", query.address.clone()));
        }
        self.get(&params).await
    }
}

/// Etherscan reports failures as `{"status":"0","message":"NOTOK","result":"<reason>"}`.
/// Returns the most specific reason present in the body.
pub fn provider_error(body: &Value) -> Option<String> {
    ["result", "message"]
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|reason| !reason.is_empty())
        .map(str::to_string)
}
