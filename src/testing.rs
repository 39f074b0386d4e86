//! In-memory stand-ins for the upstream providers and the chat transport.
//! They record every request so tests can assert on upstream traffic.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::{
    blockchain::{
        models::ToolError,
        services::{ChainDataProvider, PriceOracle, TokenTransferQuery},
    },
    telegram::{MessageTransport, Update},
};

#[derive(Debug, Default)]
pub struct StubChainData {
    balance: Mutex<Value>,
    gas: Mutex<Value>,
    transfers: Mutex<Value>,
    balance_requests: Mutex<Vec<(u64, String)>>,
    gas_requests: Mutex<Vec<u64>>,
    transfer_requests: Mutex<Vec<TokenTransferQuery>>,
}

impl StubChainData {
    pub fn set_balance(&self, body: Value) {
        *self.balance.lock().unwrap() = body;
    }

    pub fn set_gas(&self, body: Value) {
        *self.gas.lock().unwrap() = body;
    }

    pub fn set_transfers(&self, body: Value) {
        *self.transfers.lock().unwrap() = body;
    }

    pub fn balance_requests(&self) -> Vec<(u64, String)> {
        self.balance_requests.lock().unwrap().clone()
    }

    pub fn gas_requests(&self) -> Vec<u64> {
        self.gas_requests.lock().unwrap().clone()
    }

    pub fn transfer_requests(&self) -> Vec<TokenTransferQuery> {
        self.transfer_requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChainDataProvider for StubChainData {
    async fn account_balance(&self, chain_id: u64, address: &str) -> Result<Value, ToolError> {
        self.balance_requests
            .lock()
            .unwrap()
            .push((chain_id, address.to_string()));
        Ok(self.balance.lock().unwrap().clone())
    }

    async fn gas_oracle(&self, chain_id: u64) -> Result<Value, ToolError> {
        self.gas_requests.lock().unwrap().push(chain_id);
        Ok(self.gas.lock().unwrap().clone())
    }

    async fn token_transfers(&self, query: &TokenTransferQuery) -> Result<Value, ToolError> {
        self.transfer_requests.lock().unwrap().push(query.clone());
        Ok(self.transfers.lock().unwrap().clone())
    }
}

#[derive(Debug, Default)]
pub struct StubPrices {
    body: Value,
    requests: Mutex<Vec<(String, String)>>,
}

impl StubPrices {
    pub fn with_body(body: Value) -> Self {
        Self {
            body,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PriceOracle for StubPrices {
    async fn simple_price(&self, coin_id: &str, vs_currency: &str) -> Result<Value, ToolError> {
        self.requests
            .lock()
            .unwrap()
            .push((coin_id.to_string(), vs_currency.to_string()));
        Ok(self.body.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: Option<String>,
}

/// Echoes sends back like the Bot API does; `failing` makes every call error
/// and `stalled` makes sends never complete.
#[derive(Debug, Default)]
pub struct StubTransport {
    failure: Option<String>,
    stall: bool,
    sent: Mutex<Vec<SentMessage>>,
    batches: Mutex<VecDeque<Vec<Update>>>,
    offsets: Mutex<Vec<i64>>,
}

impl StubTransport {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn stalled() -> Self {
        Self {
            stall: true,
            ..Default::default()
        }
    }

    pub fn push_updates(&self, batch: Vec<Update>) {
        self.batches.lock().unwrap().push_back(batch);
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn update_offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), ToolError> {
        match &self.failure {
            Some(message) => Err(ToolError::UpstreamCall(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MessageTransport for StubTransport {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<Value, ToolError> {
        self.check()?;
        if self.stall {
            std::future::pending::<()>().await;
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            parse_mode: parse_mode.map(str::to_string),
        });
        Ok(json!({"ok": true, "result": {"chat": {"id": chat_id}, "text": text}}))
    }

    async fn get_updates(&self, offset: i64, _timeout_secs: u64) -> Result<Vec<Update>, ToolError> {
        self.check()?;
        self.offsets.lock().unwrap().push(offset);
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}
