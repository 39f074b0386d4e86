//! # Tools
//!
//! A tool is a named unit of work with a JSON input schema. Every tool runs
//! its upstream call through the shared [`Governor`], so rate limiting and
//! caching behave identically across:
//!
//! - `crypto_converter` - convert between coins and fiat using CoinGecko spot prices
//! - `frax_transactions` - latest FRAX token transfers from Etherscan
//! - `wallet_balance` - native balance on Ethereum, Polygon or Arbitrum
//! - `gas_estimator` - Etherscan gas oracle
//! - `telegram_bot` - post a message to the configured Telegram chat
//!
//! Each tool also exposes a typed entry point used by the chat command
//! router, which bypasses JSON entirely.

pub mod crypto_converter;
pub mod frax_transactions;
pub mod gas_estimator;
pub mod registry;
pub mod shape;
pub mod telegram_bot;
pub mod wallet_balance;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    blockchain::{
        models::{ToolDescriptor, ToolError},
        services::{ChainDataProvider, PriceOracle},
    },
    governance::Governor,
    telegram::{ChatChannel, Notifier},
};

pub use crypto_converter::CryptoConverterTool;
pub use frax_transactions::FraxTransactionsTool;
pub use gas_estimator::GasEstimatorTool;
pub use registry::ToolRegistry;
pub use telegram_bot::TelegramBotTool;
pub use wallet_balance::WalletBalanceTool;

#[async_trait]
pub trait Tool: Send + Sync {
    /// Dispatch key, unique within a registry.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON Schema for the `arguments` object.
    fn input_schema(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<Value, ToolError>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

pub(crate) fn to_json<T: Serialize>(result: &T) -> Result<Value, ToolError> {
    serde_json::to_value(result).map_err(|e| ToolError::UpstreamFormat(e.to_string()))
}

/// The concrete tool set, shared by the registry and the command router.
#[derive(Clone)]
pub struct Toolbox {
    pub crypto_converter: Arc<CryptoConverterTool>,
    pub frax_transactions: Arc<FraxTransactionsTool>,
    pub wallet_balance: Arc<WalletBalanceTool>,
    pub gas_estimator: Arc<GasEstimatorTool>,
    pub telegram_bot: Arc<TelegramBotTool>,
}

impl Toolbox {
    pub fn new(
        governor: Governor,
        chain_data: Arc<dyn ChainDataProvider>,
        prices: Arc<dyn PriceOracle>,
        channel: Option<ChatChannel>,
    ) -> Self {
        Self {
            crypto_converter: Arc::new(CryptoConverterTool::new(governor.clone(), prices)),
            frax_transactions: Arc::new(FraxTransactionsTool::new(
                governor.clone(),
                chain_data.clone(),
            )),
            wallet_balance: Arc::new(WalletBalanceTool::new(governor.clone(), chain_data.clone())),
            gas_estimator: Arc::new(GasEstimatorTool::new(governor.clone(), chain_data)),
            telegram_bot: Arc::new(TelegramBotTool::new(governor, channel)),
        }
    }

    /// Build the dispatch registry. Registration order is listing order.
    pub fn registry(&self, notifier: Notifier) -> anyhow::Result<ToolRegistry> {
        let mut registry = ToolRegistry::new(notifier);
        registry.register(self.crypto_converter.clone())?;
        registry.register(self.frax_transactions.clone())?;
        registry.register(self.wallet_balance.clone())?;
        registry.register(self.gas_estimator.clone())?;
        registry.register(self.telegram_bot.clone())?;
        Ok(registry)
    }
}
