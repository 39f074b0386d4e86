// src/lib.rs

use std::sync::Arc;

pub mod api;
pub mod blockchain;
pub mod config;
pub mod governance;
pub mod mcp;
pub mod telegram;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod tools;
pub mod utils;

use blockchain::services::{ChainDataProvider, CoinGeckoClient, EtherscanClient, PriceOracle};
use governance::Governor;
use telegram::{ChatChannel, CommandRouter, MessageTransport, Notifier, TelegramClient, TelegramListener};
use tools::{Toolbox, ToolRegistry};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// Rate limiter and response cache shared by every tool
    pub governor: Governor,
    /// Typed tool entry points, used by the chat command router
    pub toolbox: Toolbox,
    /// Name-based dispatch with result envelopes
    pub registry: Arc<ToolRegistry>,
    /// Bot API transport, present when a bot token is configured
    pub telegram: Option<Arc<dyn MessageTransport>>,
}

impl AppState {
    /// Wire the real HTTP clients from configuration.
    pub fn from_config(config: config::Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("blockchain-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let chain_data = Arc::new(EtherscanClient::new(
            http.clone(),
            config.etherscan_api_url.clone(),
            config.etherscan_api_key.clone(),
        ));
        let prices = Arc::new(CoinGeckoClient::new(http.clone(), config.coingecko_api_url.clone()));
        let telegram: Option<Arc<dyn MessageTransport>> = match &config.telegram_bot_token {
            Some(token) => Some(Arc::new(TelegramClient::new(
                http,
                &config.telegram_api_url,
                token,
            )?)),
            None => None,
        };

        Self::with_providers(config, chain_data, prices, telegram)
    }

    /// Wire the state around arbitrary providers and transport.
    pub fn with_providers(
        config: config::Config,
        chain_data: Arc<dyn ChainDataProvider>,
        prices: Arc<dyn PriceOracle>,
        telegram: Option<Arc<dyn MessageTransport>>,
    ) -> anyhow::Result<Self> {
        let governor = Governor::default();
        let channel = match (&telegram, &config.telegram_chat_id) {
            (Some(transport), Some(chat_id)) => Some(ChatChannel::new(transport.clone(), chat_id.clone())),
            _ => None,
        };

        let toolbox = Toolbox::new(governor.clone(), chain_data, prices, channel.clone());
        let notifier = Notifier::new(channel, governor.limiter().clone());
        let registry = Arc::new(toolbox.registry(notifier)?);

        Ok(Self {
            config,
            governor,
            toolbox,
            registry,
            telegram,
        })
    }

    pub fn command_router(&self) -> Option<CommandRouter> {
        let transport = self.telegram.clone()?;
        Some(CommandRouter::new(self.toolbox.clone(), transport))
    }

    /// The polling listener, when a bot token is configured.
    pub fn telegram_listener(&self) -> Option<TelegramListener> {
        let transport = self.telegram.clone()?;
        let router = self.command_router()?;
        Some(TelegramListener::new(
            transport,
            router,
            self.config.telegram_poll_interval,
            self.config.telegram_poll_timeout_secs,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubChainData, StubPrices, StubTransport};
    use serde_json::json;

    #[test]
    fn test_state_without_telegram() {
        let state = AppState::with_providers(
            config::Config::default(),
            Arc::new(StubChainData::default()),
            Arc::new(StubPrices::default()),
            None,
        )
        .unwrap();

        assert_eq!(state.registry.len(), 5);
        assert!(!state.registry.notifier().is_enabled());
        assert!(state.command_router().is_none());
        assert!(state.telegram_listener().is_none());
    }

    #[tokio::test]
    async fn test_chat_id_enables_notifications_and_telegram_tool() {
        let config = config::Config {
            telegram_chat_id: Some("55".into()),
            ..Default::default()
        };
        let transport = Arc::new(StubTransport::default());
        let state = AppState::with_providers(
            config,
            Arc::new(StubChainData::default()),
            Arc::new(StubPrices::default()),
            Some(transport.clone()),
        )
        .unwrap();

        assert!(state.registry.notifier().is_enabled());
        assert!(state.telegram_listener().is_some());

        let envelope = state.registry.call("telegram_bot", json!({"message": "gm"})).await;
        assert!(envelope.success);
        assert_eq!(transport.sent()[0].chat_id, "55");
    }

    #[tokio::test]
    async fn test_from_config_builds_real_clients() {
        let config = config::Config {
            telegram_bot_token: Some("123:abc".into()),
            ..Default::default()
        };
        let state = AppState::from_config(config).unwrap();
        assert!(state.telegram.is_some());
        assert!(state.command_router().is_some());
    }
}
