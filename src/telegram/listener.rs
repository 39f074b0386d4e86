// src/telegram/listener.rs

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info};

use super::{CommandRouter, MessageTransport};
use crate::blockchain::models::ToolError;

/// Polls for chat updates on a fixed interval and routes each text message.
pub struct TelegramListener {
    transport: Arc<dyn MessageTransport>,
    router: CommandRouter,
    offset: i64,
    poll_interval: Duration,
    poll_timeout_secs: u64,
}

impl TelegramListener {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        router: CommandRouter,
        poll_interval: Duration,
        poll_timeout_secs: u64,
    ) -> Self {
        Self {
            transport,
            router,
            offset: 0,
            poll_interval,
            poll_timeout_secs,
        }
    }

    /// Next `update_id` that will be requested.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetch one batch and route it. The offset moves past each update before
    /// it is handled, so an update is never delivered twice.
    pub async fn poll_once(&mut self) -> Result<usize, ToolError> {
        let updates = self
            .transport
            .get_updates(self.offset, self.poll_timeout_secs)
            .await?;

        let mut routed = 0;
        for update in updates {
            self.offset = self.offset.max(update.update_id + 1);
            let Some((chat_id, text)) = update.text_message() else {
                debug!(update_id = update.update_id, "Skipping update without text");
                continue;
            };
            self.router.handle(chat_id, text).await;
            routed += 1;
        }
        Ok(routed)
    }

    pub async fn run(mut self) {
        info!(interval_ms = self.poll_interval.as_millis() as u64, "🤖 Telegram listener started");
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(e) = self.poll_once().await {
                error!(error = %e, "Telegram polling error");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governance::Governor;
    use crate::telegram::{client::Update, format};
    use crate::testing::{StubChainData, StubPrices, StubTransport};
    use crate::tools::Toolbox;
    use serde_json::json;

    fn update(value: serde_json::Value) -> Update {
        serde_json::from_value(value).unwrap()
    }

    fn listener(transport: Arc<StubTransport>) -> TelegramListener {
        let toolbox = Toolbox::new(
            Governor::default(),
            Arc::new(StubChainData::default()),
            Arc::new(StubPrices::with_body(json!({}))),
            None,
        );
        let router = CommandRouter::new(toolbox, transport.clone());
        TelegramListener::new(transport, router, Duration::from_millis(1500), 0)
    }

    #[tokio::test]
    async fn test_offset_advances_past_every_update() {
        let transport = Arc::new(StubTransport::default());
        transport.push_updates(vec![
            update(json!({"update_id": 10, "message": {"chat": {"id": 1}, "text": "/help"}})),
            update(json!({"update_id": 11, "message": {"chat": {"id": 1}}})),
            update(json!({"update_id": 12, "channel_post": {"chat": {"id": -5}, "text": "hi"}})),
        ]);
        let mut listener = listener(transport.clone());

        let routed = listener.poll_once().await.unwrap();

        assert_eq!(routed, 2);
        assert_eq!(listener.offset(), 13);
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].chat_id, "-5");
        assert_eq!(sent[1].text, format::HELP);
    }

    #[tokio::test]
    async fn test_next_poll_uses_advanced_offset() {
        let transport = Arc::new(StubTransport::default());
        transport.push_updates(vec![update(json!({"update_id": 3, "message": {"chat": {"id": 1}}}))]);
        let mut listener = listener(transport.clone());

        listener.poll_once().await.unwrap();
        assert_eq!(listener.poll_once().await.unwrap(), 0);
        assert_eq!(transport.update_offsets(), vec![0, 4]);
    }

    #[tokio::test]
    async fn test_poll_error_leaves_offset_unchanged() {
        let transport = Arc::new(StubTransport::failing("timeout"));
        let mut listener = listener(transport);
        assert!(listener.poll_once().await.is_err());
        assert_eq!(listener.offset(), 0);
    }
}
