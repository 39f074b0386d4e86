// src/telegram/notifier.rs

use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::ChatChannel;
use crate::governance::RateLimiter;

const MAX_PER_WINDOW: u32 = 5;
const WINDOW: Duration = Duration::from_secs(10);
/// Near-duplicate messages share a key through their first characters.
const KEY_PREFIX_CHARS: usize = 50;
/// Upper bound on a single send before the notification is dropped.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Best-effort side channel. Nothing in here can fail a caller.
#[derive(Clone)]
pub struct Notifier {
    channel: Option<ChatChannel>,
    limiter: Arc<RateLimiter>,
}

impl Notifier {
    pub fn new(channel: Option<ChatChannel>, limiter: Arc<RateLimiter>) -> Self {
        if channel.is_none() {
            warn!("Telegram bot token or chat ID not set; notifications are disabled");
        }
        Self { channel, limiter }
    }

    pub fn disabled() -> Self {
        Self {
            channel: None,
            limiter: Arc::new(RateLimiter::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    pub async fn notify(&self, message: &str) {
        let Some(channel) = &self.channel else {
            debug!("Notification skipped, Telegram not configured");
            return;
        };

        let key = notification_key(message);
        if !self.limiter.allow(&key, MAX_PER_WINDOW, WINDOW) {
            warn!("Telegram rate limit exceeded, skipping message");
            return;
        }

        match timeout(SEND_TIMEOUT, channel.send(message)).await {
            Ok(Ok(body)) if body.get("ok") == Some(&Value::Bool(true)) => {
                info!(chat_id = channel.chat_id(), "Notification sent");
            }
            Ok(Ok(body)) => error!(response = %body, "Telegram API error"),
            Ok(Err(e)) => error!(error = %e, "Failed to send Telegram message"),
            Err(_) => error!(
                timeout_secs = SEND_TIMEOUT.as_secs(),
                "Telegram send timed out, notification dropped"
            ),
        }
    }
}

pub fn notification_key(message: &str) -> String {
    let prefix: String = message.chars().take(KEY_PREFIX_CHARS).collect();
    format!("telegram-{}", prefix)
}
