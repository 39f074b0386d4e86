// src/telegram/client.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::blockchain::{models::ToolError, services::read_json};

/// Outbound and inbound chat messaging.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Returns the provider's full reply, e.g. `{"ok": true, "result": {...}}`.
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<Value, ToolError>;

    /// Long-poll for updates with `update_id >= offset`.
    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ToolError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<ChatMessage>,
    #[serde(default)]
    pub channel_post: Option<ChatMessage>,
}

impl Update {
    /// Chat id and text of a direct message or channel post, if it has text.
    pub fn text_message(&self) -> Option<(i64, &str)> {
        let msg = self.message.as_ref().or(self.channel_post.as_ref())?;
        msg.text.as_deref().map(|text| (msg.chat.id, text))
    }
}

#[derive(Debug, Deserialize)]
struct UpdatesReply {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API over HTTPS.
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    bot_url: Url,
}

impl TelegramClient {
    pub fn new(client: Client, api_url: &str, token: &str) -> anyhow::Result<Self> {
        let mut base = Url::parse(api_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        // "./" keeps the token's colon from being read as a URL scheme.
        let bot_url = base.join(&format!("./bot{}/", token))?;
        Ok(Self { client, bot_url })
    }

    fn method_url(&self, method: &str) -> Result<Url, ToolError> {
        self.bot_url
            .join(method)
            .map_err(|e| ToolError::UpstreamCall(format!("Invalid Telegram URL: {}", e)))
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<Value, ToolError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(mode) = parse_mode {
            payload["parse_mode"] = json!(mode);
        }
        let resp = self
            .client
            .post(self.method_url("sendMessage")?)
            .json(&payload)
            .send()
            .await?;
        let body = read_json(resp).await?;
        debug!(chat_id, ok = ?body.get("ok"), "Telegram sendMessage response");
        Ok(body)
    }

    async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, ToolError> {
        let resp = self
            .client
            .get(self.method_url("getUpdates")?)
            .query(&[("offset", offset.to_string()), ("timeout", timeout_secs.to_string())])
            .send()
            .await?;
        let body = read_json(resp).await?;
        let reply: UpdatesReply = serde_json::from_value(body)
            .map_err(|e| ToolError::UpstreamFormat(format!("Invalid getUpdates reply: {}", e)))?;
        if !reply.ok {
            return Err(ToolError::UpstreamCall(
                reply
                    .description
                    .unwrap_or_else(|| "getUpdates failed".to_string()),
            ));
        }
        Ok(reply.result)
    }
}

/// A transport bound to one destination chat.
#[derive(Clone)]
pub struct ChatChannel {
    transport: Arc<dyn MessageTransport>,
    chat_id: String,
}

impl ChatChannel {
    pub fn new(transport: Arc<dyn MessageTransport>, chat_id: impl Into<String>) -> Self {
        Self {
            transport,
            chat_id: chat_id.into(),
        }
    }

    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    pub async fn send(&self, text: &str) -> Result<Value, ToolError> {
        self.transport.send_message(&self.chat_id, text, None).await
    }
}
