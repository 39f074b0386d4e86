// src/tools/telegram_bot.rs

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::info;

use super::{to_json, Tool};
use crate::{
    blockchain::models::{MessageDelivery, TelegramMessageArgs, ToolError},
    governance::{CallPolicy, Governor},
    telegram::ChatChannel,
    utils::parse_args,
};

pub const NAME: &str = "telegram_bot";

// Outbound messages are never cached, only rate limited.
const POLICY: CallPolicy = CallPolicy::new(5, Duration::from_secs(10), Duration::ZERO);
const CONTEXT: &str = "Telegram message failed";

pub struct TelegramBotTool {
    governor: Governor,
    channel: Option<ChatChannel>,
}

impl TelegramBotTool {
    pub fn new(governor: Governor, channel: Option<ChatChannel>) -> Self {
        Self { governor, channel }
    }

    pub async fn send(&self, args: TelegramMessageArgs) -> Result<MessageDelivery, ToolError> {
        let key = format!("telegram-{}", args.message);
        self.governor.check_rate(&key, &POLICY)?;

        let channel = self.channel.as_ref().ok_or_else(|| {
            ToolError::Domain(
                "Telegram is not configured (set TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID)".into(),
            )
            .with_context(CONTEXT)
        })?;

        info!(chat_id = channel.chat_id(), "Sending Telegram message");
        let body = channel
            .send(&args.message)
            .await
            .map_err(|e| e.with_context(CONTEXT))?;

        Ok(MessageDelivery {
            success: body.get("ok").and_then(Value::as_bool).unwrap_or(false),
            result: body.get("result").cloned().unwrap_or(Value::Null),
        })
    }
}

#[async_trait]
impl Tool for TelegramBotTool {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Send message to Telegram chat/channel"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "message": {"type": "string"}
            },
            "required": ["message"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let result = self.send(parse_args(&args)?).await?;
        to_json(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sends_to_configured_chat() {
        let transport = Arc::new(StubTransport::default());
        let channel = ChatChannel::new(transport.clone(), "-100123");
        let tool = TelegramBotTool::new(Governor::default(), Some(channel));

        let result = tool.execute(json!({"message": "gm"})).await.unwrap();

        assert_eq!(result["success"], true);
        assert_eq!(result["result"]["text"], "gm");
        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, "-100123");
        assert_eq!(sent[0].text, "gm");
        assert_eq!(sent[0].parse_mode, None);
    }

    #[tokio::test]
    async fn test_unconfigured_channel_fails() {
        let tool = TelegramBotTool::new(Governor::default(), None);
        let err = tool.execute(json!({"message": "gm"})).await.unwrap_err();
        assert!(err.to_string().starts_with("Telegram message failed: Telegram is not configured"));
    }

    #[tokio::test]
    async fn test_same_message_is_rate_limited() {
        let transport = Arc::new(StubTransport::default());
        let tool = TelegramBotTool::new(
            Governor::default(),
            Some(ChatChannel::new(transport.clone(), "1")),
        );

        for _ in 0..5 {
            tool.execute(json!({"message": "spam"})).await.unwrap();
        }
        let err = tool.execute(json!({"message": "spam"})).await.unwrap_err();
        assert_eq!(err, ToolError::RateLimitExceeded);
        tool.execute(json!({"message": "different"})).await.unwrap();
        assert_eq!(transport.sent().len(), 6);
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let transport = Arc::new(StubTransport::failing("HTTP 401 Unauthorized"));
        let tool = TelegramBotTool::new(Governor::default(), Some(ChatChannel::new(transport, "1")));

        let err = tool.execute(json!({"message": "gm"})).await.unwrap_err();
        assert_eq!(
            err,
            ToolError::UpstreamCall("Telegram message failed: HTTP 401 Unauthorized".into())
        );
    }
}
