// src/telegram/router.rs

use std::sync::Arc;
use tracing::{error, info};

use super::{format, MessageTransport};
use crate::{
    blockchain::{
        chains::{Chain, FraxChain},
        models::{
            CryptoConverterArgs, FraxTransactionsArgs, GasEstimatorArgs, ToolError,
            WalletBalanceArgs,
        },
    },
    tools::Toolbox,
};

/// A parsed chat command. Positional arguments are already bound to names.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Balance { address: String, chain: Chain },
    Convert { from: String, to: String, amount: f64 },
    Gas { chain: Chain },
    Frax { address: String, chain: FraxChain },
    /// Recognised verb with bad arguments; the payload is the reply.
    Invalid(&'static str),
    Help,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let Some(verb) = parts.first() else {
            return Command::Help;
        };
        let arg = |i: usize| parts.get(i).copied();

        match verb.to_lowercase().as_str() {
            "/balance" => match arg(1) {
                Some(address) => Command::Balance {
                    address: address.to_string(),
                    chain: Chain::parse_or_default(arg(2)),
                },
                None => Command::Invalid("Usage: /balance <address> [chain]"),
            },
            "/convert" => match (arg(1), arg(2), arg(3)) {
                (Some(from), Some(to), Some(raw)) => match raw.parse::<f64>() {
                    Ok(amount) if amount.is_finite() => Command::Convert {
                        from: from.to_string(),
                        to: to.to_string(),
                        amount,
                    },
                    _ => Command::Invalid("❌ Amount must be a number"),
                },
                _ => Command::Invalid("Usage: /convert <from> <to> <amount>"),
            },
            "/gas" => Command::Gas {
                chain: Chain::parse_or_default(arg(1)),
            },
            "/frax" => Command::Frax {
                address: arg(1).unwrap_or_default().to_string(),
                chain: FraxChain::parse_or_default(arg(2)),
            },
            _ => Command::Help,
        }
    }
}

/// Turns chat commands into tool calls and replies in the same chat.
#[derive(Clone)]
pub struct CommandRouter {
    toolbox: Toolbox,
    transport: Arc<dyn MessageTransport>,
}

impl CommandRouter {
    pub fn new(toolbox: Toolbox, transport: Arc<dyn MessageTransport>) -> Self {
        Self { toolbox, transport }
    }

    /// The reply text for a command line. Tool failures become error replies.
    pub async fn reply_for(&self, text: &str) -> String {
        match self.execute(Command::parse(text)).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(error = %e, "Telegram route error");
                format::error(&e.to_string())
            }
        }
    }

    pub async fn handle(&self, chat_id: i64, text: &str) {
        info!(chat_id, text, "Telegram command");
        let reply = self.reply_for(text).await;
        if let Err(e) = self
            .transport
            .send_message(&chat_id.to_string(), &reply, Some("Markdown"))
            .await
        {
            error!(chat_id, error = %e, "Failed to send Telegram reply");
        }
    }

    async fn execute(&self, command: Command) -> Result<String, ToolError> {
        match command {
            Command::Balance { address, chain } => {
                let result = self
                    .toolbox
                    .wallet_balance
                    .balance(WalletBalanceArgs { address, chain })
                    .await?;
                Ok(format::wallet_balance(&result))
            }
            Command::Convert { from, to, amount } => {
                let args = CryptoConverterArgs {
                    from: from.clone(),
                    to: to.clone(),
                    amount,
                };
                let result = self.toolbox.crypto_converter.convert(args).await?;
                Ok(format::conversion(amount, &from, &to, &result))
            }
            Command::Gas { chain } => {
                let result = self
                    .toolbox
                    .gas_estimator
                    .gas_prices(GasEstimatorArgs { chain })
                    .await?;
                Ok(format::gas_prices(&result))
            }
            Command::Frax { address, chain } => {
                let result = self
                    .toolbox
                    .frax_transactions
                    .transactions(FraxTransactionsArgs { address, chain })
                    .await?;
                Ok(format::frax_transactions(&result))
            }
            Command::Invalid(reply) => Ok(reply.to_string()),
            Command::Help => Ok(format::HELP.to_string()),
        }
    }
}
