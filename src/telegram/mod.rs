//! # Telegram
//!
//! Chat-side collaborators of the tool layer:
//!
//! - [`client`] - the Bot API transport (`sendMessage`, `getUpdates`)
//! - [`notifier`] - rate-limited, fire-and-forget announcements
//! - [`router`] - `/balance`, `/convert`, `/gas`, `/frax` chat commands
//! - [`listener`] - the polling loop feeding the router
//! - [`format`] - text renderings of tool results

pub mod client;
pub mod format;
pub mod listener;
pub mod notifier;
pub mod router;

pub use client::{ChatChannel, MessageTransport, TelegramClient, Update};
pub use listener::TelegramListener;
pub use notifier::Notifier;
pub use router::{Command, CommandRouter};
