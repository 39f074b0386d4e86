// src/config.rs

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

// All configuration, loaded once at startup from the environment (and .env).
#[derive(Clone, Debug)]
pub struct Config {
    // Server settings
    pub port: u16,

    // Upstream data providers
    pub etherscan_api_url: String,
    /// Requests go out without a key when unset; Etherscan then throttles hard.
    pub etherscan_api_key: Option<String>,
    pub coingecko_api_url: String,

    // Telegram
    pub telegram_api_url: String,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_polling: bool,
    pub telegram_poll_interval: Duration,
    pub telegram_poll_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            etherscan_api_key: None,
            coingecko_api_url: DEFAULT_COINGECKO_API_URL.to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_polling: false,
            telegram_poll_interval: Duration::from_millis(1500),
            telegram_poll_timeout_secs: 30,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let port = parse_or(&get, "PORT", defaults.port)?;
        let interval_ms = parse_or(
            &get,
            "TELEGRAM_POLL_INTERVAL_MS",
            defaults.telegram_poll_interval.as_millis() as u64,
        )?;
        if interval_ms == 0 {
            anyhow::bail!("TELEGRAM_POLL_INTERVAL_MS must be greater than zero");
        }

        Ok(Config {
            port,
            etherscan_api_url: url_or(&get, "ETHERSCAN_API_URL", defaults.etherscan_api_url)?,
            etherscan_api_key: get("ETHERSCAN_KEY").or_else(|| get("ETHERSCAN_API_KEY")),
            coingecko_api_url: url_or(&get, "COINGECKO_API_URL", defaults.coingecko_api_url)?,
            telegram_api_url: url_or(&get, "TELEGRAM_API_URL", defaults.telegram_api_url)?,
            telegram_bot_token: get("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: get("TELEGRAM_CHAT_ID"),
            telegram_polling: get("TELEGRAM_POLLING")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(defaults.telegram_polling),
            telegram_poll_interval: Duration::from_millis(interval_ms),
            telegram_poll_timeout_secs: parse_or(
                &get,
                "TELEGRAM_POLL_TIMEOUT_SECS",
                defaults.telegram_poll_timeout_secs,
            )?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn url_or<G>(get: &G, key: &str, default: String) -> Result<String>
where
    G: Fn(&str) -> Option<String>,
{
    let raw = get(key).unwrap_or(default);
    Url::parse(&raw).with_context(|| format!("{} must be a valid URL", key))?;
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.etherscan_api_url, DEFAULT_ETHERSCAN_API_URL);
        assert_eq!(config.coingecko_api_url, DEFAULT_COINGECKO_API_URL);
        assert_eq!(config.telegram_poll_interval, Duration::from_millis(1500));
        assert_eq!(config.telegram_poll_timeout_secs, 30);
        assert!(!config.telegram_polling);
        assert_eq!(config.telegram_bot_token, None);
        assert_eq!(config.telegram_chat_id, None);
    }

    #[test]
    fn test_etherscan_key_aliases() {
        let config = Config::from_lookup(lookup(&[("ETHERSCAN_API_KEY", "abc")])).unwrap();
        assert_eq!(config.etherscan_api_key.as_deref(), Some("abc"));

        let config = Config::from_lookup(lookup(&[
            ("ETHERSCAN_KEY", "primary"),
            ("ETHERSCAN_API_KEY", "fallback"),
        ]))
        .unwrap();
        assert_eq!(config.etherscan_api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_telegram_settings() {
        let config = Config::from_lookup(lookup(&[
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-100"),
            ("TELEGRAM_POLLING", "TRUE"),
            ("TELEGRAM_POLL_INTERVAL_MS", "250"),
            ("TELEGRAM_API_URL", "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.telegram_bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.telegram_chat_id.as_deref(), Some("-100"));
        assert!(config.telegram_polling);
        assert_eq!(config.telegram_poll_interval, Duration::from_millis(250));
        assert_eq!(config.telegram_api_url, "http://localhost:9000");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(Config::from_lookup(lookup(&[("COINGECKO_API_URL", "not a url")])).is_err());
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let err = Config::from_lookup(lookup(&[("TELEGRAM_POLL_INTERVAL_MS", "0")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "TELEGRAM_POLL_INTERVAL_MS must be greater than zero"
        );
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup(&[("TELEGRAM_CHAT_ID", "  "), ("PORT", "")])).unwrap();
        assert_eq!(config.telegram_chat_id, None);
        assert_eq!(config.port, 8080);
    }
}
