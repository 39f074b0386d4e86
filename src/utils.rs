//! Utility functions for the blockchain tools server

use chrono::{DateTime, SecondsFormat};
use ethers_core::types::U256;
use ethers_core::utils::format_units;
use serde::de::DeserializeOwned;
use serde_json::{from_value, Value};

use crate::blockchain::models::ToolError;

/// Deserialize a tool's argument object into its typed form.
///
/// A missing argument object is treated as `{}` so tools with only
/// optional arguments can be called bare.
pub fn parse_args<T: DeserializeOwned>(args: &Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    from_value(args).map_err(|e| ToolError::InvalidArguments(e.to_string()))
}

/// Helper function to extract a required argument from a JSON object
pub fn get_required_arg<T: DeserializeOwned>(args: &Value, key: &str) -> Result<T, ToolError> {
    from_value(args.get(key).cloned().unwrap_or(Value::Null)).map_err(|_| {
        ToolError::InvalidArguments(format!("Missing or invalid required argument: '{}'", key))
    })
}

/// Render an integer amount in the token's smallest unit as a decimal
/// string, e.g. `1500000000000000000` with 18 decimals becomes `"1.5"`.
///
/// Trailing fractional zeros are dropped but one digit is always kept
/// after the point (`"0.0"`, `"2.0"`).
pub fn format_token_amount(raw: &str, decimals: u32) -> Result<String, ToolError> {
    let raw = raw.trim();
    let amount = if raw.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(raw)
            .map_err(|e| ToolError::UpstreamFormat(format!("Invalid amount '{}': {}", raw, e)))?
    };
    let formatted = format_units(amount, decimals)
        .map_err(|e| ToolError::UpstreamFormat(format!("Invalid decimals {}: {}", decimals, e)))?;
    Ok(trim_fraction(&formatted))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{}.0", whole)
            } else {
                format!("{}.{}", whole, fraction)
            }
        }
        None => format!("{}.0", formatted),
    }
}

/// Unix seconds to an ISO-8601 UTC string with millisecond precision.
pub fn iso_timestamp(unix_secs: i64) -> Result<String, ToolError> {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .ok_or_else(|| ToolError::UpstreamFormat(format!("Invalid timestamp: {}", unix_secs)))
}

/// Read a field that providers send either as a JSON string or a number.
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
