// src/telegram/format.rs
//
// Human readable renderings of tool results, shared by chat replies and
// the notification summaries pushed after successful dispatches.

use serde_json::Value;

use crate::{
    blockchain::models::{
        Conversion, CryptoConverterArgs, FraxTransactions, GasPrices, WalletBalance,
    },
    tools::{crypto_converter, gas_estimator, wallet_balance},
    utils::parse_args,
};

pub const HELP: &str = "🤖 Available Commands:

/balance <address> [chain]
/convert <from> <to> <amount>
/gas [chain]
/frax <address?> [chain]

Example:
/balance 0xabc... polygon
/convert BTC USD 2
/gas ethereum
/frax 0xabc...
";

pub fn wallet_balance(result: &WalletBalance) -> String {
    format!(
        "💼 Wallet Balance\n\nChain: {}\nBalance: {} {}",
        result.chain.as_str().to_uppercase(),
        result.balance,
        result.chain.native_symbol()
    )
}

pub fn conversion(amount: f64, from: &str, to: &str, result: &Conversion) -> String {
    format!(
        "💱 Crypto Conversion\n{} {} → {} {}\nRate: {}",
        amount,
        from.to_uppercase(),
        result.converted,
        to.to_uppercase(),
        result.rate
    )
}

pub fn gas_prices(result: &GasPrices) -> String {
    format!(
        "⛽ Gas Price Update ({})\nSafe: {} gwei\nPropose: {} gwei\nFast: {} gwei\nLast Block: {}",
        result.chain.as_str().to_uppercase(),
        result.safe_gas_price,
        result.propose_gas_price,
        result.fast_gas_price,
        result.last_block
    )
}

pub fn frax_transactions(result: &FraxTransactions) -> String {
    if result.transactions.is_empty() {
        return "No FRAX transactions found".to_string();
    }
    let lines: Vec<String> = result
        .transactions
        .iter()
        .map(|tx| {
            let short: String = tx.hash.chars().take(10).collect();
            format!(
                "• {}...\nFrom: {}\nTo: {}\nAmount: {}\nTime: {}\n",
                short, tx.from, tx.to, tx.amount, tx.timestamp
            )
        })
        .collect();
    format!(
        "🧊 Latest FRAX Transactions ({})\n\n{}",
        result.chain.as_str().to_uppercase(),
        lines.join("\n")
    )
}

pub fn error(message: &str) -> String {
    format!("⚠️ Error: {}", message)
}

/// Notification text for a successful dispatch, for the tools that announce
/// their results. `None` means the call is not announced.
pub fn summary(tool: &str, args: &Value, data: &Value) -> Option<String> {
    match tool {
        wallet_balance::NAME => serde_json::from_value(data.clone())
            .ok()
            .map(|r| self::wallet_balance(&r)),
        gas_estimator::NAME => serde_json::from_value(data.clone())
            .ok()
            .map(|r| gas_prices(&r)),
        crypto_converter::NAME => {
            let args: CryptoConverterArgs = parse_args(args).ok()?;
            let result: Conversion = serde_json::from_value(data.clone()).ok()?;
            Some(conversion(args.amount, &args.from, &args.to, &result))
        }
        _ => None,
    }
}
