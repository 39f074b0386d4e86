// src/blockchain/chains.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// EVM networks the balance and gas tools can query through Etherscan v2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    #[default]
    Ethereum,
    Polygon,
    Arbitrum,
}

impl Chain {
    pub const ALL: [Chain; 3] = [Chain::Ethereum, Chain::Polygon, Chain::Arbitrum];

    pub fn chain_id(self) -> u64 {
        match self {
            Chain::Ethereum => 1,
            Chain::Polygon => 137,
            Chain::Arbitrum => 42161,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Arbitrum => "arbitrum",
        }
    }

    /// Ticker shown next to native balances.
    pub fn native_symbol(self) -> &'static str {
        match self {
            Chain::Polygon => "MATIC",
            Chain::Ethereum | Chain::Arbitrum => "ETH",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Chat commands fall back to Ethereum for missing or unknown names.
    pub fn parse_or_default(input: Option<&str>) -> Self {
        input.and_then(Self::parse).unwrap_or_default()
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Networks where FRAX transfers are indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FraxChain {
    #[default]
    Ethereum,
    Fraxtal,
}

impl FraxChain {
    pub fn chain_id(self) -> u64 {
        match self {
            FraxChain::Ethereum => 1,
            FraxChain::Fraxtal => 252,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FraxChain::Ethereum => "ethereum",
            FraxChain::Fraxtal => "fraxtal",
        }
    }

    /// FRAX token contract on this network.
    pub fn frax_token(self) -> &'static str {
        match self {
            FraxChain::Ethereum => "0x853d955acef822db058eb8505911ed77f175b99e",
            FraxChain::Fraxtal => "0xfc00000000000000000000000000000000000001",
        }
    }

    pub fn parse_or_default(input: Option<&str>) -> Self {
        match input.map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "fraxtal" => FraxChain::Fraxtal,
            _ => FraxChain::Ethereum,
        }
    }
}

impl fmt::Display for FraxChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_default() {
        assert_eq!(Chain::parse_or_default(Some("Polygon")), Chain::Polygon);
        assert_eq!(Chain::parse_or_default(Some("solana")), Chain::Ethereum);
        assert_eq!(Chain::parse_or_default(None), Chain::Ethereum);
        assert_eq!(FraxChain::parse_or_default(Some("fraxtal")), FraxChain::Fraxtal);
        assert_eq!(FraxChain::parse_or_default(Some("polygon")), FraxChain::Ethereum);
    }

    #[test]
    fn test_chain_ids() {
        assert_eq!(Chain::Arbitrum.chain_id(), 42161);
        assert_eq!(FraxChain::Fraxtal.chain_id(), 252);
    }

    #[test]
    fn test_unknown_chain_is_rejected_by_serde() {
        let parsed: Result<Chain, _> = serde_json::from_str("\"solana\"");
        assert!(parsed.is_err());
    }
}
