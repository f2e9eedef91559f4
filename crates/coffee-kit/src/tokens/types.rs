//! Token metadata as listed in the token registry.

use std::fmt;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use crate::error::{Error, parse_address};
use crate::types::MAX_DECIMALS;

/// A registry-listed token.
///
/// Tokens are identified by their contract address; the rest is display
/// metadata. [`Token::new`], deserialization and the registry all apply the
/// same schema check, so `decimals` is at most [`MAX_DECIMALS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawToken")]
pub struct Token {
    /// Contract address.
    pub address: Address,
    /// Token symbol (e.g., "B3TR").
    pub symbol: String,
    /// Human-readable token name.
    pub name: String,
    /// Number of decimal places (e.g., 18).
    pub decimals: u8,
}

impl Token {
    /// Create a token, checking the same rules as registry entries.
    pub fn new(
        address: Address,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, Error> {
        RawToken {
            address: address.to_string(),
            symbol: symbol.into(),
            name: name.into(),
            decimals: u64::from(decimals),
        }
        .validate()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.address)
    }
}

impl TryFrom<RawToken> for Token {
    type Error = Error;

    fn try_from(raw: RawToken) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

/// Loosely-typed registry entry, as fetched.
///
/// Registry files carry extra fields (`desc`, `icon`, `totalSupply`, ...);
/// those are ignored. Missing or mistyped required fields fail deserialization.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawToken {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u64,
}

impl RawToken {
    /// Check the entry against the schema and convert it into a [`Token`].
    pub(crate) fn validate(self) -> Result<Token, Error> {
        let address = parse_address(&self.address)
            .map_err(|_| Error::InvalidTokenEntry(format!("bad address '{}'", self.address)))?;
        if address.is_zero() {
            return Err(Error::InvalidTokenEntry("zero address".to_string()));
        }

        let symbol = self.symbol.trim();
        if symbol.is_empty() || symbol.len() > 32 || symbol.chars().any(char::is_whitespace) {
            return Err(Error::InvalidTokenEntry(format!(
                "bad symbol '{}' for {}",
                self.symbol, address
            )));
        }

        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidTokenEntry(format!("empty name for {address}")));
        }

        let decimals = u8::try_from(self.decimals)
            .ok()
            .filter(|d| *d <= MAX_DECIMALS)
            .ok_or_else(|| {
                Error::InvalidTokenEntry(format!("bad decimals {} for {}", self.decimals, address))
            })?;

        Ok(Token {
            address,
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
        })
    }
}
