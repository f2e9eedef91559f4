//! Token selection backed by the registry.

use crate::error::{Error, parse_address};
use crate::types::VET_SYMBOL;

use super::registry::TokenRegistry;
use super::types::Token;

/// One entry of the selectable list: the value to submit and its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOption {
    /// Empty for the native coin, otherwise the token address.
    pub value: String,
    /// The symbol shown to the user.
    pub label: String,
}

/// Selectable token list.
///
/// The selector starts out loading and refuses selections until the registry
/// list is available. Selecting the empty value picks the native coin
/// (`None`).
#[derive(Debug, Clone, Default)]
pub struct TokenSelector {
    tokens: Option<Vec<Token>>,
}

impl TokenSelector {
    /// A selector waiting for the registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A selector over an already-known list.
    pub fn loaded(tokens: Vec<Token>) -> Self {
        Self {
            tokens: Some(tokens),
        }
    }

    /// Fetch the list from `registry`.
    ///
    /// On failure the selector stays in the loading state so a later call can
    /// retry.
    pub async fn load(&mut self, registry: &TokenRegistry) -> Result<(), Error> {
        let tokens = registry.tokens().await?;
        self.tokens = Some(tokens.to_vec());
        Ok(())
    }

    /// Returns true while the list is not available.
    pub fn is_loading(&self) -> bool {
        self.tokens.is_none()
    }

    /// The loaded tokens (empty while loading).
    pub fn tokens(&self) -> &[Token] {
        self.tokens.as_deref().unwrap_or_default()
    }

    /// Options to display: the native coin first, then registry order.
    pub fn options(&self) -> Vec<TokenOption> {
        std::iter::once(TokenOption {
            value: String::new(),
            label: VET_SYMBOL.to_string(),
        })
        .chain(self.tokens().iter().map(|token| TokenOption {
            value: token.address.to_string(),
            label: token.symbol.clone(),
        }))
        .collect()
    }

    /// Resolve a selected value into a token (`None` = native coin).
    pub fn select(&self, value: &str) -> Result<Option<Token>, Error> {
        let tokens = self.tokens.as_ref().ok_or(Error::RegistryNotLoaded)?;

        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }

        let address = parse_address(value)?;
        tokens
            .iter()
            .find(|token| token.address == address)
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::UnknownToken(value.to_string()))
    }
}
