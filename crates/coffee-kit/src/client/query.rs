//! Balance reads.
//!
//! [`BalanceQuery`] is `.await`ed directly; [`BalanceReader`] keeps the last
//! displayed value across refreshes.

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::Error;
use crate::tokens::{Token, erc20};
use crate::types::TokenAmount;

use super::rpc::ThorClient;

// ============================================================================
// BalanceQuery
// ============================================================================

/// Query builder for an account balance.
///
/// Reads the native VET balance unless [`token`](Self::token) is set, in
/// which case the token contract's `balanceOf` is simulated.
///
/// # Example
///
/// ```rust,no_run
/// # use coffee_kit::*;
/// # async fn example(coffee: Coffee, b3tr: Token) -> Result<(), coffee_kit::Error> {
/// let account = "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed".parse().unwrap();
///
/// let vet = coffee.balance(account).await?;
/// println!("{vet}"); // e.g. "12.5 VET"
///
/// let tokens = coffee.balance(account).token(b3tr).await?;
/// # Ok(())
/// # }
/// ```
pub struct BalanceQuery {
    rpc: Arc<ThorClient>,
    account: Address,
    token: Option<Token>,
}

impl BalanceQuery {
    pub(crate) fn new(rpc: Arc<ThorClient>, account: Address) -> Self {
        Self {
            rpc,
            account,
            token: None,
        }
    }

    /// Read a token balance instead of VET.
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Read `token`, or VET when `None`.
    pub fn maybe_token(mut self, token: Option<Token>) -> Self {
        self.token = token;
        self
    }
}

impl IntoFuture for BalanceQuery {
    type Output = Result<TokenAmount, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            match self.token {
                None => {
                    let detail = self.rpc.account(&self.account).await?;
                    Ok(TokenAmount::vet(detail.balance))
                }
                Some(token) => {
                    let clause = erc20::balance_of_clause(token.address, self.account);
                    let data = self.rpc.call_view(&clause).await?;
                    let raw = erc20::decode_balance(&data)?;
                    Ok(TokenAmount::new(raw, token.decimals, token.symbol))
                }
            }
        })
    }
}

// ============================================================================
// BalanceReader
// ============================================================================

/// Displayed balance that survives failed refreshes.
///
/// Starts at `"0"`. A failed read is logged and the previous value stays on
/// screen.
#[derive(Debug, Clone)]
pub struct BalanceReader {
    display: String,
}

impl Default for BalanceReader {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
        }
    }
}

impl BalanceReader {
    /// A reader showing `"0"`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `query` and update the display.
    ///
    /// Returns `None` when there is no query to run (no connected account).
    pub async fn refresh(&mut self, query: Option<BalanceQuery>) -> Option<&str> {
        let query = query?;
        let account = query.account;
        let result = query.await;
        if let Err(error) = &result {
            tracing::warn!(account = %account, %error, "balance read failed, keeping last value");
        }
        Some(self.apply(result))
    }

    /// Apply a read result: successes replace the display, errors leave it.
    pub fn apply(&mut self, result: Result<TokenAmount, Error>) -> &str {
        if let Ok(amount) = result {
            self.display = amount.format_amount();
        }
        &self.display
    }

    /// The displayed balance without the symbol.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The exact displayed balance, for the "use max" shortcut.
    pub fn max_amount(&self) -> String {
        self.display.clone()
    }
}
