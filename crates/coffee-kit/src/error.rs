//! Error types for coffee-kit.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) — Main error type, returned by most operations
//!   - [`RpcError`] — Thor REST errors (network, bad responses, reverted calls)
//!   - [`ParseAmountError`] — Invalid decimal amount entered by the user
//!   - [`SignerError`] — Wallet session failures (rejected or failed signing)
//!
//! Input errors ([`Error::ParseAmount`], [`Error::RegistryNotLoaded`], ...) are
//! raised before any network call. Transient errors are retried by the REST
//! client and absorbed by balance reads and receipt polling. A reverted
//! transaction is not an error at all; it is a terminal
//! [`PollState`](crate::PollState).
//!
//! # Example
//!
//! ```rust,no_run
//! use coffee_kit::*;
//!
//! # async fn example(coffee: Coffee) -> Result<(), Error> {
//! match coffee.send("abc").await {
//!     Ok(Some(txid)) => println!("sent {txid}"),
//!     Ok(None) => println!("no wallet connected"),
//!     Err(Error::ParseAmount(e)) => println!("fix the amount: {e}"),
//!     Err(Error::Signing(SignerError::Rejected(reason))) => println!("rejected: {reason}"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use alloy_primitives::Address;
use thiserror::Error;

/// Error parsing a decimal token amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Invalid number in amount: '{0}'")]
    InvalidNumber(String),

    #[error("Too many decimal places in '{input}' (max {max})")]
    TooManyDecimals { input: String, max: u8 },

    #[error("Unsupported number of decimals: {0}")]
    UnsupportedDecimals(u8),

    #[error("Amount overflow: value too large")]
    Overflow,
}

/// Error reported by a wallet session while signing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("No wallet connected")]
    NotConnected,

    #[error("User rejected the request: {0}")]
    Rejected(String),

    #[error("Signing failed: {0}")]
    Failed(String),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// Errors talking to a Thor node over its REST API.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Timeout after {0} retries")]
    Timeout(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Contract Calls ───
    #[error("Call to {contract} reverted: {message}")]
    CallReverted { contract: Address, message: String },
}

impl RpcError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Timeout(_) => true,
            RpcError::Network { retryable, .. } => *retryable,
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        RpcError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }
}

// ============================================================================
// Main Error Type
// ============================================================================

/// Main error type for coffee-kit operations.
#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Input ───
    #[error(transparent)]
    ParseAmount(#[from] ParseAmountError),

    #[error("Invalid address '{0}'")]
    ParseAddress(String),

    #[error("Token registry is still loading")]
    RegistryNotLoaded,

    #[error("Token {0} is not listed in the registry")]
    UnknownToken(String),

    #[error("Invalid registry entry: {0}")]
    InvalidTokenEntry(String),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // ─── Signing ───
    #[error(transparent)]
    Signing(#[from] SignerError),

    #[error("Wallet signed with {actual} but {expected} is connected")]
    SignerMismatch { expected: Address, actual: Address },

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ABI error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
}

impl Error {
    /// Returns true if this error was caused by user input and no request was made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::ParseAmount(_)
                | Error::ParseAddress(_)
                | Error::RegistryNotLoaded
                | Error::UnknownToken(_)
        )
    }
}

/// Parse a `0x`-prefixed hex address.
pub fn parse_address(s: impl AsRef<str>) -> Result<Address, Error> {
    let s = s.as_ref().trim();
    s.parse()
        .map_err(|_| Error::ParseAddress(s.to_string()))
}
