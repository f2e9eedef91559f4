//! A small Rust client for "buy me a coffee" tips on VeChainThor.
//!
//! **coffee-kit** composes a single transfer clause (native VET or a
//! registry-listed token), hands it to a wallet session for signing, and
//! polls the node until the transaction is mined.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use coffee_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), coffee_kit::Error> {
//!     let coffee = Coffee::testnet()
//!         .recipient("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed")?
//!         .build();
//!
//!     // Check a balance
//!     let account = "0x7567d83b7b8d80addcb281a71d54fc7b3364ffed".parse().unwrap();
//!     let balance = coffee.balance(account).await?;
//!     println!("Balance: {}", balance);
//!
//!     // Browse the token registry
//!     for token in coffee.registry().tokens().await? {
//!         println!("{token}");
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Sending
//!
//! Sending needs a [`WalletSession`]. The session's connected account signs;
//! a session answering with another signer is rejected.
//!
//! ```rust,ignore
//! let coffee = Coffee::mainnet()
//!     .recipient("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed")?
//!     .session(my_wallet)
//!     .build();
//!
//! if let Some(txid) = coffee.send("5").await? {
//!     match coffee.watch(txid).wait().await {
//!         PollState::Confirmed { .. } => println!("Success"),
//!         state => println!("{}", state.status_text()),
//!     }
//! }
//! ```
//!
//! # Amounts
//!
//! Amounts are decimal strings parsed exactly against the token's decimals:
//!
//! ```
//! use coffee_kit::{parse_units, format_units};
//!
//! let raw = parse_units("1.5", 18).unwrap();
//! assert_eq!(format_units(raw, 18), "1.5");
//! assert!(parse_units("1e18", 18).is_err());
//! ```

pub mod client;
pub mod error;
pub mod tokens;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{Error, ParseAmountError, RpcError, SignerError, parse_address};
pub use types::*;

// Re-export client types
pub use client::{
    AppInfo, BalanceQuery, BalanceReader, CONNECT_WALLET_TEXT, Clock, Coffee, CoffeeBuilder,
    CoffeeForm, PollPolicy, PollState, ReceiptPoller, ReceiptSource, ReceiptWatcher, RetryConfig,
    SignFuture, SignRequest, SignResponse, ThorClient, TokioClock, TransferCall, WalletSession,
    compose_transfer, submit,
};

// Re-export token types
pub use tokens::{Token, TokenOption, TokenRegistry, TokenSelector};
