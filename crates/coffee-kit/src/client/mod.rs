//! Client module for the coffee flow.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Coffee`] — The main client, the single entry point for all operations
//! - [`CoffeeBuilder`] — Fluent builder for configuring the client
//! - [`ThorClient`] — Low-level REST client with retry logic
//! - [`CoffeeForm`] — Form state for a tip UI built on [`Coffee`]
//!
//! # Wallet Sessions
//!
//! Signing is delegated to a [`WalletSession`]: anything that knows the
//! connected account and can sign and broadcast clauses.
//!
//! # Builders
//!
//! - [`BalanceQuery`] — VET or token balance of an account
//! - [`TransferCall`] — One tip transfer to the configured recipient
//!
//! # Receipt Polling
//!
//! - [`ReceiptPoller`] — Polling state machine with injected [`Clock`] and
//!   [`ReceiptSource`]
//! - [`ReceiptWatcher`] — The poller running as a cancellable background task

mod coffee;
mod form;
mod poller;
mod query;
mod rpc;
mod signer;
mod transaction;

pub use coffee::{AppInfo, Coffee, CoffeeBuilder};
pub use form::{CONNECT_WALLET_TEXT, CoffeeForm};
pub use poller::{
    Clock, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL, PollPolicy, PollState, ReceiptFuture,
    ReceiptPoller, ReceiptSource, ReceiptWatcher, SleepFuture, TokioClock,
};
pub use query::{BalanceQuery, BalanceReader};
pub use rpc::{MAINNET, NetworkConfig, RetryConfig, SOLO, TESTNET, ThorClient};
pub use signer::{SignFuture, SignRequest, SignResponse, WalletSession};
pub use transaction::{TransferCall, compose_transfer, submit};
