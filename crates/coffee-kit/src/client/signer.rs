//! Wallet session trait.
//!
//! Key storage, wallet discovery and signing live outside this crate. A
//! [`WalletSession`] exposes the connected account and signs (and broadcasts)
//! clauses on request.
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use coffee_kit::{SignFuture, SignRequest, SignResponse, WalletSession};
//! use alloy_primitives::Address;
//!
//! struct Extension { account: Option<Address> }
//!
//! impl WalletSession for Extension {
//!     fn connected_account(&self) -> Option<Address> {
//!         self.account
//!     }
//!
//!     fn sign(&self, request: SignRequest) -> SignFuture<'_> {
//!         Box::pin(async move {
//!             let txid = forward_to_wallet(&request).await?;
//!             Ok(SignResponse { txid, signer: request.signer })
//!         })
//!     }
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::SignerError;
use crate::types::{Clause, TxId};

/// Boxed future returned by [`WalletSession::sign`].
pub type SignFuture<'a> =
    Pin<Box<dyn Future<Output = Result<SignResponse, SignerError>> + Send + 'a>>;

/// A request to sign and broadcast a transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignRequest {
    /// Clauses of the transaction, in order.
    pub clauses: Vec<Clause>,
    /// The account that must sign.
    pub signer: Address,
}

/// The wallet's answer to a [`SignRequest`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignResponse {
    /// Id of the broadcast transaction.
    pub txid: TxId,
    /// The account that actually signed.
    pub signer: Address,
}

/// A connected wallet.
pub trait WalletSession: Send + Sync {
    /// The active account, if a wallet is connected.
    fn connected_account(&self) -> Option<Address>;

    /// Sign and broadcast `request`.
    fn sign(&self, request: SignRequest) -> SignFuture<'_>;
}

impl WalletSession for Arc<dyn WalletSession> {
    fn connected_account(&self) -> Option<Address> {
        (**self).connected_account()
    }

    fn sign(&self, request: SignRequest) -> SignFuture<'_> {
        (**self).sign(request)
    }
}
