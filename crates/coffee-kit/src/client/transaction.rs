//! Transfer composition and submission.
//!
//! A coffee payment is always a single clause: a plain VET transfer, or a
//! call to a token's `transfer(recipient, amount)`. The clause is handed to
//! the wallet session, which signs and broadcasts it.
//!
//! # Example
//!
//! ```rust,no_run
//! # use coffee_kit::*;
//! # async fn example(coffee: Coffee, b3tr: Token) -> Result<(), coffee_kit::Error> {
//! // Native coin
//! let txid = coffee.send("5").await?;
//!
//! // A registry token
//! let txid = coffee.send("10").token(b3tr).await?;
//! # Ok(())
//! # }
//! ```

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::Error;
use crate::tokens::{Token, erc20};
use crate::types::{Clause, TxId, VET_DECIMALS, VET_SYMBOL, parse_units};

use super::signer::{SignRequest, WalletSession};

/// Build the clause paying `amount` of `token` (native VET when `None`) to
/// `recipient`.
///
/// The clause carries the wallet comment `"Send {amount} {symbol}"`.
pub fn compose_transfer(
    token: Option<&Token>,
    amount: &str,
    recipient: Address,
) -> Result<Clause, Error> {
    let amount = amount.trim();

    let clause = match token {
        None => Clause::transfer_vet(recipient, parse_units(amount, VET_DECIMALS)?),
        Some(token) => erc20::transfer_clause(
            token.address,
            recipient,
            parse_units(amount, token.decimals)?,
        ),
    };

    let symbol = token.map_or(VET_SYMBOL, |t| t.symbol.as_str());
    Ok(clause.with_comment(format!("Send {amount} {symbol}")))
}

/// Compose a transfer and ask `session` to sign it for `connected_account`.
///
/// Returns `Ok(None)` without touching the session when no account is
/// connected or no recipient is configured. The session must sign with the
/// connected account; any other signer is rejected.
pub async fn submit<S>(
    session: &S,
    token: Option<&Token>,
    amount: &str,
    recipient: Option<Address>,
    connected_account: Option<Address>,
) -> Result<Option<TxId>, Error>
where
    S: WalletSession + ?Sized,
{
    let (Some(account), Some(recipient)) = (connected_account, recipient) else {
        tracing::debug!(
            connected = connected_account.is_some(),
            recipient = recipient.is_some(),
            "send skipped"
        );
        return Ok(None);
    };

    let clause = compose_transfer(token, amount, recipient)?;
    tracing::info!(
        account = %account,
        to = %clause.to(),
        comment = clause.comment().unwrap_or_default(),
        "requesting signature"
    );

    let response = session
        .sign(SignRequest {
            clauses: vec![clause],
            signer: account,
        })
        .await?;

    if response.signer != account {
        return Err(Error::SignerMismatch {
            expected: account,
            actual: response.signer,
        });
    }

    tracing::info!(txid = %response.txid, "transaction submitted");
    Ok(Some(response.txid))
}

// ============================================================================
// TransferCall
// ============================================================================

/// Builder for a coffee payment, created by
/// [`Coffee::send`](crate::Coffee::send).
///
/// Pays native VET unless [`token`](Self::token) is set. Awaiting it signs
/// with the session's connected account.
pub struct TransferCall {
    session: Option<Arc<dyn WalletSession>>,
    recipient: Option<Address>,
    token: Option<Token>,
    amount: String,
}

impl TransferCall {
    pub(crate) fn new(
        session: Option<Arc<dyn WalletSession>>,
        recipient: Option<Address>,
        amount: impl Into<String>,
    ) -> Self {
        Self {
            session,
            recipient,
            token: None,
            amount: amount.into(),
        }
    }

    /// Pay with a registry token instead of VET.
    pub fn token(mut self, token: Token) -> Self {
        self.token = Some(token);
        self
    }

    /// Pay with `token`, or VET when `None`.
    pub fn maybe_token(mut self, token: Option<Token>) -> Self {
        self.token = token;
        self
    }

    /// The clause this call would submit.
    pub fn clause(&self) -> Result<Option<Clause>, Error> {
        self.recipient
            .map(|recipient| compose_transfer(self.token.as_ref(), &self.amount, recipient))
            .transpose()
    }
}

impl IntoFuture for TransferCall {
    type Output = Result<Option<TxId>, Error>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(async move {
            let Some(session) = self.session else {
                tracing::debug!("send skipped: no wallet session");
                return Ok(None);
            };
            let connected = session.connected_account();
            submit(
                session.as_ref(),
                self.token.as_ref(),
                &self.amount,
                self.recipient,
                connected,
            )
            .await
        })
    }
}
