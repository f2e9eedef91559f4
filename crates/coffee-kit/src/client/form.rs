//! Send form state.
//!
//! [`CoffeeForm`] ties the pieces together the way a single-page tip UI
//! does: an amount field, a token selector, the balance line with its "use
//! max" shortcut, the send button, an inline error, and the status of the
//! last transaction.

use alloy_primitives::Address;

use crate::error::Error;
use crate::tokens::{Token, TokenSelector};
use crate::types::{TxId, VET_SYMBOL};

use super::coffee::Coffee;
use super::poller::{PollState, ReceiptWatcher};
use super::query::BalanceReader;

/// Shown instead of the form when no wallet is connected.
pub const CONNECT_WALLET_TEXT: &str = "Please connect your wallet to continue.";

/// State of the tip form.
///
/// # Example
///
/// ```rust,no_run
/// # use coffee_kit::*;
/// # async fn example(coffee: Coffee) -> Result<(), coffee_kit::Error> {
/// let mut form = CoffeeForm::new(coffee);
/// form.refresh().await;
///
/// form.set_amount("2.5");
/// println!("[{}]", form.send_label()); // "[send 2.5 VET]"
///
/// if form.can_send() {
///     form.send().await?;
///     let state = form.wait().await;
///     println!("{}", state.status_text());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CoffeeForm {
    coffee: Coffee,
    amount: String,
    selector: TokenSelector,
    token: Option<Token>,
    balance: BalanceReader,
    error: Option<String>,
    watcher: Option<ReceiptWatcher>,
}

impl CoffeeForm {
    /// An empty form paying native VET.
    pub fn new(coffee: Coffee) -> Self {
        Self {
            coffee,
            amount: String::new(),
            selector: TokenSelector::new(),
            token: None,
            balance: BalanceReader::new(),
            error: None,
            watcher: None,
        }
    }

    /// The client behind the form.
    pub fn coffee(&self) -> &Coffee {
        &self.coffee
    }

    /// The connected account.
    pub fn account(&self) -> Option<Address> {
        self.coffee.account()
    }

    // ========================================================================
    // Amount & token
    // ========================================================================

    /// The amount as typed.
    pub fn amount(&self) -> &str {
        &self.amount
    }

    /// Replace the amount field.
    pub fn set_amount(&mut self, amount: impl Into<String>) {
        self.amount = amount.into();
    }

    /// The token selector.
    pub fn selector(&self) -> &TokenSelector {
        &self.selector
    }

    /// Load the registry into the selector.
    pub async fn load_tokens(&mut self) -> Result<(), Error> {
        self.selector.load(self.coffee.registry()).await
    }

    /// Select a token by option value (`""` for VET).
    ///
    /// On error the previous selection is kept.
    pub fn select_token(&mut self, value: &str) -> Result<(), Error> {
        self.token = self.selector.select(value)?;
        Ok(())
    }

    /// The selected token (`None` = VET).
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Symbol of the selected token.
    pub fn symbol(&self) -> &str {
        self.token.as_ref().map_or(VET_SYMBOL, |t| t.symbol.as_str())
    }

    // ========================================================================
    // Balance
    // ========================================================================

    /// Re-read the connected account's balance of the selected token.
    ///
    /// Returns `None` when no wallet is connected.
    pub async fn refresh_balance(&mut self) -> Option<&str> {
        let query = self
            .account()
            .map(|account| self.coffee.balance(account).maybe_token(self.token.clone()));
        self.balance.refresh(query).await
    }

    /// The displayed balance.
    pub fn balance(&self) -> &str {
        self.balance.display()
    }

    /// Copy the displayed balance into the amount field.
    pub fn use_max_amount(&mut self) {
        self.amount = self.balance.max_amount();
    }

    /// Load the token list and the balance concurrently.
    ///
    /// A failed registry fetch is logged; the selector stays loading and the
    /// next refresh tries again.
    pub async fn refresh(&mut self) {
        let account = self.coffee.account();
        let query = account.map(|a| self.coffee.balance(a).maybe_token(self.token.clone()));
        let registry = self.coffee.registry().clone();

        let selector = &mut self.selector;
        let balance = &mut self.balance;
        let (loaded, _) = futures::join!(selector.load(&registry), balance.refresh(query));

        if let Err(error) = loaded {
            tracing::warn!(%error, "token registry unavailable");
        }
    }

    // ========================================================================
    // Sending
    // ========================================================================

    /// Returns true if the send button is enabled.
    ///
    /// [`send`](Self::send) borrows the form mutably, so a second send cannot
    /// start while one is in flight.
    pub fn can_send(&self) -> bool {
        self.account().is_some() && !self.amount.is_empty()
    }

    /// Text of the send button.
    pub fn send_label(&self) -> String {
        format!("send {} {}", self.amount, self.symbol())
    }

    /// Submit the form.
    ///
    /// Clears the error text first. A failure is stored as the error text and
    /// returned; the previous transaction stays tracked. A success replaces
    /// the tracked transaction, cancelling the polling of the previous one.
    ///
    /// Dropping the future before it resolves leaves the form usable; the
    /// previous transaction stays tracked.
    pub async fn send(&mut self) -> Result<Option<TxId>, Error> {
        self.error = None;
        let result = self
            .coffee
            .send(self.amount.clone())
            .maybe_token(self.token.clone())
            .await;

        match result {
            Ok(Some(txid)) => {
                self.watcher = Some(self.coffee.watch(txid));
                Ok(Some(txid))
            }
            Ok(None) => Ok(None),
            Err(error) => {
                self.error = Some(error.to_string());
                Err(error)
            }
        }
    }

    /// The inline error text of the last send.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The tracked transaction.
    pub fn txid(&self) -> Option<TxId> {
        self.watcher.as_ref().map(ReceiptWatcher::txid)
    }

    /// The watcher of the tracked transaction.
    pub fn watcher(&self) -> Option<&ReceiptWatcher> {
        self.watcher.as_ref()
    }

    /// Current state of the tracked transaction.
    pub fn state(&self) -> PollState {
        self.watcher
            .as_ref()
            .map_or(PollState::Idle, ReceiptWatcher::state)
    }

    /// Wait for the tracked transaction to reach a terminal state.
    pub async fn wait(&self) -> PollState {
        match &self.watcher {
            Some(watcher) => watcher.wait().await,
            None => PollState::Idle,
        }
    }

    /// Status line under the form.
    pub fn status_text(&self) -> &'static str {
        if self.account().is_none() {
            return CONNECT_WALLET_TEXT;
        }
        self.state().status_text()
    }
}
