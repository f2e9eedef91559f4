//! Receipt polling.
//!
//! After a transaction is broadcast its receipt is polled on a fixed interval
//! until the node reports it mined (confirmed or reverted), or until the
//! attempt budget runs out.
//!
//! ```text
//! Idle ──track──▶ Pending ──receipt, reverted──▶ Reverted
//!                    │    ──receipt, ok───────▶ Confirmed
//!                    └────budget exhausted────▶ Expired
//! ```
//!
//! [`ReceiptPoller`] is the state machine; [`ReceiptWatcher`] runs it as a
//! spawned task and publishes every state through a `watch` channel. Time
//! and the receipt endpoint are injected ([`Clock`], [`ReceiptSource`]).
//!
//! # Example
//!
//! ```rust,no_run
//! # use coffee_kit::*;
//! # async fn example(coffee: Coffee, txid: TxId) {
//! let watcher = coffee.watch(txid);
//! match watcher.wait().await {
//!     PollState::Confirmed { .. } => println!("Success"),
//!     PollState::Reverted { .. } => println!("Transaction Reverted"),
//!     other => println!("{}", other.status_text()),
//! }
//! # }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::Error;
use crate::types::{Receipt, TxId};

use super::rpc::ThorClient;

/// Default delay between two receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(7);

/// Default number of polls before giving up (about 21 minutes at 7 s).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 180;

// ============================================================================
// Injected dependencies
// ============================================================================

/// Boxed future returned by [`Clock::sleep`].
pub type SleepFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

/// Source of delays between polls.
pub trait Clock: Send + Sync {
    /// Wait for `duration`.
    fn sleep(&self, duration: Duration) -> SleepFuture<'_>;
}

/// [`Clock`] backed by `tokio::time`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn sleep(&self, duration: Duration) -> SleepFuture<'_> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Boxed future returned by [`ReceiptSource::receipt`].
pub type ReceiptFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<Receipt>, Error>> + Send + 'a>>;

/// Where receipts come from. `Ok(None)` means not mined yet.
pub trait ReceiptSource: Send + Sync {
    /// Fetch the receipt of `txid`.
    fn receipt(&self, txid: TxId) -> ReceiptFuture<'_>;
}

impl ReceiptSource for ThorClient {
    fn receipt(&self, txid: TxId) -> ReceiptFuture<'_> {
        Box::pin(async move { Ok(self.transaction_receipt(&txid).await?) })
    }
}

impl<T: ReceiptSource + ?Sized> ReceiptSource for Arc<T> {
    fn receipt(&self, txid: TxId) -> ReceiptFuture<'_> {
        (**self).receipt(txid)
    }
}

// ============================================================================
// PollState
// ============================================================================

/// State of the tracked transaction.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum PollState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Broadcast, receipt not available yet.
    Pending(TxId),
    /// Mined, clauses reverted.
    Reverted { txid: TxId, receipt: Receipt },
    /// Mined successfully.
    Confirmed { txid: TxId, receipt: Receipt },
    /// Still pending after the attempt budget was used up.
    Expired(TxId),
}

impl PollState {
    /// Returns true once polling has stopped for good.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Reverted { .. } | PollState::Confirmed { .. } | PollState::Expired(_)
        )
    }

    /// The tracked transaction id, if any.
    pub fn txid(&self) -> Option<TxId> {
        match self {
            PollState::Idle => None,
            PollState::Pending(txid)
            | PollState::Expired(txid)
            | PollState::Reverted { txid, .. }
            | PollState::Confirmed { txid, .. } => Some(*txid),
        }
    }

    /// The receipt, once mined.
    pub fn receipt(&self) -> Option<&Receipt> {
        match self {
            PollState::Reverted { receipt, .. } | PollState::Confirmed { receipt, .. } => {
                Some(receipt)
            }
            _ => None,
        }
    }

    /// Status line shown under the send form (empty when idle).
    pub fn status_text(&self) -> &'static str {
        match self {
            PollState::Idle => "",
            PollState::Pending(_) => "Waiting for Transaction..",
            PollState::Reverted { .. } => "Transaction Reverted",
            PollState::Confirmed { .. } => "Success",
            PollState::Expired(_) => "Transaction Expired",
        }
    }
}

// ============================================================================
// PollPolicy
// ============================================================================

/// How often and how long to poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between polls.
    pub interval: Duration,
    /// Polls before giving up; `None` polls forever.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl PollPolicy {
    /// Poll every 7 s until the receipt shows up, however long that takes.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    /// Set the delay between polls.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }
}

// ============================================================================
// ReceiptPoller
// ============================================================================

/// Receipt polling state machine for one transaction at a time.
pub struct ReceiptPoller {
    source: Arc<dyn ReceiptSource>,
    clock: Arc<dyn Clock>,
    policy: PollPolicy,
    state: PollState,
    attempts: u32,
}

impl ReceiptPoller {
    /// Create an idle poller.
    pub fn new(source: Arc<dyn ReceiptSource>, clock: Arc<dyn Clock>, policy: PollPolicy) -> Self {
        Self {
            source,
            clock,
            policy,
            state: PollState::Idle,
            attempts: 0,
        }
    }

    /// Start tracking `txid`, dropping whatever was tracked before.
    pub fn track(&mut self, txid: TxId) -> &PollState {
        self.attempts = 0;
        self.state = PollState::Pending(txid);
        &self.state
    }

    /// Forget the tracked transaction.
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.state = PollState::Idle;
    }

    /// Current state.
    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// Polls made for the tracked transaction.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The polling policy.
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Poll the receipt once, if pending. Does not sleep.
    ///
    /// Fetch errors are logged and leave the state pending.
    pub async fn step(&mut self) -> &PollState {
        let PollState::Pending(txid) = self.state else {
            return &self.state;
        };

        self.attempts += 1;
        tracing::debug!(txid = %txid, attempt = self.attempts, "polling receipt");

        match self.source.receipt(txid).await {
            Ok(Some(receipt)) if receipt.reverted => {
                tracing::info!(txid = %txid, "transaction reverted");
                self.state = PollState::Reverted { txid, receipt };
            }
            Ok(Some(receipt)) => {
                tracing::info!(txid = %txid, "transaction confirmed");
                self.state = PollState::Confirmed { txid, receipt };
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(txid = %txid, attempt = self.attempts, %error, "receipt poll failed");
            }
        }

        if matches!(self.state, PollState::Pending(_))
            && self
                .policy
                .max_attempts
                .is_some_and(|max| self.attempts >= max)
        {
            tracing::warn!(txid = %txid, attempts = self.attempts, "gave up waiting for receipt");
            self.state = PollState::Expired(txid);
        }

        &self.state
    }

    /// Poll until a terminal state, calling `publish` after every poll.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn run<F>(&mut self, mut publish: F) -> PollState
    where
        F: FnMut(&PollState),
    {
        while matches!(self.state, PollState::Pending(_)) {
            let state = self.step().await;
            publish(state);
            if state.is_terminal() {
                break;
            }
            self.clock.sleep(self.policy.interval).await;
        }
        self.state.clone()
    }
}

impl std::fmt::Debug for ReceiptPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptPoller")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .field("attempts", &self.attempts)
            .finish()
    }
}

// ============================================================================
// ReceiptWatcher
// ============================================================================

/// A [`ReceiptPoller`] running in a background task.
///
/// The last published state stays readable between polls. Dropping the
/// watcher stops the task.
#[derive(Debug)]
pub struct ReceiptWatcher {
    txid: TxId,
    state: watch::Receiver<PollState>,
    task: JoinHandle<()>,
}

impl ReceiptWatcher {
    /// Start polling `txid` with `poller` on the current tokio runtime.
    pub fn spawn(mut poller: ReceiptPoller, txid: TxId) -> Self {
        let (tx, rx) = watch::channel(poller.track(txid).clone());

        let task = tokio::spawn(async move {
            let last = poller
                .run(|state| {
                    tx.send_if_modified(|current| {
                        if *current == *state {
                            return false;
                        }
                        *current = state.clone();
                        true
                    });
                })
                .await;
            tracing::debug!(txid = %txid, status = last.status_text(), "receipt watcher finished");
        });

        Self {
            txid,
            state: rx,
            task,
        }
    }

    /// The watched transaction.
    pub fn txid(&self) -> TxId {
        self.txid
    }

    /// The latest published state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.clone()
    }

    /// Wait for a terminal state.
    ///
    /// If the watcher is cancelled first, returns the last published state.
    pub async fn wait(&self) -> PollState {
        let mut rx = self.state.clone();
        let result = rx
            .wait_for(PollState::is_terminal)
            .await
            .map(|state| state.clone());
        match result {
            Ok(state) => state,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Stop polling. The last published state is kept.
    pub fn cancel(&self) {
        self.task.abort();
    }

    /// Returns true once the polling task has stopped.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for ReceiptWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
