//! The main Coffee client.

use std::sync::Arc;

use alloy_primitives::Address;

use crate::error::{Error, parse_address};
use crate::tokens::{DEFAULT_REGISTRY_URL, Token, TokenRegistry};
use crate::types::{Clause, Network, Receipt, TxId};

use super::poller::{Clock, PollPolicy, ReceiptPoller, ReceiptSource, ReceiptWatcher, TokioClock};
use super::query::BalanceQuery;
use super::rpc::{MAINNET, RetryConfig, SOLO, TESTNET, ThorClient};
use super::signer::WalletSession;
use super::transaction::{TransferCall, compose_transfer};

/// Title and description shown by front-ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub title: String,
    pub description: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            title: "Buy me a Coffee".to_string(),
            description: "Send a tip in VET or any token from the registry.".to_string(),
        }
    }
}

/// The main client for the coffee flow.
///
/// Holds the node client, the optional wallet session, the tip recipient and
/// the token registry. Cheap to clone; clones share the registry cache.
///
/// # Example
///
/// ```rust,no_run
/// use coffee_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), coffee_kit::Error> {
///     # let session: std::sync::Arc<dyn WalletSession> = todo!();
///     let coffee = Coffee::testnet()
///         .recipient("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed")?
///         .session(session)
///         .build();
///
///     if let Some(txid) = coffee.send("5").await? {
///         let state = coffee.watch(txid).wait().await;
///         println!("{}", state.status_text());
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Coffee {
    rpc: Arc<ThorClient>,
    session: Option<Arc<dyn WalletSession>>,
    network: Network,
    recipient: Option<Address>,
    registry: TokenRegistry,
    receipts: Arc<dyn ReceiptSource>,
    clock: Arc<dyn Clock>,
    poll_policy: PollPolicy,
    app: AppInfo,
}

impl Coffee {
    /// Create a builder for mainnet.
    pub fn mainnet() -> CoffeeBuilder {
        CoffeeBuilder::new(MAINNET.node_url, Network::Main)
    }

    /// Create a builder for testnet.
    pub fn testnet() -> CoffeeBuilder {
        CoffeeBuilder::new(TESTNET.node_url, Network::Test)
    }

    /// Create a builder for a local solo node.
    pub fn solo() -> CoffeeBuilder {
        CoffeeBuilder::new(SOLO.node_url, Network::Solo)
    }

    /// Create a builder with a custom node URL.
    ///
    /// Custom nodes have no token registry unless one is set with
    /// [`CoffeeBuilder::registry_url`].
    pub fn custom(node_url: impl Into<String>) -> CoffeeBuilder {
        CoffeeBuilder::new(node_url, Network::Custom)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `THOR_NETWORK` (optional): `"main"`, `"test"`, `"solo"`, or a custom
    ///   node URL. Defaults to `"test"`.
    /// - `THOR_NODE_URL` (optional): overrides the network's node URL.
    /// - `COFFEE_RECIPIENT` (optional): address receiving the tips.
    /// - `TOKEN_REGISTRY_URL` (optional): full URL of the token list.
    ///
    /// The wallet session cannot come from the environment; add one with
    /// [`Coffee::from_env_builder`] when sending.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseAddress`] if `COFFEE_RECIPIENT` is not an address.
    pub fn from_env() -> Result<Coffee, Error> {
        Ok(Self::from_env_builder()?.build())
    }

    /// Like [`from_env`](Self::from_env), returning the builder.
    pub fn from_env_builder() -> Result<CoffeeBuilder, Error> {
        CoffeeBuilder::from_vars(|key| std::env::var(key).ok())
    }

    /// Get the underlying node client.
    pub fn rpc(&self) -> &ThorClient {
        &self.rpc
    }

    /// Get the node URL.
    pub fn node_url(&self) -> &str {
        self.rpc.url()
    }

    /// Get the network this client is connected to.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The tip recipient, if configured.
    pub fn recipient(&self) -> Option<Address> {
        self.recipient
    }

    /// The token registry.
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Title and description for display.
    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    /// The receipt polling policy.
    pub fn poll_policy(&self) -> PollPolicy {
        self.poll_policy
    }

    /// The wallet's connected account, if any.
    pub fn account(&self) -> Option<Address> {
        self.session.as_ref().and_then(|s| s.connected_account())
    }

    // ========================================================================
    // Read Operations
    // ========================================================================

    /// Get the VET (or, with `.token()`, token) balance of `account`.
    pub fn balance(&self, account: Address) -> BalanceQuery {
        BalanceQuery::new(self.rpc.clone(), account)
    }

    /// Read a balance formatted for display (`"1.5"`, no symbol).
    pub async fn read_balance(
        &self,
        account: Address,
        token: Option<&Token>,
    ) -> Result<String, Error> {
        let amount = self.balance(account).maybe_token(token.cloned()).await?;
        Ok(amount.format_amount())
    }

    /// Fetch the receipt of `txid` once. `None` while not mined.
    pub async fn receipt(&self, txid: TxId) -> Result<Option<Receipt>, Error> {
        self.receipts.receipt(txid).await
    }

    // ========================================================================
    // Write Operations
    // ========================================================================

    /// The clause a send of `amount` would submit to the recipient.
    pub fn compose(&self, token: Option<&Token>, amount: &str) -> Result<Option<Clause>, Error> {
        self.recipient
            .map(|recipient| compose_transfer(token, amount, recipient))
            .transpose()
    }

    /// Send `amount` VET (or a token, with `.token()`) to the recipient.
    ///
    /// Resolves to `Ok(None)` without contacting the wallet when no account
    /// is connected or no recipient is configured.
    pub fn send(&self, amount: impl Into<String>) -> TransferCall {
        TransferCall::new(self.session.clone(), self.recipient, amount)
    }

    // ========================================================================
    // Receipt Polling
    // ========================================================================

    /// An idle poller using this client's receipt source, clock and policy.
    pub fn poller(&self) -> ReceiptPoller {
        ReceiptPoller::new(self.receipts.clone(), self.clock.clone(), self.poll_policy)
    }

    /// Start polling `txid` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn watch(&self, txid: TxId) -> ReceiptWatcher {
        ReceiptWatcher::spawn(self.poller(), txid)
    }
}

impl std::fmt::Debug for Coffee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coffee")
            .field("rpc", &self.rpc)
            .field("network", &self.network)
            .field("recipient", &self.recipient)
            .field("account", &self.account())
            .field("registry", &self.registry)
            .field("poll_policy", &self.poll_policy)
            .finish()
    }
}

/// Builder for creating a [`Coffee`] client.
///
/// # Example
///
/// ```rust,ignore
/// use coffee_kit::*;
/// use std::time::Duration;
///
/// let coffee = Coffee::mainnet()
///     .recipient("0x7567d83b7b8d80addcb281a71d54fc7b3364ffed")?
///     .session(my_wallet)
///     .poll_policy(PollPolicy::default().with_interval(Duration::from_secs(10)))
///     .build();
/// ```
pub struct CoffeeBuilder {
    node_url: String,
    network: Network,
    session: Option<Arc<dyn WalletSession>>,
    recipient: Option<Address>,
    retry_config: RetryConfig,
    poll_policy: PollPolicy,
    registry_url: Option<String>,
    registry: Option<TokenRegistry>,
    receipts: Option<Arc<dyn ReceiptSource>>,
    clock: Arc<dyn Clock>,
    app: AppInfo,
}

impl CoffeeBuilder {
    /// Create a new builder with the given node URL.
    fn new(node_url: impl Into<String>, network: Network) -> Self {
        Self {
            node_url: node_url.into(),
            network,
            session: None,
            recipient: None,
            retry_config: RetryConfig::default(),
            poll_policy: PollPolicy::default(),
            registry_url: None,
            registry: None,
            receipts: None,
            clock: Arc::new(TokioClock),
            app: AppInfo::default(),
        }
    }

    /// Configure a builder from a variable lookup (see [`Coffee::from_env`]).
    pub fn from_vars<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let network = lookup("THOR_NETWORK");
        let mut builder = match network.as_deref().map(str::trim) {
            None | Some("") => Coffee::testnet(),
            Some(value) => match value.parse::<Network>() {
                Ok(Network::Main) => Coffee::mainnet(),
                Ok(Network::Solo) => Coffee::solo(),
                Ok(_) => Coffee::testnet(),
                Err(_) => Coffee::custom(value),
            },
        };

        if let Some(url) = lookup("THOR_NODE_URL").filter(|u| !u.trim().is_empty()) {
            builder.node_url = url.trim().to_string();
        }
        if let Some(recipient) = lookup("COFFEE_RECIPIENT").filter(|r| !r.trim().is_empty()) {
            builder = builder.recipient(recipient)?;
        }
        if let Some(url) = lookup("TOKEN_REGISTRY_URL").filter(|u| !u.trim().is_empty()) {
            builder = builder.registry_url(url.trim());
        }

        Ok(builder)
    }

    /// Set the wallet session used for signing.
    ///
    /// The session's connected account is the one that signs.
    pub fn session(mut self, session: impl WalletSession + 'static) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    /// Set the address receiving the tips.
    pub fn recipient(mut self, recipient: impl AsRef<str>) -> Result<Self, Error> {
        self.recipient = Some(parse_address(recipient)?);
        Ok(self)
    }

    /// Set the recipient from an already parsed address.
    pub fn recipient_address(mut self, recipient: Address) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Set the retry configuration.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Set the receipt polling policy.
    pub fn poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    /// Read the token list from `url` instead of the hosted registry.
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.registry_url = Some(url.into());
        self
    }

    /// Use an existing registry (shares its cache).
    pub fn registry(mut self, registry: TokenRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Poll receipts from `source` instead of the node.
    pub fn receipt_source(mut self, source: Arc<dyn ReceiptSource>) -> Self {
        self.receipts = Some(source);
        self
    }

    /// Set the clock used between receipt polls.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the title and description.
    pub fn app_info(mut self, app: AppInfo) -> Self {
        self.app = app;
        self
    }

    /// Build the client.
    pub fn build(self) -> Coffee {
        let rpc = Arc::new(ThorClient::with_retry_config(
            self.node_url,
            self.retry_config,
        ));

        let registry = match (self.registry, self.registry_url) {
            (Some(registry), _) => registry,
            (None, Some(url)) => TokenRegistry::with_url(url),
            (None, None) => TokenRegistry::new(DEFAULT_REGISTRY_URL, self.network),
        };

        let receipts = self
            .receipts
            .unwrap_or_else(|| rpc.clone() as Arc<dyn ReceiptSource>);

        Coffee {
            rpc,
            session: self.session,
            network: self.network,
            recipient: self.recipient,
            registry,
            receipts,
            clock: self.clock,
            poll_policy: self.poll_policy,
            app: self.app,
        }
    }
}

impl From<CoffeeBuilder> for Coffee {
    fn from(builder: CoffeeBuilder) -> Self {
        builder.build()
    }
}
