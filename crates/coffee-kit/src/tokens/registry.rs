//! Token registry client.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{Error, RpcError};
use crate::types::Network;

use super::types::{RawToken, Token};

/// Where the public VeChain token lists are hosted.
pub const DEFAULT_REGISTRY_URL: &str = "https://vechain.github.io/token-registry";

/// Client for the hosted token registry (`{base}/{network}.json`).
///
/// # Caching
///
/// The list is fetched lazily on first use and cached for the lifetime of the
/// registry (and every clone of it). A failed fetch is not cached, so the next
/// call retries.
///
/// # Validation
///
/// Each entry is checked against a strict schema before it becomes a
/// [`Token`]. Entries that fail are dropped with a warning; a response that
/// is not a JSON array fails the whole fetch.
#[derive(Clone)]
pub struct TokenRegistry {
    http: reqwest::Client,
    url: Option<String>,
    tokens: Arc<OnceCell<Vec<Token>>>,
}

impl TokenRegistry {
    /// Registry for `network` under the given base URL.
    ///
    /// Networks without a hosted list (solo, custom) resolve to an empty list.
    pub fn new(base_url: impl AsRef<str>, network: Network) -> Self {
        let base = base_url.as_ref().trim_end_matches('/');
        let url = network
            .registry_name()
            .map(|name| format!("{base}/{name}.json"));
        Self {
            http: reqwest::Client::new(),
            url,
            tokens: Arc::new(OnceCell::new()),
        }
    }

    /// Registry reading one explicit list URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: Some(url.into()),
            tokens: Arc::new(OnceCell::new()),
        }
    }

    /// A registry that is already loaded and never hits the network.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: None,
            tokens: Arc::new(OnceCell::new_with(Some(tokens))),
        }
    }

    /// The list URL, if this network has one.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Returns the cached list without fetching.
    pub fn cached(&self) -> Option<&[Token]> {
        self.tokens.get().map(Vec::as_slice)
    }

    /// Returns true once the list has been fetched.
    pub fn is_loaded(&self) -> bool {
        self.tokens.initialized()
    }

    /// Get the token list, fetching it on first use.
    pub async fn tokens(&self) -> Result<&[Token], Error> {
        self.tokens
            .get_or_try_init(|| self.fetch())
            .await
            .map(Vec::as_slice)
    }

    /// Look up a token by contract address.
    pub async fn find(&self, address: alloy_primitives::Address) -> Result<Option<&Token>, Error> {
        Ok(self.tokens().await?.iter().find(|t| t.address == address))
    }

    async fn fetch(&self) -> Result<Vec<Token>, Error> {
        let Some(url) = self.url.as_deref() else {
            return Ok(Vec::new());
        };

        tracing::debug!(url, "fetching token registry");

        let response = self.http.get(url).send().await.map_err(RpcError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(RpcError::from)?;

        if !status.is_success() {
            return Err(RpcError::network(
                format!("HTTP {} fetching {}", status, url),
                Some(status.as_u16()),
                status.is_server_error(),
            )
            .into());
        }

        let tokens = parse_registry(&body)?;
        tracing::info!(url, count = tokens.len(), "token registry loaded");
        Ok(tokens)
    }
}

impl std::fmt::Debug for TokenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRegistry")
            .field("url", &self.url)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

/// Parse and validate a registry document.
///
/// Invalid entries are skipped; duplicate addresses keep the first entry.
pub fn parse_registry(body: &str) -> Result<Vec<Token>, Error> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(RpcError::Json)?;
    let serde_json::Value::Array(entries) = value else {
        return Err(RpcError::InvalidResponse("token registry is not a JSON array".to_string()).into());
    };

    let mut tokens: Vec<Token> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let token = serde_json::from_value::<RawToken>(entry)
            .map_err(Error::from)
            .and_then(RawToken::validate);
        match token {
            Ok(token) if tokens.iter().any(|t| t.address == token.address) => {
                tracing::warn!(index, address = %token.address, "duplicate registry entry skipped");
            }
            Ok(token) => tokens.push(token),
            Err(error) => {
                tracing::warn!(index, %error, "invalid registry entry skipped");
            }
        }
    }
    Ok(tokens)
}
