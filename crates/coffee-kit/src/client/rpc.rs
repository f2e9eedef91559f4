//! Low-level REST client for a VeChainThor node.

use std::time::Duration;

use alloy_primitives::{Address, Bytes};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::RpcError;
use crate::types::{AccountDetail, CallResult, Clause, Receipt, TxId};

/// Network configuration presets.
pub struct NetworkConfig {
    /// The node URL for this network.
    pub node_url: &'static str,
    /// The network identifier (e.g., "main", "test").
    pub network_id: &'static str,
}

/// Mainnet configuration.
pub const MAINNET: NetworkConfig = NetworkConfig {
    node_url: "https://mainnet.vechain.org",
    network_id: "main",
};

/// Testnet configuration.
pub const TESTNET: NetworkConfig = NetworkConfig {
    node_url: "https://testnet.vechain.org",
    network_id: "test",
};

/// Local solo node configuration.
pub const SOLO: NetworkConfig = NetworkConfig {
    node_url: "http://localhost:8669",
    network_id: "solo",
};

/// Retry configuration for node requests.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (0-based), capped at `max_delay_ms`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Body of `POST /accounts/*`.
#[derive(Serialize)]
struct InspectRequest<'a> {
    clauses: &'a [Clause],
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<Address>,
}

/// Low-level REST client for a Thor node.
///
/// Every request is retried with exponential backoff when the failure is
/// transient (connect errors, timeouts, 408/429/5xx).
#[derive(Clone)]
pub struct ThorClient {
    url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
}

impl ThorClient {
    /// Create a new client for the node at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_retry_config(url, RetryConfig::default())
    }

    /// Create a new client with custom retry configuration.
    pub fn with_retry_config(url: impl Into<String>, retry_config: RetryConfig) -> Self {
        let url: String = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            retry_config,
        }
    }

    /// Get the node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// `GET {node}{path}` with retries.
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, RpcError> {
        self.with_retries(path, || self.client.get(self.endpoint(path)))
            .await
    }

    /// `POST {node}{path}` with a JSON body and retries.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, RpcError> {
        self.with_retries(path, || self.client.post(self.endpoint(path)).json(body))
            .await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url, path)
    }

    async fn with_retries<R, F>(&self, path: &str, request: F) -> Result<R, RpcError>
    where
        R: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let total_attempts = self.retry_config.max_retries.saturating_add(1);

        for attempt in 0..total_attempts {
            match self.try_request::<R>(request()).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < total_attempts - 1 => {
                    let delay = self.retry_config.delay_for(attempt);
                    tracing::debug!(path, attempt, delay_ms = delay.as_millis() as u64, error = %e, "retrying node request");
                    tokio::time::sleep(delay).await;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(RpcError::Timeout(total_attempts))
    }

    /// Single attempt.
    async fn try_request<R: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<R, RpcError> {
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let retryable = is_retryable_status(status.as_u16());
            return Err(RpcError::network(
                format!("HTTP {}: {}", status, body.trim()),
                Some(status.as_u16()),
                retryable,
            ));
        }

        serde_json::from_str(&body).map_err(RpcError::Json)
    }

    // ========================================================================
    // High-level REST methods
    // ========================================================================

    /// `GET /accounts/{address}`: VET and VTHO balances.
    pub async fn account(&self, address: &Address) -> Result<AccountDetail, RpcError> {
        self.get(&format!("/accounts/{address}")).await
    }

    /// `POST /accounts/*`: simulate clauses against the best block.
    pub async fn inspect_clauses(
        &self,
        clauses: &[Clause],
        caller: Option<Address>,
    ) -> Result<Vec<CallResult>, RpcError> {
        let results: Vec<CallResult> = self
            .post("/accounts/*", &InspectRequest { clauses, caller })
            .await?;

        if results.len() != clauses.len() {
            return Err(RpcError::InvalidResponse(format!(
                "expected {} call results, got {}",
                clauses.len(),
                results.len()
            )));
        }
        Ok(results)
    }

    /// Simulate a single read-only clause and return its output data.
    pub async fn call_view(&self, clause: &Clause) -> Result<Bytes, RpcError> {
        let result = self
            .inspect_clauses(std::slice::from_ref(clause), None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RpcError::InvalidResponse("empty call results".to_string()))?;

        if result.reverted {
            let message = if result.vm_error.is_empty() {
                "execution reverted".to_string()
            } else {
                result.vm_error
            };
            return Err(RpcError::CallReverted {
                contract: clause.to(),
                message,
            });
        }
        Ok(result.data)
    }

    /// `GET /transactions/{id}/receipt`: `None` while the transaction is not
    /// yet included in a block.
    pub async fn transaction_receipt(&self, txid: &TxId) -> Result<Option<Receipt>, RpcError> {
        self.get(&format!("/transactions/{txid}/receipt")).await
    }
}

impl std::fmt::Debug for ThorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThorClient")
            .field("url", &self.url)
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

/// Check if an HTTP status code is retryable.
fn is_retryable_status(status: u16) -> bool {
    // 408 Request Timeout, 429 Too Many Requests, 5xx Server Errors
    status == 408 || status == 429 || (500..600).contains(&status)
}
