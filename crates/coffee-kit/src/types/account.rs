//! Account and contract-call views returned by the Thor REST API.

use alloy_primitives::{Bytes, U256};
use serde::Deserialize;

use super::receipt::quantity;

/// Response of `GET /accounts/{address}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetail {
    /// VET balance in wei.
    #[serde(deserialize_with = "quantity")]
    pub balance: U256,
    /// VTHO balance in wei.
    #[serde(deserialize_with = "quantity")]
    pub energy: U256,
    #[serde(default)]
    pub has_code: bool,
}

/// One entry of the `POST /accounts/*` response, one per clause.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    /// Return data of the call.
    pub data: Bytes,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
    #[serde(default)]
    pub transfers: Vec<serde_json::Value>,
    #[serde(default)]
    pub gas_used: u64,
    pub reverted: bool,
    #[serde(default)]
    pub vm_error: String,
}
