//! Transaction identifiers and receipts as returned by the Thor REST API.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A transaction identifier (32-byte hash, `0x`-prefixed hex on the wire).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(B256);

impl TxId {
    /// Wrap a raw 32-byte hash.
    pub const fn new(hash: B256) -> Self {
        Self(hash)
    }

    /// The underlying hash.
    pub fn as_b256(&self) -> &B256 {
        &self.0
    }
}

impl From<B256> for TxId {
    fn from(hash: B256) -> Self {
        Self(hash)
    }
}

impl FromStr for TxId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.parse::<B256>()
            .map(TxId)
            .map_err(|_| Error::Config(format!("invalid transaction id '{s}'")))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Parse a hex (`0x…`) or decimal quantity string.
pub(crate) fn quantity<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    U256::from_str(s.trim()).map_err(serde::de::Error::custom)
}

/// Receipt of a mined transaction.
///
/// Only `reverted` drives the send flow; the rest is kept
/// for display and diagnostics.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Whether the transaction's clauses were reverted.
    pub reverted: bool,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub gas_payer: Address,
    #[serde(default, deserialize_with = "quantity")]
    pub paid: U256,
    #[serde(default, deserialize_with = "quantity")]
    pub reward: U256,
    #[serde(default)]
    pub meta: ReceiptMeta,
    #[serde(default)]
    pub outputs: Vec<ReceiptOutput>,
}

impl Receipt {
    /// A receipt carrying only the revert flag.
    pub fn new(reverted: bool) -> Self {
        Self {
            reverted,
            gas_used: 0,
            gas_payer: Address::ZERO,
            paid: U256::ZERO,
            reward: U256::ZERO,
            meta: ReceiptMeta::default(),
            outputs: Vec::new(),
        }
    }
}

/// Block and transaction context of a receipt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptMeta {
    #[serde(rename = "blockID")]
    pub block_id: B256,
    pub block_number: u64,
    pub block_timestamp: u64,
    #[serde(rename = "txID")]
    pub tx_id: TxId,
    pub tx_origin: Address,
}

/// Per-clause output of a receipt.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReceiptOutput {
    pub contract_address: Option<Address>,
    pub events: Vec<serde_json::Value>,
    pub transfers: Vec<serde_json::Value>,
}
