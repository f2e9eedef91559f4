//! Transaction clauses.
//!
//! A Thor transaction carries a list of clauses; each clause moves VET to an
//! address and/or calls a contract. The coffee flow always sends exactly one.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;

/// A single transfer or contract call instruction.
///
/// Clauses are built once per submission and never mutated afterwards; the
/// fields are only reachable through accessors.
///
/// # Example
///
/// ```
/// use coffee_kit::Clause;
/// use alloy_primitives::{Address, U256};
///
/// let clause = Clause::transfer_vet(Address::ZERO, U256::from(1u8))
///     .with_comment("Send 1 wei");
/// assert!(clause.is_native_transfer());
/// assert_eq!(clause.comment(), Some("Send 1 wei"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Clause {
    to: Address,
    value: U256,
    data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Clause {
    /// A plain VET transfer of `value` wei to `to`.
    pub fn transfer_vet(to: Address, value: U256) -> Self {
        Self {
            to,
            value,
            data: Bytes::new(),
            comment: None,
        }
    }

    /// A call to `contract` with ABI-encoded call data and no VET attached.
    pub fn call_function<C: SolCall>(contract: Address, call: &C) -> Self {
        Self {
            to: contract,
            value: U256::ZERO,
            data: Bytes::from(call.abi_encode()),
            comment: None,
        }
    }

    /// Attach the human-readable comment shown by the wallet.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The receiving account or called contract.
    pub fn to(&self) -> Address {
        self.to
    }

    /// VET attached to the clause, in wei.
    pub fn value(&self) -> U256 {
        self.value
    }

    /// Call data (`0x` for a plain transfer).
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The wallet comment, if any.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Returns true if this clause moves VET without calling a contract.
    pub fn is_native_transfer(&self) -> bool {
        self.data.is_empty()
    }
}
