//! Core types for VeChainThor.
//!
//! Addresses and 256-bit quantities come from `alloy-primitives`; the types
//! here model the REST responses and the clause sent to the wallet.

mod account;
mod clause;
mod network;
mod receipt;
mod units;

pub use account::{AccountDetail, CallResult};
pub use clause::Clause;
pub use network::Network;
pub use receipt::{Receipt, ReceiptMeta, ReceiptOutput, TxId};
pub use units::{
    MAX_DECIMALS, TokenAmount, VET_DECIMALS, VET_SYMBOL, format_units, parse_units,
};
