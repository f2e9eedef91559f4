//! ERC20 call encoding.
//!
//! VIP-180 tokens on VeChainThor share the ERC20 ABI, so the encoding is
//! delegated to `alloy-sol-types`.

use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, sol};

use crate::error::Error;
use crate::types::Clause;

sol! {
    /// The subset of ERC20 the coffee flow needs.
    interface IERC20 {
        function transfer(address recipient, uint256 amount) external returns (bool);
        function balanceOf(address owner) external view returns (uint256 balance);
    }
}

/// Clause calling `transfer(recipient, amount)` on `token`.
pub fn transfer_clause(token: Address, recipient: Address, amount: U256) -> Clause {
    Clause::call_function(token, &IERC20::transferCall { recipient, amount })
}

/// Clause calling `balanceOf(owner)` on `token`.
pub fn balance_of_clause(token: Address, owner: Address) -> Clause {
    Clause::call_function(token, &IERC20::balanceOfCall { owner })
}

/// Decode the return data of `balanceOf`.
pub fn decode_balance(data: &[u8]) -> Result<U256, Error> {
    Ok(IERC20::balanceOfCall::abi_decode_returns(data)?)
}
