//! Calldata for the checkout flow, where the routed funds are spent by a
//! destination contract call instead of being sent to a plain recipient.

use alloy::{
    primitives::{Address, Bytes, U256},
    sol_types::SolCall,
};

alloy::sol! {
    /// Mints `amount` of `token`-backed items to `to`, paid with the routed funds.
    function mint(address token, address to, uint256 amount) external;
}

/// ABI-encoded `mint(token, to, amount)` call.
pub fn mint_calldata(token: Address, to: Address, amount: U256) -> Bytes {
    mintCall { token, to, amount }.abi_encode().into()
}
