mod balance;
mod deposit;
mod onramp;
mod status;

pub use balance::{BalanceQuery, Balances, ChainBalances, TokenBalance};
pub use deposit::{
    DepositAddressData, DepositPayload, DepositRequest, ProviderType, TransferSource,
    TransferType, TxData,
};
pub use onramp::{CryptoTokenData, OnRampOrder};
pub use status::{RequestStatus, RoutingRequestStatus, StatusClass};

use alloy::primitives::{Address, address};

/// Opaque ID assigned by the funding API to a routing request.
pub type RequestId = String;

/// Token on a specific chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub chain_id: u64,
    pub address: Address,
    pub decimals: u8,
}

impl TokenRef {
    pub fn new(chain_id: u64, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
        }
    }

    /// USDC on Base.
    pub fn usdc_base() -> Self {
        Self {
            chain_id: 8453,
            address: address!("0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"),
            decimals: 6,
        }
    }
}
