use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use fastnum::UD256;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::num;

/// Optional hint sent along with a balance query so the API can compute
/// `amount_required` for each source token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceQuery {
    pub token_address: Address,
    pub token_chain_id: u64,
    /// Decimal amount of the destination token the user wants to receive.
    pub token_amount: String,
}

/// Balance of a single token held by the queried address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token_address: String,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw balance in base units.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    /// Decimal amount of this token needed to cover the queried amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_required: Option<String>,
}

impl TokenBalance {
    /// Balance as a decimal amount, if the API reported a parseable one.
    pub fn amount(&self) -> Option<UD256> {
        let raw: U256 = self.balance.as_deref()?.parse().ok()?;
        Some(num::Converter::new(self.decimals).from_base_units(raw))
    }
}

/// Balances of a single chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBalances {
    #[serde(default)]
    pub balances: Vec<TokenBalance>,
}

/// Token balances of an address across chains, keyed by chain ID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub balances: HashMap<String, ChainBalances>,
}

impl Balances {
    /// Balances on the given chain, if any.
    pub fn chain(&self, chain_id: u64) -> Option<&ChainBalances> {
        self.balances.get(&chain_id.to_string())
    }

    /// Keeps only the balances of the given chain.
    pub fn only_chain(mut self, chain_id: u64) -> Self {
        let key = chain_id.to_string();
        self.balances.retain(|k, _| *k == key);
        self
    }

    /// First token held on the given chain, the default pick for the source
    /// token of a wallet transfer.
    pub fn first_on_chain(&self, chain_id: u64) -> Option<&TokenBalance> {
        self.chain(chain_id)?.balances.first()
    }

    /// Chain IDs with at least one token, in ascending numeric order.
    pub fn chain_ids(&self) -> Vec<u64> {
        self.balances
            .iter()
            .filter(|(_, b)| !b.balances.is_empty())
            .filter_map(|(k, _)| k.parse::<u64>().ok())
            .sorted()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.values().all(|b| b.balances.is_empty())
    }
}
