use serde::Serialize;

use super::DepositAddressData;

/// Crypto leg of an on-ramp order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoTokenData {
    pub token_amount: String,
    pub token_code: String,
}

/// On-ramp checkout order: buy `fiat_amount` worth of the deposit token and
/// send it to the generated deposit address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnRampOrder {
    pub wallet_address: String,
    /// Deposit token symbol as reported, omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_crypto_currency_code: Option<String>,
    pub fiat_amount: String,
    pub fiat_currency_code: String,
    pub network: String,
    pub crypto_token_data: CryptoTokenData,
}

impl OnRampOrder {
    /// Token code used when the deposit address does not report a symbol.
    pub const DEFAULT_TOKEN_CODE: &'static str = "ETH";

    /// Prepares an order funding the given deposit address with `fiat_amount`
    /// of `fiat_currency` on `network` (e.g. `"BASE"`).
    pub fn for_deposit(
        deposit: &DepositAddressData,
        fiat_amount: impl Into<String>,
        fiat_currency: impl Into<String>,
        network: impl Into<String>,
    ) -> Self {
        let fiat_amount = fiat_amount.into();
        let symbol = deposit.deposit_token_symbol.clone();
        let token_code = symbol
            .clone()
            .unwrap_or_else(|| Self::DEFAULT_TOKEN_CODE.to_string());
        Self {
            wallet_address: deposit.deposit_address.clone(),
            default_crypto_currency_code: symbol,
            fiat_amount: fiat_amount.clone(),
            fiat_currency_code: fiat_currency.into(),
            network: network.into(),
            crypto_token_data: CryptoTokenData {
                token_amount: fiat_amount,
                token_code,
            },
        }
    }
}
