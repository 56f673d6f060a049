use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use super::TokenRef;
use crate::{error::FundKitError, num};

/// How the user funds the request.
///
/// * [`TransferType::Wallet`] moves tokens already held in a connected wallet.
/// * [`TransferType::OnRamp`] buys the deposit token with fiat through an on-ramp provider.
/// * [`TransferType::Cex`] withdraws from a centralized exchange account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    Wallet,
    OnRamp,
    Cex,
}

/// Third-party provider handling on-ramp and exchange transfers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderType {
    Moonpay,
    Kado,
    MeshConnect,
}

/// Source of the funds for a deposit request.
#[derive(Clone, Debug)]
pub enum TransferSource {
    Wallet {
        from_token: TokenRef,
        /// Decimal amount of `from_token` to send.
        from_amount: String,
        from_address: Address,
    },
    OnRamp(ProviderType),
    Cex(ProviderType),
}

impl TransferSource {
    pub fn transfer_type(&self) -> TransferType {
        match self {
            TransferSource::Wallet { .. } => TransferType::Wallet,
            TransferSource::OnRamp(_) => TransferType::OnRamp,
            TransferSource::Cex(_) => TransferType::Cex,
        }
    }
}

/// Request to generate a deposit address routing funds to the destination
/// token.
#[derive(Clone, Debug)]
pub struct DepositRequest {
    source: TransferSource,
    destination: TokenRef,
    to_amount: String,
    recipient: Address,
    target_calldata: Option<Bytes>,
}

/// Wire payload of [`DepositRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPayload {
    pub user_op_hash: String,
    pub transfer_type: TransferType,
    pub destination_chain_id: String,
    pub destination_token_address: Address,
    pub to_amount: String,
    pub destination_recipient: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_amount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_chain_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_token_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_calldata: Option<Bytes>,
}

impl DepositRequest {
    /// Creates a new deposit request delivering `to_amount` (decimal) of the
    /// destination token to `recipient`.
    pub fn new(
        source: TransferSource,
        destination: TokenRef,
        to_amount: impl Into<String>,
        recipient: Address,
    ) -> Self {
        Self {
            source,
            destination,
            to_amount: to_amount.into(),
            recipient,
            target_calldata: None,
        }
    }

    /// Attaches calldata the destination contract executes with the routed
    /// funds (checkout flow).
    pub fn with_target_calldata(mut self, calldata: Bytes) -> Self {
        self.target_calldata = (!calldata.is_empty()).then_some(calldata);
        self
    }

    pub fn source(&self) -> &TransferSource {
        &self.source
    }

    pub fn destination(&self) -> TokenRef {
        self.destination
    }

    /// Builds the wire payload, converting decimal amounts into base units.
    pub fn to_payload(&self) -> Result<DepositPayload, FundKitError> {
        let to_amount = num::Converter::new(self.destination.decimals)
            .to_base_units(&self.to_amount)?;

        let mut payload = DepositPayload {
            user_op_hash: String::new(),
            transfer_type: self.source.transfer_type(),
            destination_chain_id: self.destination.chain_id.to_string(),
            destination_token_address: self.destination.address,
            to_amount: to_amount.to_string(),
            destination_recipient: self.recipient,
            from_amount: None,
            from_chain_id: None,
            from_token_address: None,
            from_address: None,
            provider: None,
            target_calldata: self.target_calldata.clone(),
        };

        match &self.source {
            TransferSource::Wallet {
                from_token,
                from_amount,
                from_address,
            } => {
                let from_amount =
                    num::Converter::new(from_token.decimals).to_base_units(from_amount)?;
                payload.from_amount = Some(from_amount.to_string());
                payload.from_chain_id = Some(from_token.chain_id.to_string());
                payload.from_token_address = Some(from_token.address);
                payload.from_address = Some(*from_address);
            }
            TransferSource::OnRamp(provider) | TransferSource::Cex(provider) => {
                payload.provider = Some(*provider);
            }
        }

        Ok(payload)
    }
}

/// Transaction the user has to sign and send to fund the deposit address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxData {
    pub chain_id: String,
    pub from: String,
    pub to: String,
    pub data: String,
    pub value: String,
    pub gas_limit: String,
}

impl TxData {
    /// Chain the transaction has to be sent on.
    pub fn chain_id(&self) -> Result<u64, FundKitError> {
        self.chain_id
            .parse()
            .map_err(|_| FundKitError::InvalidRequest(format!("chain id: {}", self.chain_id)))
    }
}

/// Deposit address generated for a [`DepositRequest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddressData {
    pub request_id: String,
    pub deposit_address: String,
    #[serde(default)]
    pub deposit_token_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_token_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_token_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_token_decimals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_token_usd_price: Option<f64>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub execution_time: String,
    #[serde(default)]
    pub gas_fee: String,
    #[serde(default, rename = "onChainID")]
    pub on_chain_id: String,
    #[serde(default)]
    pub status: String,
    pub tx_data: TxData,
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{U256, address, bytes};
    use serde_json::json;

    use super::*;

    const RECIPIENT: Address = address!("0x45c0470ef627a30efe30c06b13d883669b8fd3a8");
    const SENDER: Address = address!("0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2");

    #[test]
    fn test_wallet_payload() {
        let usdc = TokenRef::usdc_base();
        let request = DepositRequest::new(
            TransferSource::Wallet {
                from_token: usdc,
                from_amount: "0.0125".to_string(),
                from_address: SENDER,
            },
            usdc,
            "0.01",
            RECIPIENT,
        );

        let payload = request.to_payload().unwrap();
        assert_eq!(payload.transfer_type, TransferType::Wallet);
        assert_eq!(payload.destination_chain_id, "8453");
        assert_eq!(payload.to_amount, "10000");
        assert_eq!(payload.from_amount.as_deref(), Some("12500"));
        assert_eq!(payload.from_chain_id.as_deref(), Some("8453"));
        assert_eq!(payload.from_token_address, Some(usdc.address));
        assert_eq!(payload.from_address, Some(SENDER));
        assert_eq!(payload.provider, None);
        assert_eq!(payload.target_calldata, None);
    }

    #[test]
    fn test_onramp_payload_json() {
        let usdc = TokenRef::usdc_base();
        let calldata = bytes!("0x40c10f19");
        let payload = DepositRequest::new(
            TransferSource::OnRamp(ProviderType::Moonpay),
            usdc,
            "35",
            RECIPIENT,
        )
        .with_target_calldata(calldata.clone())
        .to_payload()
        .unwrap();

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["transferType"], json!("onramp"));
        assert_eq!(value["provider"], json!("moonpay"));
        assert_eq!(value["toAmount"], json!(U256::from(35_000_000).to_string()));
        assert_eq!(value["userOpHash"], json!(""));
        assert_eq!(value["targetCalldata"], json!("0x40c10f19"));
        assert!(value.get("fromAmount").is_none());
        assert!(value.get("fromAddress").is_none());
    }

    #[test]
    fn test_cex_payload_and_empty_calldata() {
        let payload = DepositRequest::new(
            TransferSource::Cex(ProviderType::MeshConnect),
            TokenRef::usdc_base(),
            "1",
            RECIPIENT,
        )
        .with_target_calldata(Bytes::new())
        .to_payload()
        .unwrap();

        assert_eq!(payload.transfer_type, TransferType::Cex);
        assert_eq!(payload.provider, Some(ProviderType::MeshConnect));
        assert_eq!(payload.target_calldata, None);
        assert_eq!(
            serde_json::to_value(ProviderType::MeshConnect).unwrap(),
            json!("mesh-connect")
        );
    }

    #[test]
    fn test_invalid_amount() {
        let request = DepositRequest::new(
            TransferSource::OnRamp(ProviderType::Kado),
            TokenRef::usdc_base(),
            "ten",
            RECIPIENT,
        );
        assert!(matches!(
            request.to_payload(),
            Err(FundKitError::InvalidAmount(a)) if a == "ten"
        ));

        let oversized = format!("2{}", "0".repeat(71));
        let request = DepositRequest::new(
            TransferSource::OnRamp(ProviderType::Kado),
            TokenRef::usdc_base(),
            oversized.clone(),
            RECIPIENT,
        );
        assert!(matches!(
            request.to_payload(),
            Err(FundKitError::InvalidAmount(a)) if a == oversized
        ));
    }

    #[test]
    fn test_deposit_address_data_json() {
        let data: DepositAddressData = serde_json::from_value(json!({
            "requestId": "req-42",
            "depositAddress": "0x1111111111111111111111111111111111111111",
            "depositTokenAddress": "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
            "depositTokenSymbol": "USDC",
            "amount": "10000",
            "executionTime": "30",
            "gasFee": "0.01",
            "onChainID": "8453",
            "status": "INITIALISED",
            "txData": {
                "chainId": "8453",
                "from": "0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2",
                "to": "0x1111111111111111111111111111111111111111",
                "data": "0x",
                "value": "0",
                "gasLimit": "100000"
            }
        }))
        .unwrap();

        assert_eq!(data.request_id, "req-42");
        assert_eq!(data.on_chain_id, "8453");
        assert_eq!(data.deposit_token_symbol.as_deref(), Some("USDC"));
        assert_eq!(data.tx_data.chain_id().unwrap(), 8453);
    }
}
