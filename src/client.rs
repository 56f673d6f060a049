//! HTTP client of the hosted funding API.
//!
//! All endpoints answer with a JSON envelope `{ "data": ..., "message": ... }`;
//! failures are reported either through the HTTP status, through a
//! `statusCode` field of the envelope, or through `data.error` with the
//! reason in `data.message`.

use std::{future::Future, sync::Arc, time::Duration};

use alloy::primitives::{Address, TxHash};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::FundKitError,
    types::{
        BalanceQuery, Balances, DepositAddressData, DepositRequest, OnRampOrder, RequestStatus,
    },
};

/// Default base URL of the hosted funding API.
pub const DEFAULT_API_URL: &str = "https://bridge-swap.aarc.xyz";

const API_KEY_HEADER: &str = "x-api-key";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const STATUS_PATH: &str = "request-status";
const BALANCES_PATH: &str = "multi-chain-balance";
const DEPOSIT_ADDRESS_PATH: &str = "deposit-address";
const POST_TX_PATH: &str = "post-tx-hash";
const ONRAMP_URL_PATH: &[&str] = &["onramp", "moonpay-url"];

/// Source of routing request statuses, polled by [`crate::poll::StatusPoller`].
pub trait StatusSource: Send + Sync + 'static {
    fn get_request_status(
        &self,
        request_id: &str,
    ) -> impl Future<Output = Result<RequestStatus, FundKitError>> + Send;
}

/// Client of the hosted funding API.
#[derive(Clone, derive_more::Debug)]
pub struct FundKitClient {
    http: Client,
    base_url: Url,
    #[debug("<redacted>")]
    api_key: String,
}

impl FundKitClient {
    /// Creates a client of the default hosted endpoint.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FundKitError> {
        Self::with_base_url(api_key, Url::parse(DEFAULT_API_URL)?)
    }

    /// Creates a client of the API served at `base_url`.
    pub fn with_base_url(api_key: impl Into<String>, base_url: Url) -> Result<Self, FundKitError> {
        if base_url.cannot_be_a_base() {
            return Err(FundKitError::InvalidRequest(format!(
                "not a base URL: {base_url}"
            )));
        }
        let http = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FundKitError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Current status of the routing request.
    pub async fn get_request_status(&self, request_id: &str) -> Result<RequestStatus, FundKitError> {
        let url = self.endpoint(&[STATUS_PATH, request_id])?;
        debug!(request_id, "Fetching request status");
        let body = self.send(self.http.get(url)).await?;
        data(body)
    }

    /// Token balances of `address` across all supported chains.
    pub async fn fetch_multichain_balances(
        &self,
        address: Address,
        query: Option<&BalanceQuery>,
    ) -> Result<Balances, FundKitError> {
        let url = self.endpoint(&[BALANCES_PATH])?;
        let mut params = vec![("address", address.to_string())];
        if let Some(q) = query {
            params.push(("tokenAddress", q.token_address.to_string()));
            params.push(("tokenChainId", q.token_chain_id.to_string()));
            params.push(("tokenAmount", q.token_amount.clone()));
        }
        debug!(%address, "Fetching multi-chain balances");
        let body = self.send(self.http.get(url).query(&params)).await?;
        data(body)
    }

    /// Generates a deposit address and the funding transaction for the
    /// request.
    pub async fn get_deposit_address(
        &self,
        request: &DepositRequest,
    ) -> Result<DepositAddressData, FundKitError> {
        let payload = request.to_payload()?;
        let url = self.endpoint(&[DEPOSIT_ADDRESS_PATH])?;
        debug!(?payload, "Requesting deposit address");
        let body = self.send(self.http.post(url).json(&payload)).await?;
        data(body)
    }

    /// Notifies the funding API that the funding transaction of `deposit`
    /// was submitted as `tx_hash`.
    pub async fn post_execute_to_address(
        &self,
        deposit: &DepositAddressData,
        tx_hash: TxHash,
    ) -> Result<(), FundKitError> {
        let url = self.endpoint(&[POST_TX_PATH])?;
        debug!(request_id = %deposit.request_id, %tx_hash, "Reporting submitted transaction");
        self.send(self.http.post(url).json(&json!({
            "depositData": deposit,
            "trxHash": tx_hash,
        })))
        .await?;
        Ok(())
    }

    /// Checkout URL of an on-ramp purchase.
    pub async fn generate_onramp_url(&self, order: &OnRampOrder) -> Result<Url, FundKitError> {
        let url = self.endpoint(ONRAMP_URL_PATH)?;
        debug!(wallet_address = %order.wallet_address, "Generating on-ramp URL");
        let body = self.send(self.http.post(url).json(order)).await?;
        let raw = match envelope_data(&body)? {
            Value::String(s) => s.clone(),
            other => other
                .get("url")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or(FundKitError::NullResp)?,
        };
        Ok(Url::parse(&raw)?)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FundKitError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FundKitError::InvalidRequest(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and returns the envelope once it is known not to
    /// carry an error.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, FundKitError> {
        let response = request.header(API_KEY_HEADER, &self.api_key).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        check_envelope(status, body)
    }
}

impl StatusSource for FundKitClient {
    async fn get_request_status(&self, request_id: &str) -> Result<RequestStatus, FundKitError> {
        FundKitClient::get_request_status(self, request_id).await
    }
}

impl<T: StatusSource> StatusSource for Arc<T> {
    fn get_request_status(
        &self,
        request_id: &str,
    ) -> impl Future<Output = Result<RequestStatus, FundKitError>> + Send {
        (**self).get_request_status(request_id)
    }
}

fn check_envelope(status: StatusCode, body: Value) -> Result<Value, FundKitError> {
    let reported = body
        .get("statusCode")
        .and_then(Value::as_u64)
        .and_then(|c| u16::try_from(c).ok())
        .and_then(|c| StatusCode::from_u16(c).ok())
        .unwrap_or(status);
    let status = if status.is_success() { reported } else { status };
    if !status.is_success() {
        let message = message_of(&body);
        warn!(%status, %message, "Funding API returned an error");
        return Err(FundKitError::from_api(status, message));
    }
    if let Some(data) = body.get("data").filter(|d| is_truthy(d.get("error"))) {
        let message = message_of(data);
        warn!(%message, "Funding API rejected the request");
        return Err(FundKitError::from_api(StatusCode::BAD_REQUEST, message));
    }
    Ok(body)
}

fn envelope_data(body: &Value) -> Result<&Value, FundKitError> {
    body.get("data")
        .filter(|d| !d.is_null())
        .ok_or(FundKitError::NullResp)
}

fn data<T: DeserializeOwned>(body: Value) -> Result<T, FundKitError> {
    Ok(T::deserialize(envelope_data(&body)?)?)
}

fn message_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_escapes_request_id() {
        let client = FundKitClient::with_base_url(
            "key",
            Url::parse("https://api.example.com/v1/").unwrap(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(&[STATUS_PATH, "a/b c"]).unwrap().as_str(),
            "https://api.example.com/v1/request-status/a%2Fb%20c"
        );
        assert_eq!(
            client.endpoint(ONRAMP_URL_PATH).unwrap().as_str(),
            "https://api.example.com/v1/onramp/moonpay-url"
        );
    }

    #[test]
    fn test_api_key_is_redacted() {
        let client = FundKitClient::new("super-secret").unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_check_envelope() {
        let ok = check_envelope(StatusCode::OK, json!({"data": {"status": "SWAP_PENDING"}}));
        assert!(ok.is_ok());

        assert!(matches!(
            check_envelope(StatusCode::OK, json!({"statusCode": 401, "message": "bad key"})),
            Err(FundKitError::InvalidApiKey)
        ));
        assert!(matches!(
            check_envelope(
                StatusCode::OK,
                json!({"data": {"error": true, "message": "No Route Found"}})
            ),
            Err(FundKitError::NoRouteFound)
        ));
        assert!(matches!(
            check_envelope(StatusCode::BAD_GATEWAY, Value::String("upstream down".into())),
            Err(FundKitError::Api { status: 502, message }) if message == "upstream down"
        ));
        assert!(matches!(
            data::<RequestStatus>(json!({"data": null})),
            Err(FundKitError::NullResp)
        ));
    }
}
