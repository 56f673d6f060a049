use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Wire marker shared by every stage-specific failure code
/// (`DEPOSIT_FAILED`, `SWAP_FAILED`, ...).
const FAILURE_MARKER: &str = "FAILED";

/// Status of a routing request as reported by the funding API.
///
/// The request moves through deposit, route selection, swap/bridge and
/// forwarding stages, with refund and expiry branches on failure. Codes the
/// crate does not know are kept verbatim in [`RoutingRequestStatus::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoutingRequestStatus {
    Initialised,
    DepositPending,
    DepositFailed,
    DepositCompleted,
    CreateAndForwardInitiated,
    CreateAndForwardPending,
    CreateAndForwardFailed,
    CreateAndForwardCompleted,
    NoRouteFound,
    SwapInitiated,
    SwapPending,
    SwapFailed,
    SwapCompleted,
    BridgeInitiated,
    BridgePending,
    BridgeFailed,
    BridgeCompleted,
    CheckoutPending,
    CheckoutFailed,
    CheckoutCompleted,
    ForwardFundInitiated,
    ForwardFundPending,
    ForwardFundFailed,
    ForwardFundCompleted,
    RefundInitiated,
    RefundPending,
    RefundFailed,
    RefundCompleted,
    Expired,
    Completed,
    Failed,
    Cancelled,
    Other(String),
}

/// Result of classifying a [`RoutingRequestStatus`] for polling purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusClass {
    /// Request is still in flight; carries the display message.
    NonTerminal(&'static str),
    TerminalSuccess,
    /// Request failed, was cancelled or expired; carries the display message.
    TerminalFailure(&'static str),
}

impl RoutingRequestStatus {
    /// Wire representation of the status code.
    pub fn as_str(&self) -> &str {
        use RoutingRequestStatus::*;
        match self {
            Initialised => "INITIALISED",
            DepositPending => "DEPOSIT_PENDING",
            DepositFailed => "DEPOSIT_FAILED",
            DepositCompleted => "DEPOSIT_COMPLETED",
            CreateAndForwardInitiated => "CREATE_AND_FORWARD_INITIATED",
            CreateAndForwardPending => "CREATE_AND_FORWARD_PENDING",
            CreateAndForwardFailed => "CREATE_AND_FORWARD_FAILED",
            CreateAndForwardCompleted => "CREATE_AND_FORWARD_COMPLETED",
            NoRouteFound => "NO_ROUTE_FOUND",
            SwapInitiated => "SWAP_INITIATED",
            SwapPending => "SWAP_PENDING",
            SwapFailed => "SWAP_FAILED",
            SwapCompleted => "SWAP_COMPLETED",
            BridgeInitiated => "BRIDGE_INITIATED",
            BridgePending => "BRIDGE_PENDING",
            BridgeFailed => "BRIDGE_FAILED",
            BridgeCompleted => "BRIDGE_COMPLETED",
            CheckoutPending => "CHECKOUT_PENDING",
            CheckoutFailed => "CHECKOUT_FAILED",
            CheckoutCompleted => "CHECKOUT_COMPLETED",
            ForwardFundInitiated => "FORWARD_FUND_INITIATED",
            ForwardFundPending => "FORWARD_FUND_PENDING",
            ForwardFundFailed => "FORWARD_FUND_FAILED",
            ForwardFundCompleted => "FORWARD_FUND_COMPLETED",
            RefundInitiated => "REFUND_INITIATED",
            RefundPending => "REFUND_PENDING",
            RefundFailed => "REFUND_FAILED",
            RefundCompleted => "REFUND_COMPLETED",
            Expired => "EXPIRED",
            Completed => "COMPLETED",
            Failed => "FAILED",
            Cancelled => "CANCELLED",
            Other(code) => code,
        }
    }

    /// Human readable description of the status, suitable for display.
    pub fn message(&self) -> &'static str {
        use RoutingRequestStatus::*;
        match self {
            Initialised => "Request has been created and is awaiting processing.",
            DepositPending => "Your deposit is being processed.",
            DepositFailed => "Deposit was unsuccessful. Please try again.",
            DepositCompleted => "Funds received by Aarc successfully.",
            CreateAndForwardInitiated | CreateAndForwardPending => {
                "Creating and forwarding your request."
            }
            CreateAndForwardFailed => "Failed to create and forward request. Please retry.",
            CreateAndForwardCompleted => "Request has been successfully created and forwarded.",
            NoRouteFound => "No available route found for your request.",
            SwapInitiated => "Swap process has started.",
            SwapPending => "Swap is in progress.",
            SwapFailed => "Swap failed. Please attempt the swap again.",
            SwapCompleted => "Swap completed successfully.",
            BridgeInitiated => "Bridging process has been initiated.",
            BridgePending => "Bridging is in progress.",
            BridgeFailed => "Bridging failed. Please try again.",
            BridgeCompleted => "Bridging completed successfully.",
            CheckoutPending => "Checkout is in progress.",
            CheckoutFailed => "Checkout failed. Please review and retry.",
            CheckoutCompleted => "Checkout completed successfully.",
            ForwardFundInitiated => "Forwarding funds.",
            ForwardFundPending => "Forwarding funds is in progress.",
            ForwardFundFailed => "Failed to forward funds. Please try again.",
            ForwardFundCompleted => "Funds have been forwarded successfully.",
            RefundInitiated => "Refund process has been initiated.",
            RefundPending => "Refund is being processed.",
            RefundFailed => "Refund failed. Please contact support.",
            RefundCompleted => "Refund completed successfully.",
            Expired => "Request has expired.",
            Completed | Failed | Cancelled | Other(_) => "Request is being processed.",
        }
    }

    /// Classifies the status into in-flight, succeeded or failed.
    ///
    /// Besides the explicit failure codes, any code whose name contains
    /// `FAILED` is a terminal failure, including codes unknown to this crate.
    pub fn classify(&self) -> StatusClass {
        use RoutingRequestStatus::*;
        match self {
            Completed | CheckoutCompleted | ForwardFundCompleted | BridgeCompleted => {
                StatusClass::TerminalSuccess
            }
            Failed | Cancelled | Expired => StatusClass::TerminalFailure(self.message()),
            _ if self.as_str().contains(FAILURE_MARKER) => {
                StatusClass::TerminalFailure(self.message())
            }
            _ => StatusClass::NonTerminal(self.message()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self.classify(), StatusClass::NonTerminal(_))
    }
}

impl FromStr for RoutingRequestStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use RoutingRequestStatus::*;
        Ok(match s {
            "INITIALISED" => Initialised,
            "DEPOSIT_PENDING" => DepositPending,
            "DEPOSIT_FAILED" => DepositFailed,
            "DEPOSIT_COMPLETED" => DepositCompleted,
            "CREATE_AND_FORWARD_INITIATED" => CreateAndForwardInitiated,
            "CREATE_AND_FORWARD_PENDING" => CreateAndForwardPending,
            "CREATE_AND_FORWARD_FAILED" => CreateAndForwardFailed,
            "CREATE_AND_FORWARD_COMPLETED" => CreateAndForwardCompleted,
            "NO_ROUTE_FOUND" => NoRouteFound,
            "SWAP_INITIATED" => SwapInitiated,
            "SWAP_PENDING" => SwapPending,
            "SWAP_FAILED" => SwapFailed,
            "SWAP_COMPLETED" => SwapCompleted,
            "BRIDGE_INITIATED" => BridgeInitiated,
            "BRIDGE_PENDING" => BridgePending,
            "BRIDGE_FAILED" => BridgeFailed,
            "BRIDGE_COMPLETED" => BridgeCompleted,
            "CHECKOUT_PENDING" => CheckoutPending,
            "CHECKOUT_FAILED" => CheckoutFailed,
            "CHECKOUT_COMPLETED" => CheckoutCompleted,
            "FORWARD_FUND_INITIATED" => ForwardFundInitiated,
            "FORWARD_FUND_PENDING" => ForwardFundPending,
            "FORWARD_FUND_FAILED" => ForwardFundFailed,
            "FORWARD_FUND_COMPLETED" => ForwardFundCompleted,
            "REFUND_INITIATED" => RefundInitiated,
            "REFUND_PENDING" => RefundPending,
            "REFUND_FAILED" => RefundFailed,
            "REFUND_COMPLETED" => RefundCompleted,
            "EXPIRED" => Expired,
            "COMPLETED" => Completed,
            "FAILED" => Failed,
            "CANCELLED" => Cancelled,
            other => Other(other.to_string()),
        })
    }
}

impl From<String> for RoutingRequestStatus {
    fn from(value: String) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<&str> for RoutingRequestStatus {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<RoutingRequestStatus> for String {
    fn from(value: RoutingRequestStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RoutingRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status lookup result for a single routing request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatus {
    pub status: RoutingRequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl RequestStatus {
    pub fn new(status: RoutingRequestStatus) -> Self {
        Self {
            status,
            request_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use RoutingRequestStatus::*;

    const PENDING: [RoutingRequestStatus; 18] = [
        Initialised,
        DepositPending,
        DepositCompleted,
        CreateAndForwardInitiated,
        CreateAndForwardPending,
        CreateAndForwardCompleted,
        NoRouteFound,
        SwapInitiated,
        SwapPending,
        SwapCompleted,
        BridgeInitiated,
        BridgePending,
        CheckoutPending,
        ForwardFundInitiated,
        ForwardFundPending,
        RefundInitiated,
        RefundPending,
        RefundCompleted,
    ];

    #[test]
    fn test_classify_non_terminal() {
        for status in PENDING {
            assert_eq!(
                status.classify(),
                StatusClass::NonTerminal(status.message()),
                "{status}"
            );
            assert!(!status.is_terminal());
        }
        assert_eq!(
            Other("ROUTE_SELECTED".to_string()).classify(),
            StatusClass::NonTerminal("Request is being processed.")
        );
    }

    #[test]
    fn test_classify_success() {
        for status in [Completed, CheckoutCompleted, ForwardFundCompleted, BridgeCompleted] {
            assert_eq!(status.classify(), StatusClass::TerminalSuccess, "{status}");
        }
    }

    #[test]
    fn test_classify_failure() {
        for status in [
            DepositFailed,
            CreateAndForwardFailed,
            SwapFailed,
            BridgeFailed,
            CheckoutFailed,
            ForwardFundFailed,
            RefundFailed,
            Expired,
            Failed,
            Cancelled,
        ] {
            assert!(
                matches!(status.classify(), StatusClass::TerminalFailure(_)),
                "{status}"
            );
        }
        assert!(matches!(
            Other("SETTLEMENT_FAILED".to_string()).classify(),
            StatusClass::TerminalFailure(_)
        ));
    }

    #[test]
    fn test_wire_codes_parse_back() {
        for status in PENDING {
            assert_eq!(status.as_str().parse::<RoutingRequestStatus>(), Ok(status));
        }
        assert_eq!(
            "SOMETHING_NEW".parse::<RoutingRequestStatus>(),
            Ok(Other("SOMETHING_NEW".to_string()))
        );
    }

    #[test]
    fn test_display_messages() {
        let table = [
            ("INITIALISED", "Request has been created and is awaiting processing."),
            ("DEPOSIT_PENDING", "Your deposit is being processed."),
            ("DEPOSIT_FAILED", "Deposit was unsuccessful. Please try again."),
            ("DEPOSIT_COMPLETED", "Funds received by Aarc successfully."),
            ("CREATE_AND_FORWARD_INITIATED", "Creating and forwarding your request."),
            ("CREATE_AND_FORWARD_PENDING", "Creating and forwarding your request."),
            ("CREATE_AND_FORWARD_FAILED", "Failed to create and forward request. Please retry."),
            ("CREATE_AND_FORWARD_COMPLETED", "Request has been successfully created and forwarded."),
            ("NO_ROUTE_FOUND", "No available route found for your request."),
            ("SWAP_INITIATED", "Swap process has started."),
            ("SWAP_PENDING", "Swap is in progress."),
            ("SWAP_FAILED", "Swap failed. Please attempt the swap again."),
            ("SWAP_COMPLETED", "Swap completed successfully."),
            ("BRIDGE_INITIATED", "Bridging process has been initiated."),
            ("BRIDGE_PENDING", "Bridging is in progress."),
            ("BRIDGE_FAILED", "Bridging failed. Please try again."),
            ("BRIDGE_COMPLETED", "Bridging completed successfully."),
            ("CHECKOUT_PENDING", "Checkout is in progress."),
            ("CHECKOUT_FAILED", "Checkout failed. Please review and retry."),
            ("CHECKOUT_COMPLETED", "Checkout completed successfully."),
            ("FORWARD_FUND_INITIATED", "Forwarding funds."),
            ("FORWARD_FUND_PENDING", "Forwarding funds is in progress."),
            ("FORWARD_FUND_FAILED", "Failed to forward funds. Please try again."),
            ("FORWARD_FUND_COMPLETED", "Funds have been forwarded successfully."),
            ("REFUND_INITIATED", "Refund process has been initiated."),
            ("REFUND_PENDING", "Refund is being processed."),
            ("REFUND_FAILED", "Refund failed. Please contact support."),
            ("REFUND_COMPLETED", "Refund completed successfully."),
            ("EXPIRED", "Request has expired."),
            ("COMPLETED", "Request is being processed."),
            ("FAILED", "Request is being processed."),
            ("CANCELLED", "Request is being processed."),
            ("ROUTE_SELECTED", "Request is being processed."),
        ];
        for (code, message) in table {
            let status = RoutingRequestStatus::from(code);
            assert_eq!(status.as_str(), code);
            assert_eq!(status.message(), message, "{code}");
        }
    }

    #[test]
    fn test_request_status_json() {
        let status: RequestStatus =
            serde_json::from_str(r#"{"status":"BRIDGE_PENDING","requestId":"req-1"}"#).unwrap();
        assert_eq!(status.status, BridgePending);
        assert_eq!(status.request_id.as_deref(), Some("req-1"));

        let status: RequestStatus = serde_json::from_str(r#"{"status":"WAITING"}"#).unwrap();
        assert_eq!(status.status, Other("WAITING".to_string()));
    }
}
