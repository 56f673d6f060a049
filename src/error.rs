use reqwest::StatusCode;

/// Marker the funding API puts into deposit-address errors when no
/// bridge/swap route exists for the requested amount.
pub(crate) const NO_ROUTE_MARKER: &str = "No Route Found";

/// Error returned by the funding API client or while preparing requests
/// for it.
#[derive(Debug, thiserror::Error)]
pub enum FundKitError {
    #[error("invalid API key")]
    InvalidApiKey,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("no route available, try increasing the amount")]
    NoRouteFound,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected empty API response")]
    NullResp,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("response decode error: {0}")]
    Decode(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

impl FundKitError {
    /// Classifies an error reported by the API, either through a non-success
    /// HTTP status or through the `error`/`message` fields of the envelope.
    pub(crate) fn from_api(status: StatusCode, message: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::InvalidApiKey
        } else if message.contains(NO_ROUTE_MARKER) {
            Self::NoRouteFound
        } else if status == StatusCode::BAD_REQUEST {
            Self::InvalidRequest(message)
        } else {
            Self::Api {
                status: status.as_u16(),
                message,
            }
        }
    }

    /// Whether the error originates from the transport rather than from
    /// the remote system's answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for FundKitError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else if let Some(status) = value.status() {
            Self::from_api(status, value.to_string())
        } else {
            Self::Transport(value.to_string())
        }
    }
}

impl From<serde_json::Error> for FundKitError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

impl From<url::ParseError> for FundKitError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidRequest(value.to_string())
    }
}
