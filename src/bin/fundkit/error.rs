//! Error types for the funding CLI.

use fundkit_sdk::{error::FundKitError, poll::PollFailure};

use crate::config::ConfigError;

/// Main error type for the funding CLI.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment configuration error: {0}")]
    EnvConfig(#[from] envy::Error),

    #[error("Funding API error: {0}")]
    FundKit(#[from] FundKitError),

    #[error("Invalid deposit data: {0}")]
    DepositData(#[from] serde_json::Error),

    #[error("Failed to read deposit file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request did not complete: {0}")]
    PollFailed(PollFailure),

    #[error("Status stream closed unexpectedly")]
    StreamClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvConfig;

    #[test]
    fn test_missing_api_key_is_env_config_error() {
        let err: Error = envy::from_iter::<_, EnvConfig>(Vec::<(String, String)>::new())
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::EnvConfig(_)));
        assert!(
            err.to_string()
                .starts_with("Environment configuration error:"),
            "{err}"
        );
    }
}
