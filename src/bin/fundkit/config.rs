//! Configuration for the funding CLI.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): API credentials, endpoint, poll timing
//! - CLI arguments: the operation to run and its parameters

use std::{path::PathBuf, time::Duration};

use alloy::primitives::{Address, TxHash};
use clap::{Args, Parser, Subcommand, ValueEnum};
use fundkit_sdk::{
    checkout,
    client::DEFAULT_API_URL,
    num::Converter,
    poll::PollConfig,
    types::{DepositRequest, ProviderType, TokenRef, TransferSource},
};
use url::Url;

/// Environment configuration (credentials, endpoint, poll timing).
#[derive(derive_more::Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// API key of the funding API
    #[debug("<redacted>")]
    pub api_key: String,

    /// Base URL of the funding API (default: hosted endpoint)
    pub api_base_url: Option<String>,

    /// Delay between status checks in milliseconds (default: 5000)
    pub poll_interval_ms: Option<u64>,

    /// Overall polling budget in milliseconds (default: 480000)
    pub max_polling_duration_ms: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let raw = self.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL);
        Ok(Url::parse(raw)?)
    }

    pub fn poll_config(&self) -> Result<PollConfig, ConfigError> {
        let mut config = PollConfig::default();
        if let Some(ms) = self.poll_interval_ms {
            if ms == 0 {
                return Err(ConfigError::ZeroDuration("POLL_INTERVAL_MS"));
            }
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = self.max_polling_duration_ms {
            if ms == 0 {
                return Err(ConfigError::ZeroDuration("MAX_POLLING_DURATION_MS"));
            }
            config = config.with_max_polling_duration(Duration::from_millis(ms));
        }
        Ok(config)
    }
}

#[derive(Debug, Parser)]
#[command(name = "fundkit")]
#[command(about = "Cross-chain funding client: balances, deposit addresses and request tracking")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Track a routing request until it completes, fails or times out
    Status {
        /// Routing request ID returned with the deposit address
        #[arg(long)]
        request_id: String,

        /// Hash of the submitted funding transaction
        #[arg(long)]
        tx_hash: TxHash,
    },

    /// Show token balances of an address across chains
    Balances {
        #[arg(long)]
        address: Address,

        /// Only show balances on this chain
        #[arg(long)]
        chain_id: Option<u64>,
    },

    /// Generate a deposit address routing funds into the destination token
    DepositAddress(DepositArgs),

    /// Generate a deposit address and an on-ramp checkout URL funding it
    OnrampUrl {
        #[command(flatten)]
        deposit: DepositArgs,

        /// Fiat amount to spend (defaults to the destination amount)
        #[arg(long)]
        fiat_amount: Option<String>,

        #[arg(long, default_value = "USD")]
        fiat_currency: String,

        /// Network code of the deposit address, as known to the on-ramp
        #[arg(long, default_value = "BASE")]
        network: String,
    },

    /// Report a submitted funding transaction and optionally track the request
    ReportTx {
        /// JSON file with the output of `deposit-address`
        #[arg(long)]
        deposit_file: PathBuf,

        #[arg(long)]
        tx_hash: TxHash,

        /// Keep polling the request status after reporting
        #[arg(long)]
        watch: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    Wallet,
    Onramp,
    Cex,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    Moonpay,
    Kado,
    MeshConnect,
}

impl From<ProviderArg> for ProviderType {
    fn from(value: ProviderArg) -> Self {
        match value {
            ProviderArg::Moonpay => ProviderType::Moonpay,
            ProviderArg::Kado => ProviderType::Kado,
            ProviderArg::MeshConnect => ProviderType::MeshConnect,
        }
    }
}

/// Parameters of a deposit address request.
#[derive(Clone, Debug, Args)]
pub struct DepositArgs {
    /// Where the funds come from
    #[arg(long, value_enum, default_value_t = SourceKind::Wallet)]
    pub source: SourceKind,

    /// On-ramp or exchange provider (defaults: moonpay for onramp, mesh-connect for cex)
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Chain of the source token (wallet transfers)
    #[arg(long)]
    pub from_chain_id: Option<u64>,

    /// Source token address (wallet transfers)
    #[arg(long)]
    pub from_token: Option<Address>,

    #[arg(long, default_value_t = 6)]
    pub from_decimals: u8,

    /// Decimal amount of the source token (wallet transfers)
    #[arg(long)]
    pub from_amount: Option<String>,

    /// Address sending the funds (wallet transfers)
    #[arg(long)]
    pub from_address: Option<Address>,

    /// Decimal amount of the destination token to receive
    #[arg(long)]
    pub amount: String,

    /// Address receiving the routed funds
    #[arg(long)]
    pub recipient: Address,

    /// Destination chain (default: Base)
    #[arg(long)]
    pub dest_chain_id: Option<u64>,

    /// Destination token (default: USDC on Base)
    #[arg(long)]
    pub dest_token: Option<Address>,

    #[arg(long)]
    pub dest_decimals: Option<u8>,

    /// Contract that mints to the recipient with the routed funds
    #[arg(long)]
    pub checkout_contract: Option<Address>,
}

impl DepositArgs {
    pub fn destination(&self) -> TokenRef {
        let usdc = TokenRef::usdc_base();
        TokenRef::new(
            self.dest_chain_id.unwrap_or(usdc.chain_id),
            self.dest_token.unwrap_or(usdc.address),
            self.dest_decimals.unwrap_or(usdc.decimals),
        )
    }

    pub fn to_request(&self) -> Result<DepositRequest, ConfigError> {
        let source = match self.source {
            SourceKind::Wallet => TransferSource::Wallet {
                from_token: TokenRef::new(
                    self.from_chain_id
                        .ok_or(ConfigError::MissingArgument("--from-chain-id"))?,
                    self.from_token
                        .ok_or(ConfigError::MissingArgument("--from-token"))?,
                    self.from_decimals,
                ),
                from_amount: self
                    .from_amount
                    .clone()
                    .ok_or(ConfigError::MissingArgument("--from-amount"))?,
                from_address: self
                    .from_address
                    .ok_or(ConfigError::MissingArgument("--from-address"))?,
            },
            SourceKind::Onramp => {
                TransferSource::OnRamp(self.provider.unwrap_or(ProviderArg::Moonpay).into())
            }
            SourceKind::Cex => {
                TransferSource::Cex(self.provider.unwrap_or(ProviderArg::MeshConnect).into())
            }
        };

        let destination = self.destination();
        let Some(contract) = self.checkout_contract else {
            return Ok(DepositRequest::new(
                source,
                destination,
                self.amount.clone(),
                self.recipient,
            ));
        };

        let amount = Converter::new(destination.decimals)
            .to_base_units(&self.amount)
            .map_err(|_| ConfigError::InvalidAmount(self.amount.clone()))?;
        let calldata = checkout::mint_calldata(destination.address, self.recipient, amount);
        Ok(
            DepositRequest::new(source, destination, self.amount.clone(), contract)
                .with_target_calldata(calldata),
        )
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required argument {0}")]
    MissingArgument(&'static str),

    #[error("Invalid amount {0}")]
    InvalidAmount(String),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use fundkit_sdk::types::TransferType;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> Result<EnvConfig, envy::Error> {
        envy::from_iter(
            vars.iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    fn cli(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("fundkit").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_env_config_defaults() {
        let config = env(&[("API_KEY", "secret")]).unwrap();
        assert_eq!(config.base_url().unwrap().as_str(), "https://bridge-swap.aarc.xyz/");
        assert_eq!(config.poll_config().unwrap(), PollConfig::default());
        assert!(!format!("{config:?}").contains("secret"));
    }

    #[test]
    fn test_env_config_overrides() {
        let config = env(&[
            ("API_KEY", "secret"),
            ("API_BASE_URL", "http://localhost:8080/v2/"),
            ("POLL_INTERVAL_MS", "250"),
            ("MAX_POLLING_DURATION_MS", "10000"),
        ])
        .unwrap();
        let poll = config.poll_config().unwrap();
        assert_eq!(poll.poll_interval, Duration::from_millis(250));
        assert_eq!(poll.max_polling_duration, Duration::from_secs(10));
        assert_eq!(config.base_url().unwrap().path(), "/v2/");
    }

    #[test]
    fn test_env_config_rejects_invalid_values() {
        assert!(env(&[]).is_err());

        let config = env(&[("API_KEY", "k"), ("POLL_INTERVAL_MS", "0")]).unwrap();
        assert!(matches!(
            config.poll_config(),
            Err(ConfigError::ZeroDuration("POLL_INTERVAL_MS"))
        ));

        let config = env(&[("API_KEY", "k"), ("API_BASE_URL", "not a url")]).unwrap();
        assert!(matches!(config.base_url(), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_wallet_deposit_args() {
        let Command::DepositAddress(args) = cli(&[
            "deposit-address",
            "--from-chain-id",
            "42161",
            "--from-token",
            "0xaf88d065e77c8cc2239327c5edb3a432268e5831",
            "--from-amount",
            "10.5",
            "--from-address",
            "0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2",
            "--amount",
            "10",
            "--recipient",
            "0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2",
        ])
        .command
        else {
            panic!("expected deposit-address command");
        };

        let payload = args.to_request().unwrap().to_payload().unwrap();
        assert_eq!(payload.transfer_type, TransferType::Wallet);
        assert_eq!(payload.destination_chain_id, "8453");
        assert_eq!(payload.to_amount, "10000000");
        assert_eq!(payload.from_amount.as_deref(), Some("10500000"));
        assert_eq!(payload.target_calldata, None);
    }

    #[test]
    fn test_wallet_deposit_requires_source_token() {
        let Command::DepositAddress(args) = cli(&[
            "deposit-address",
            "--amount",
            "10",
            "--recipient",
            "0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2",
        ])
        .command
        else {
            panic!("expected deposit-address command");
        };
        assert!(matches!(
            args.to_request(),
            Err(ConfigError::MissingArgument("--from-chain-id"))
        ));
    }

    #[test]
    fn test_checkout_deposit_args() {
        let contract = address!("0x1111111111111111111111111111111111111111");
        let Command::OnrampUrl { deposit, .. } = cli(&[
            "onramp-url",
            "--source",
            "onramp",
            "--amount",
            "25",
            "--recipient",
            "0xeDa8Dec60B6C2055B61939dDA41E9173Bab372b2",
            "--checkout-contract",
            "0x1111111111111111111111111111111111111111",
        ])
        .command
        else {
            panic!("expected onramp-url command");
        };

        let payload = deposit.to_request().unwrap().to_payload().unwrap();
        assert_eq!(payload.transfer_type, TransferType::OnRamp);
        assert_eq!(payload.provider, Some(ProviderType::Moonpay));
        assert_eq!(payload.destination_recipient, contract);
        assert!(payload.target_calldata.is_some());
    }
}
