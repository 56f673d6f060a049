//! Subcommand handlers.

use std::pin::pin;

use alloy::primitives::{Address, TxHash};
use fundkit_sdk::{
    client::FundKitClient,
    network::AlwaysOnline,
    poll::{self, PollConfig, PollFailure, PollRequest, PollStatus, StatusPoller},
    types::{DepositAddressData, OnRampOrder},
};
use futures::StreamExt;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    config::{Command, DepositArgs},
    error::{Error, Result},
};

pub async fn run(command: Command, client: FundKitClient, poll_config: PollConfig) -> Result<()> {
    match command {
        Command::Status {
            request_id,
            tx_hash,
        } => watch(client, poll_config, PollRequest::ready(request_id, tx_hash.to_string())).await,
        Command::Balances { address, chain_id } => balances(&client, address, chain_id).await,
        Command::DepositAddress(args) => {
            let deposit = deposit_address(&client, &args).await?;
            print_json(&deposit)
        }
        Command::OnrampUrl {
            deposit,
            fiat_amount,
            fiat_currency,
            network,
        } => {
            let data = deposit_address(&client, &deposit).await?;
            let fiat_amount = fiat_amount.unwrap_or_else(|| deposit.amount.clone());
            let order = OnRampOrder::for_deposit(&data, fiat_amount, fiat_currency, network);
            let url = client.generate_onramp_url(&order).await?;
            info!(request_id = %data.request_id, "On-ramp checkout ready");
            println!("{url}");
            Ok(())
        }
        Command::ReportTx {
            deposit_file,
            tx_hash,
            watch: keep_watching,
        } => {
            let deposit: DepositAddressData =
                serde_json::from_str(&std::fs::read_to_string(deposit_file)?)?;
            report_tx(&client, &deposit, tx_hash).await?;
            if keep_watching {
                let request = PollRequest::ready(deposit.request_id, tx_hash.to_string());
                watch(client, poll_config, request).await?;
            }
            Ok(())
        }
    }
}

async fn balances(client: &FundKitClient, address: Address, chain_id: Option<u64>) -> Result<()> {
    let mut balances = client.fetch_multichain_balances(address, None).await?;
    if let Some(chain_id) = chain_id {
        balances = balances.only_chain(chain_id);
    }
    if balances.is_empty() {
        warn!(%address, "No balances found");
    }
    for chain_id in balances.chain_ids() {
        for token in balances.chain(chain_id).into_iter().flat_map(|c| &c.balances) {
            let amount = token
                .amount()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "{chain_id}\t{}\t{}\t{amount}",
                token.symbol.as_deref().unwrap_or("-"),
                token.token_address,
            );
        }
    }
    Ok(())
}

async fn deposit_address(client: &FundKitClient, args: &DepositArgs) -> Result<DepositAddressData> {
    let request = args.to_request()?;
    let deposit = client.get_deposit_address(&request).await?;
    info!(
        request_id = %deposit.request_id,
        deposit_address = %deposit.deposit_address,
        amount = %deposit.amount,
        "Deposit address generated"
    );
    Ok(deposit)
}

async fn report_tx(client: &FundKitClient, deposit: &DepositAddressData, tx_hash: TxHash) -> Result<()> {
    client.post_execute_to_address(deposit, tx_hash).await?;
    info!(request_id = %deposit.request_id, %tx_hash, "Funding transaction reported");
    Ok(())
}

/// Tracks the request until it reaches a terminal outcome.
async fn watch(client: FundKitClient, poll_config: PollConfig, request: PollRequest) -> Result<()> {
    let mut poller = StatusPoller::new(client, AlwaysOnline, poll_config);
    let mut updates = pin!(poll::updates(poller.subscribe()));
    poller.track(&request);

    let mut last_message = None;
    while let Some(state) = updates.next().await {
        if state.display_message() != last_message {
            last_message = state.display_message();
            if let Some(message) = last_message {
                info!(request_id = ?request.request_id(), status = message, "Request status");
            }
        }
        match state.status() {
            PollStatus::Pending => continue,
            PollStatus::Success => {
                info!(request_id = ?request.request_id(), "Funding completed");
                return Ok(());
            }
            PollStatus::Error => {
                return Err(Error::PollFailed(
                    state.last_error().unwrap_or(PollFailure::Polling),
                ));
            }
        }
    }
    Err(Error::StreamClosed)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
