//! Cross-chain funding SDK.
//!
//! # Overview
//!
//! Client of a hosted funding API that routes user funds (from a wallet on
//! another chain, a fiat on-ramp or an exchange account) into a destination
//! token, plus a poller tracking the resulting routing request until it
//! completes.
//!
//! Use [`client::FundKitClient`] to look up balances, generate a deposit
//! address for a [`types::DepositRequest`] and report the submitted funding
//! transaction, then [`poll::StatusPoller`] to follow the routing request
//! through its deposit, swap, bridge and forwarding stages.
//!
//! See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Status is obtained by polling only; the API offers no push channel.
//!
//! * Wallet signing and transaction submission are left to the caller;
//!   [`types::TxData`] carries everything needed to build the transaction.
//!
//! # Testing
//!
//! [`testing`] module provides a scripted status source and, together with
//! [`network::NetworkMonitor`], allows driving the poller deterministically
//! with a paused Tokio clock.

pub mod checkout;
pub mod client;
pub mod error;
pub mod network;
pub mod num;
pub mod poll;
pub mod testing;
pub mod types;
