//! Test utilities.
//!
//! [`ScriptedStatusSource`] stands in for the funding API when driving a
//! [`crate::poll::StatusPoller`]: every request ID replays its own script of
//! statuses and errors, one entry per status check, repeating the last entry
//! once the script is exhausted. Combined with
//! [`crate::network::NetworkMonitor`] and a paused Tokio clock it makes the
//! poller fully deterministic.
//!

use std::{collections::VecDeque, time::Duration};

use dashmap::DashMap;

use crate::{
    client::StatusSource,
    error::FundKitError,
    types::{RequestId, RequestStatus, RoutingRequestStatus},
};

/// One scripted answer of [`ScriptedStatusSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scripted {
    Status(RoutingRequestStatus),
    TransportError,
    ApiError(u16, String),
}

impl Scripted {
    /// Status answer parsed from its wire code.
    pub fn status(code: &str) -> Self {
        Self::Status(code.into())
    }
}

#[derive(Debug, Default)]
pub struct ScriptedStatusSource {
    scripts: DashMap<RequestId, VecDeque<Scripted>>,
    calls: DashMap<RequestId, usize>,
    latency: Option<Duration>,
}

impl ScriptedStatusSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Appends answers to the script of `request_id`.
    pub fn with_script(
        self,
        request_id: &str,
        answers: impl IntoIterator<Item = Scripted>,
    ) -> Self {
        self.push(request_id, answers);
        self
    }

    /// Appends status answers given by their wire codes.
    pub fn with_statuses(self, request_id: &str, codes: &[&str]) -> Self {
        self.with_script(request_id, codes.iter().map(|c| Scripted::status(c)))
    }

    pub fn push(&self, request_id: &str, answers: impl IntoIterator<Item = Scripted>) {
        self.scripts
            .entry(request_id.to_string())
            .or_default()
            .extend(answers);
    }

    /// Number of status checks made for `request_id`.
    pub fn calls(&self, request_id: &str) -> usize {
        self.calls.get(request_id).map(|c| *c).unwrap_or_default()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| *c.value()).sum()
    }

    fn next_answer(&self, request_id: &str) -> Option<Scripted> {
        *self.calls.entry(request_id.to_string()).or_default() += 1;
        let mut script = self.scripts.get_mut(request_id)?;
        if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        }
    }
}

impl StatusSource for ScriptedStatusSource {
    async fn get_request_status(&self, request_id: &str) -> Result<RequestStatus, FundKitError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.next_answer(request_id) {
            Some(Scripted::Status(status)) => Ok(RequestStatus {
                status,
                request_id: Some(request_id.to_string()),
            }),
            Some(Scripted::TransportError) => {
                Err(FundKitError::Transport("connection reset".to_string()))
            }
            Some(Scripted::ApiError(status, message)) => Err(FundKitError::Api { status, message }),
            None => Err(FundKitError::Api {
                status: 404,
                message: format!("request {request_id} not found"),
            }),
        }
    }
}
