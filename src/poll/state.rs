//! Poll configuration and observable state.

use std::time::Duration;

use crate::types::RequestId;

/// Default delay between consecutive status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Default wall-clock budget of a single polling session.
pub const DEFAULT_MAX_POLLING_DURATION: Duration = Duration::from_millis(480_000);

/// Timing of a polling session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub poll_interval: Duration,
    pub max_polling_duration: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polling_duration: DEFAULT_MAX_POLLING_DURATION,
        }
    }
}

impl PollConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_max_polling_duration(mut self, max_polling_duration: Duration) -> Self {
        self.max_polling_duration = max_polling_duration;
        self
    }
}

/// Identifies the routing request to track.
///
/// Polling starts only once both the request ID and the correlation token
/// (the hash of the submitted funding transaction) are known.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollRequest {
    request_id: Option<RequestId>,
    correlation_token: Option<String>,
}

impl PollRequest {
    pub fn new(request_id: Option<RequestId>, correlation_token: Option<String>) -> Self {
        Self {
            request_id: request_id.filter(|s| !s.is_empty()),
            correlation_token: correlation_token.filter(|s| !s.is_empty()),
        }
    }

    /// Request with both identifiers known.
    pub fn ready(request_id: impl Into<RequestId>, correlation_token: impl Into<String>) -> Self {
        Self::new(Some(request_id.into()), Some(correlation_token.into()))
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn correlation_token(&self) -> Option<&str> {
        self.correlation_token.as_deref()
    }

    /// Request ID, if polling may begin.
    pub(crate) fn pollable_id(&self) -> Option<&str> {
        self.correlation_token.as_ref()?;
        self.request_id()
    }
}

/// Three-state result of a polling session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollStatus {
    #[default]
    Pending,
    Success,
    Error,
}

/// Why a polling session ended in [`PollStatus::Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PollFailure {
    #[error("Transaction failed")]
    TransactionFailed,

    #[error("An error occurred while polling")]
    Polling,

    #[error("Transaction took too long to complete")]
    TimedOut,
}

/// Observable state of the poller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PollState {
    pub(crate) is_active: bool,
    pub(crate) status: PollStatus,
    pub(crate) last_error: Option<PollFailure>,
    pub(crate) timed_out: bool,
    pub(crate) display_message: Option<&'static str>,
}

impl PollState {
    /// Whether a status check is currently scheduled or in flight.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn status(&self) -> PollStatus {
        self.status
    }

    pub fn last_error(&self) -> Option<PollFailure> {
        self.last_error
    }

    pub fn last_error_message(&self) -> Option<String> {
        self.last_error.map(|e| e.to_string())
    }

    /// Whether the session ended by exceeding the polling budget.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    /// Description of the last observed remote status.
    pub fn display_message(&self) -> Option<&'static str> {
        self.display_message
    }

    /// Whether the session reached success or error.
    pub fn is_finished(&self) -> bool {
        self.status != PollStatus::Pending
    }

    pub(crate) fn started() -> Self {
        Self {
            is_active: true,
            ..Self::default()
        }
    }

    pub(crate) fn succeed(&mut self) {
        self.status = PollStatus::Success;
        self.is_active = false;
    }

    pub(crate) fn fail(&mut self, failure: PollFailure) {
        self.status = PollStatus::Error;
        self.last_error = Some(failure);
        self.timed_out = failure == PollFailure::TimedOut;
        self.is_active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pollable_id_requires_both_identifiers() {
        assert_eq!(PollRequest::ready("req-1", "0xabc").pollable_id(), Some("req-1"));
        assert_eq!(
            PollRequest::new(Some("req-1".to_string()), None).pollable_id(),
            None
        );
        assert_eq!(
            PollRequest::new(Some("req-1".to_string()), Some(String::new())).pollable_id(),
            None
        );
        assert_eq!(PollRequest::new(None, Some("0xabc".to_string())).pollable_id(), None);
    }

    #[test]
    fn test_failure_messages() {
        let mut state = PollState::started();
        state.fail(PollFailure::TimedOut);
        assert_eq!(state.status(), PollStatus::Error);
        assert!(state.timed_out());
        assert!(!state.is_active());
        assert_eq!(
            state.last_error_message().as_deref(),
            Some("Transaction took too long to complete")
        );
        assert_eq!(PollFailure::TransactionFailed.to_string(), "Transaction failed");
        assert_eq!(PollFailure::Polling.to_string(), "An error occurred while polling");
    }
}
