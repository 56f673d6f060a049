//! Tracking of a routing request until it reaches a terminal status.
//!
//! [`StatusPoller`] checks the request status right away and then every
//! [`PollConfig::poll_interval`], until the request completes, fails, the
//! poller is stopped, or [`PollConfig::max_polling_duration`] elapses.
//! Progress is published as [`PollState`] through a [`watch`] channel.
//!
//! ```ignore
//! let client = FundKitClient::new(api_key)?;
//! let mut poller = StatusPoller::new(client, AlwaysOnline, PollConfig::default());
//! let mut updates = pin!(poll::updates(poller.subscribe()));
//! poller.track(&PollRequest::ready(request_id, tx_hash));
//! while let Some(state) = updates.next().await {
//!     println!("{:?}", state.display_message());
//!     if state.is_finished() {
//!         break;
//!     }
//! }
//! ```
//!
//! While the network is offline status checks are skipped without touching
//! the state. Transport errors observed while offline are treated the same
//! way; any other error ends the session.

mod session;
mod state;

use std::sync::Arc;

use futures::{Stream, stream};
use tokio::sync::watch;
use tracing::debug;

pub use state::{
    DEFAULT_MAX_POLLING_DURATION, DEFAULT_POLL_INTERVAL, PollConfig, PollFailure, PollRequest,
    PollState, PollStatus,
};

use crate::{client::StatusSource, network::Connectivity};
use session::Session;

/// Polls the status of at most one routing request at a time.
///
/// Dropping the poller cancels the active session.
#[derive(Debug)]
pub struct StatusPoller<S, N> {
    source: Arc<S>,
    network: Arc<N>,
    config: PollConfig,
    state: Arc<watch::Sender<PollState>>,
    session: Option<Session>,
}

impl<S: StatusSource, N: Connectivity> StatusPoller<S, N> {
    pub fn new(source: S, network: N, config: PollConfig) -> Self {
        let (state, _) = watch::channel(PollState::default());
        Self {
            source: Arc::new(source),
            network: Arc::new(network),
            config,
            state: Arc::new(state),
            session: None,
        }
    }

    /// Starts tracking the request once both of its identifiers are known.
    ///
    /// Tracking the request that is already tracked is a no-op. Any other
    /// request, including one with an identifier missing, cancels the
    /// current session first. A new session starts from a fresh state.
    ///
    /// Must be called within a Tokio runtime.
    pub fn track(&mut self, request: &PollRequest) {
        if self
            .session
            .as_ref()
            .is_some_and(|s| s.request() == request)
        {
            return;
        }
        self.stop();

        let Some(request_id) = request.pollable_id() else {
            debug!(?request, "Request is not ready for polling");
            return;
        };
        self.session = Some(Session::start(
            request.clone(),
            request_id.to_string(),
            self.source.clone(),
            self.network.clone(),
            self.config,
            self.state.clone(),
        ));
    }
}

impl<S, N> StatusPoller<S, N> {
    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Request of the current session, if any.
    pub fn tracked(&self) -> Option<&PollRequest> {
        self.session.as_ref().map(Session::request)
    }

    /// Cancels pending checks and the overall timeout of the current
    /// session. No state change is published after this returns, apart
    /// from the poller no longer being active.
    pub fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.stop() {
            debug!(request = ?session.request(), "Polling stopped");
            self.state
                .send_if_modified(|s| std::mem::replace(&mut s.is_active, false));
        }
    }

    /// Stops the current session and restores the initial state.
    pub fn reset(&mut self) {
        self.stop();
        self.state.send_replace(PollState::default());
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }
}

impl<S, N> Drop for StatusPoller<S, N> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Stream of state updates, starting with the state current at the time of
/// the call. Intermediate updates may be coalesced; the stream ends when the
/// poller is dropped.
pub fn updates(mut rx: watch::Receiver<PollState>) -> impl Stream<Item = PollState> {
    rx.mark_changed();
    stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let state = rx.borrow_and_update().clone();
        Some((state, rx))
    })
}
