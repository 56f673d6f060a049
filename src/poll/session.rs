//! A single polling session: the check loop and the overall deadline, each
//! running as its own task and owned through one [`TimerPair`].

use std::{
    ops::ControlFlow,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tokio::{sync::watch, task::AbortHandle};
use tracing::{debug, error, info, warn};

use super::state::{PollConfig, PollFailure, PollRequest, PollState};
use crate::{
    client::StatusSource,
    network::Connectivity,
    types::{RequestId, RoutingRequestStatus, StatusClass},
};

/// Cancellable handles of the next-check timer and the overall-timeout timer.
#[derive(Debug, Default)]
struct TimerPair {
    next_check: Option<AbortHandle>,
    deadline: Option<AbortHandle>,
}

impl TimerPair {
    fn cancel_next_check(&mut self) {
        if let Some(handle) = self.next_check.take() {
            handle.abort();
        }
    }

    fn cancel_all(&mut self) {
        self.cancel_next_check();
        if let Some(handle) = self.deadline.take() {
            handle.abort();
        }
    }
}

/// Session bookkeeping shared by both tasks and the owning poller.
///
/// Once `finished` is set no task may touch the published state.
#[derive(Debug, Default)]
struct Shared {
    finished: bool,
    timers: TimerPair,
}

impl Shared {
    fn finish(&mut self) {
        self.finished = true;
        self.timers.cancel_all();
    }
}

#[derive(Debug)]
pub(super) struct Session {
    request: PollRequest,
    shared: Arc<Mutex<Shared>>,
}

impl Session {
    /// Publishes a fresh active state and spawns the check loop (first check
    /// runs right away) and the deadline.
    pub(super) fn start<S, N>(
        request: PollRequest,
        request_id: RequestId,
        source: Arc<S>,
        network: Arc<N>,
        config: PollConfig,
        state: Arc<watch::Sender<PollState>>,
    ) -> Self
    where
        S: StatusSource,
        N: Connectivity,
    {
        info!(
            %request_id,
            poll_interval = ?config.poll_interval,
            max_polling_duration = ?config.max_polling_duration,
            "Starting request status polling"
        );
        state.send_replace(PollState::started());

        let shared = Arc::new(Mutex::new(Shared::default()));
        let ctx = Arc::new(SessionCtx {
            request_id,
            source,
            network,
            config,
            shared: shared.clone(),
            state,
        });

        {
            // Both handles are stored before either task can finish the session.
            let mut guard = lock(&shared);
            guard.timers.deadline = Some(tokio::spawn(ctx.clone().run_deadline()).abort_handle());
            guard.timers.next_check = Some(tokio::spawn(ctx.run_checks()).abort_handle());
        }

        Self { request, shared }
    }

    pub(super) fn request(&self) -> &PollRequest {
        &self.request
    }

    /// Cancels both timers. Returns `true` if the session was still running.
    pub(super) fn stop(&self) -> bool {
        let mut shared = lock(&self.shared);
        let was_running = !shared.finished;
        shared.finish();
        was_running
    }
}

struct SessionCtx<S, N> {
    request_id: RequestId,
    source: Arc<S>,
    network: Arc<N>,
    config: PollConfig,
    shared: Arc<Mutex<Shared>>,
    state: Arc<watch::Sender<PollState>>,
}

impl<S: StatusSource, N: Connectivity> SessionCtx<S, N> {
    async fn run_checks(self: Arc<Self>) {
        while self.check().await.is_continue() {
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn run_deadline(self: Arc<Self>) {
        tokio::time::sleep(self.config.max_polling_duration).await;

        let mut shared = lock(&self.shared);
        shared.timers.cancel_next_check();
        if shared.finished {
            return;
        }
        shared.finish();
        warn!(request_id = %self.request_id, "Request took too long to complete");
        self.state.send_modify(|s| s.fail(PollFailure::TimedOut));
    }

    async fn check(&self) -> ControlFlow<()> {
        if !self.network.is_online() {
            warn!(request_id = %self.request_id, "Network is offline, waiting to retry");
            return self.keep_polling();
        }

        match self.source.get_request_status(&self.request_id).await {
            Ok(response) => self.observe(&response.status),
            Err(err) if !self.network.is_online() => {
                warn!(
                    request_id = %self.request_id,
                    %err,
                    "Network went offline during status check, waiting to retry"
                );
                self.keep_polling()
            }
            Err(err) => {
                error!(request_id = %self.request_id, %err, "Error polling request status");
                let mut shared = lock(&self.shared);
                if shared.finished {
                    return ControlFlow::Break(());
                }
                shared.finish();
                self.state.send_modify(|s| s.fail(PollFailure::Polling));
                ControlFlow::Break(())
            }
        }
    }

    fn keep_polling(&self) -> ControlFlow<()> {
        if lock(&self.shared).finished {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn observe(&self, status: &RoutingRequestStatus) -> ControlFlow<()> {
        let mut shared = lock(&self.shared);
        if shared.finished {
            return ControlFlow::Break(());
        }
        let message = status.message();

        match status.classify() {
            StatusClass::NonTerminal(message) => {
                debug!(request_id = %self.request_id, %status, "Request still in progress");
                self.state.send_if_modified(|s| {
                    let changed = s.display_message != Some(message);
                    s.display_message = Some(message);
                    changed
                });
                ControlFlow::Continue(())
            }
            StatusClass::TerminalSuccess => {
                info!(request_id = %self.request_id, %status, "Request completed");
                shared.finish();
                self.state.send_modify(|s| {
                    s.display_message = Some(message);
                    s.succeed();
                });
                ControlFlow::Break(())
            }
            StatusClass::TerminalFailure(message) => {
                warn!(request_id = %self.request_id, %status, "Request failed");
                shared.finish();
                self.state.send_modify(|s| {
                    s.display_message = Some(message);
                    s.fail(PollFailure::TransactionFailed);
                });
                ControlFlow::Break(())
            }
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
