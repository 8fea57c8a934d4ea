//! Session state machine for a probe-backed debugger.
//!
//! ```text
//! Initializing -> WaitingForReady -> ClientRunning -> ShuttingDown -> Terminated
//!                       |
//!                       +-> Failed       (server never became ready)
//!                       +-> Terminated   (cancelled, after joining the worker)
//! ```
//!
//! The client never starts before the worker reports `Ready`, and the worker
//! is always joined before [`run_session`] returns.

use crate::cancel::CancelToken;
use crate::error::ProbeError;
use crate::handshake::{handshake, Polled, SessionHandshake, Signal};
use crate::server::ProbeServer;
use crate::types::ServerConfig;
use crate::worker::run_server_worker;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Phases of a probe-backed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Creating the handshake and spawning the server worker.
    Initializing,
    /// Waiting for the worker to report `Ready`.
    WaitingForReady,
    /// The foreground client is running.
    ClientRunning,
    /// A stop request has been sent to the worker.
    ShuttingDown,
    /// The worker has been joined.
    Terminated,
    /// The server never became ready.
    Failed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::WaitingForReady => "waiting-for-ready",
            Self::ClientRunning => "client-running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

type Worker = JoinHandle<Result<(), ProbeError>>;

enum NotReady {
    ServerDied,
    Cancelled,
}

/// Runs `client` while a GDB server for an attached probe is up.
///
/// Returns whatever `client` returns once the server has been shut down and
/// its worker joined.
///
/// # Errors
/// * [`ProbeError::ServerStartFailed`] if the worker stops before reporting
///   that its server is ready; `client` is not called.
/// * [`ProbeError::Cancelled`] if `cancel` fires while waiting for the
///   server; the worker is told to stop and joined first, `client` is not
///   called.
pub async fn run_session<F, Fut, T>(
    server: Arc<dyn ProbeServer>,
    config: &ServerConfig,
    cancel: &CancelToken,
    client: F,
) -> Result<T, ProbeError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    enter(SessionState::Initializing);
    let (mut session, worker_end) = handshake();
    let worker = tokio::spawn(run_server_worker(server, config.clone(), worker_end));

    enter(SessionState::WaitingForReady);
    match wait_for_ready(&mut session, &worker, config, cancel).await {
        Ok(()) => {}
        Err(NotReady::Cancelled) => {
            info!("cancelled while waiting for gdb server");
            session.request_stop();
            if let Err(e) = join_worker(worker).await {
                debug!(error = %e, "worker ended with error after cancellation");
            }
            enter(SessionState::Terminated);
            return Err(ProbeError::Cancelled);
        }
        Err(NotReady::ServerDied) => {
            enter(SessionState::Failed);
            let reason = match join_worker(worker).await {
                Ok(()) => "worker exited without reporting ready".to_string(),
                Err(e) => e.to_string(),
            };
            return Err(ProbeError::ServerStartFailed { reason });
        }
    }

    enter(SessionState::ClientRunning);
    let output = client().await;

    enter(SessionState::ShuttingDown);
    session.request_stop();
    if let Err(e) = join_worker(worker).await {
        warn!(error = %e, "gdb server worker ended with error");
    }
    enter(SessionState::Terminated);

    Ok(output)
}

fn enter(state: SessionState) {
    debug!(%state, "probe session transition");
}

/// Bounded polling: each round waits at most `poll_interval` for a signal and
/// then checks whether the worker has already finished.
async fn wait_for_ready(
    session: &mut SessionHandshake,
    worker: &Worker,
    config: &ServerConfig,
    cancel: &CancelToken,
) -> Result<(), NotReady> {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(NotReady::Cancelled),
            polled = session.poll(config.poll_interval) => match polled {
                Polled::Signal(Signal::Ready) => return Ok(()),
                Polled::Signal(Signal::Stopped) | Polled::Closed => return Err(NotReady::ServerDied),
                Polled::Signal(Signal::StopRequest) => warn!("unexpected stop request from worker"),
                Polled::Empty => {
                    if worker.is_finished() {
                        return Err(NotReady::ServerDied);
                    }
                }
            },
        }
    }
}

async fn join_worker(worker: Worker) -> Result<(), ProbeError> {
    match worker.await {
        Ok(result) => result,
        Err(e) => Err(ProbeError::WorkerPanicked(e.to_string())),
    }
}
