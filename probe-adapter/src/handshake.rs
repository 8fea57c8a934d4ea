//! Session/worker handshake.
//!
//! Two single-slot channels carry [`Signal`]s: the worker sends `Ready` and
//! `Stopped` to the session, the session sends `StopRequest` to the worker.
//! A handshake is created per session and never reused.

use std::time::Duration;
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError};
use tracing::trace;

/// Messages exchanged between a session and its server worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The GDB server is listening (worker to session).
    Ready,
    /// The worker has exited (worker to session). Sent on every exit path.
    Stopped,
    /// Stop the server and exit (session to worker).
    StopRequest,
}

/// Outcome of one bounded wait on the session end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    /// A signal arrived.
    Signal(Signal),
    /// Nothing arrived within the interval.
    Empty,
    /// The worker end is gone and nothing is buffered.
    Closed,
}

/// Creates a fresh handshake: the session end and the worker end.
#[must_use]
pub fn handshake() -> (SessionHandshake, WorkerHandshake) {
    let (signal_tx, signal_rx) = mpsc::channel(1);
    let (request_tx, request_rx) = mpsc::channel(1);
    (
        SessionHandshake {
            signals: signal_rx,
            requests: request_tx,
        },
        WorkerHandshake {
            signals: signal_tx,
            requests: request_rx,
        },
    )
}

/// The session's end: receives `Ready`/`Stopped`, sends `StopRequest`.
#[derive(Debug)]
pub struct SessionHandshake {
    signals: mpsc::Receiver<Signal>,
    requests: mpsc::Sender<Signal>,
}

impl SessionHandshake {
    /// Waits at most `interval` for the next signal from the worker.
    pub async fn poll(&mut self, interval: Duration) -> Polled {
        match tokio::time::timeout(interval, self.signals.recv()).await {
            Ok(Some(signal)) => Polled::Signal(signal),
            Ok(None) => Polled::Closed,
            Err(_) => Polled::Empty,
        }
    }

    /// Asks the worker to stop. Never blocks.
    ///
    /// A request already sitting in the slot, or a worker that has already
    /// exited, makes this a no-op.
    pub fn request_stop(&self) {
        match self.requests.try_send(Signal::StopRequest) {
            Ok(()) => trace!("stop request sent"),
            Err(TrySendError::Full(_)) => trace!("stop request already pending"),
            Err(TrySendError::Closed(_)) => trace!("worker already gone"),
        }
    }
}

/// The worker's end: sends `Ready`/`Stopped`, receives `StopRequest`.
#[derive(Debug)]
pub struct WorkerHandshake {
    signals: mpsc::Sender<Signal>,
    requests: mpsc::Receiver<Signal>,
}

impl WorkerHandshake {
    /// Tells the session the server is listening.
    ///
    /// Returns `false` if the session end is gone.
    pub async fn ready(&self) -> bool {
        self.signals.send(Signal::Ready).await.is_ok()
    }

    /// Checks for a stop request without blocking. A dropped session end
    /// counts as a stop request.
    pub fn stop_requested(&mut self) -> bool {
        match self.requests.try_recv() {
            Ok(signal) => signal == Signal::StopRequest,
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => true,
        }
    }

    /// Waits until a stop request arrives or the session end is dropped.
    pub async fn wait_for_stop_request(&mut self) {
        while let Some(signal) = self.requests.recv().await {
            if signal == Signal::StopRequest {
                return;
            }
        }
    }

    /// A guard that sends `Stopped` when dropped.
    #[must_use]
    pub fn stopped_on_drop(&self) -> StoppedOnDrop {
        StoppedOnDrop {
            signals: self.signals.clone(),
        }
    }
}

/// Sends [`Signal::Stopped`] when dropped, including during unwinding.
#[derive(Debug)]
pub struct StoppedOnDrop {
    signals: mpsc::Sender<Signal>,
}

impl Drop for StoppedOnDrop {
    fn drop(&mut self) {
        // A full slot means an unread `Ready`; the session will see the
        // channel close right after it.
        if self.signals.try_send(Signal::Stopped).is_err() {
            trace!("stopped signal not delivered");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn test_ready_reaches_session() {
        let (mut session, worker) = handshake();
        assert!(worker.ready().await);
        assert_eq!(session.poll(SHORT).await, Polled::Signal(Signal::Ready));
    }

    #[tokio::test]
    async fn test_poll_times_out_when_idle() {
        let (mut session, _worker) = handshake();
        assert_eq!(session.poll(SHORT).await, Polled::Empty);
    }

    #[tokio::test]
    async fn test_guard_sends_stopped_then_channel_closes() {
        let (mut session, worker) = handshake();
        let guard = worker.stopped_on_drop();
        drop(worker);
        drop(guard);

        assert_eq!(session.poll(SHORT).await, Polled::Signal(Signal::Stopped));
        assert_eq!(session.poll(SHORT).await, Polled::Closed);
    }

    #[tokio::test]
    async fn test_stop_request_is_seen_once() {
        let (session, mut worker) = handshake();
        assert!(!worker.stop_requested());

        session.request_stop();
        session.request_stop();
        assert!(worker.stop_requested());
        assert!(!worker.stop_requested());
    }

    #[tokio::test]
    async fn test_dropped_session_counts_as_stop_request() {
        let (session, mut worker) = handshake();
        drop(session);
        assert!(worker.stop_requested());
        tokio::time::timeout(SHORT, worker.wait_for_stop_request())
            .await
            .expect("closed channel should end the wait");
    }
}
