//! Session/worker handshake tests against a scripted probe server.
//!
//! No hardware or `pyocd` is needed: `FakeServer` plays the part of the
//! probe server and records what happened to it.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use valinor_probe::{
    cancel_pair, run_session, CancelToken, Probe, ProbeError, ProbeServer, RunningServer,
    ServerConfig,
};

#[derive(Debug, Default)]
struct Flags {
    started: AtomicBool,
    stopped: AtomicBool,
    start_abandoned: AtomicBool,
    client_ran: AtomicBool,
}

#[derive(Debug, Clone, Copy)]
enum Behaviour {
    Healthy,
    NoProbe,
    HangOnStart,
    ExitsBeforeReady,
    Panics,
}

struct FakeServer {
    behaviour: Behaviour,
    flags: Arc<Flags>,
}

struct FakeRunning {
    alive: bool,
    flags: Arc<Flags>,
}

struct AbandonedOnDrop(Arc<Flags>);

impl Drop for AbandonedOnDrop {
    fn drop(&mut self) {
        self.0.start_abandoned.store(true, Ordering::SeqCst);
    }
}

fn probe() -> Probe {
    Probe {
        unique_id: "fake-probe-0001".to_string(),
        description: "scripted probe".to_string(),
        target: Some("k64f".to_string()),
    }
}

#[async_trait]
impl ProbeServer for FakeServer {
    async fn find_probe(&self, _config: &ServerConfig) -> Result<Probe, ProbeError> {
        match self.behaviour {
            Behaviour::NoProbe => Err(ProbeError::NoProbeAttached),
            Behaviour::Panics => panic!("probe enumeration blew up"),
            _ => Ok(probe()),
        }
    }

    async fn start(
        &self,
        _probe: &Probe,
        _config: &ServerConfig,
    ) -> Result<Box<dyn RunningServer>, ProbeError> {
        match self.behaviour {
            Behaviour::HangOnStart => {
                let _guard = AbandonedOnDrop(Arc::clone(&self.flags));
                std::future::pending().await
            }
            Behaviour::ExitsBeforeReady => Ok(Box::new(FakeRunning {
                alive: false,
                flags: Arc::clone(&self.flags),
            })),
            _ => {
                self.flags.started.store(true, Ordering::SeqCst);
                Ok(Box::new(FakeRunning {
                    alive: true,
                    flags: Arc::clone(&self.flags),
                }))
            }
        }
    }
}

#[async_trait]
impl RunningServer for FakeRunning {
    fn is_alive(&mut self) -> bool {
        self.alive
    }

    async fn join(&mut self, limit: Duration) {
        if self.alive {
            tokio::time::sleep(limit).await;
        }
    }

    async fn stop(&mut self) -> Result<(), ProbeError> {
        self.alive = false;
        self.flags.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn fake(behaviour: Behaviour) -> (Arc<dyn ProbeServer>, Arc<Flags>) {
    let flags = Arc::new(Flags::default());
    let server = FakeServer {
        behaviour,
        flags: Arc::clone(&flags),
    };
    (Arc::new(server), flags)
}

fn fast_config() -> ServerConfig {
    ServerConfig {
        poll_interval: Duration::from_millis(20),
        liveness_interval: Duration::from_millis(10),
        ..ServerConfig::default()
    }
}

/// A client that records that it ran and whether the server was up.
fn client(flags: &Arc<Flags>) -> impl FnOnce() -> std::future::Ready<bool> {
    let flags = Arc::clone(flags);
    move || {
        flags.client_ran.store(true, Ordering::SeqCst);
        std::future::ready(flags.started.load(Ordering::SeqCst))
    }
}

async fn bounded<F: std::future::Future>(fut: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(10), fut)
        .await
        .expect("session should finish in bounded time")
}

#[tokio::test]
async fn test_client_runs_after_ready_and_server_is_stopped() {
    let (server, flags) = fake(Behaviour::Healthy);

    let server_was_up = bounded(run_session(
        server,
        &fast_config(),
        &CancelToken::never(),
        client(&flags),
    ))
    .await
    .expect("session should succeed");

    assert!(server_was_up, "client ran before the server was started");
    assert!(flags.client_ran.load(Ordering::SeqCst));
    assert!(
        flags.stopped.load(Ordering::SeqCst),
        "server must be stopped before run_session returns"
    );
}

#[tokio::test]
async fn test_client_result_is_passed_through() {
    let (server, _flags) = fake(Behaviour::Healthy);

    let out = bounded(run_session(
        server,
        &fast_config(),
        &CancelToken::never(),
        || async { Err::<(), &str>("debugger crashed") },
    ))
    .await
    .expect("session itself should succeed");

    assert_eq!(out, Err("debugger crashed"));
}

#[tokio::test]
async fn test_missing_probe_fails_before_client() {
    let (server, flags) = fake(Behaviour::NoProbe);

    let err = bounded(run_session(
        server,
        &fast_config(),
        &CancelToken::never(),
        client(&flags),
    ))
    .await
    .unwrap_err();

    match err {
        ProbeError::ServerStartFailed { reason } => {
            assert!(reason.contains("No debug probe"), "reason: {reason}");
        }
        other => panic!("expected ServerStartFailed, got {other:?}"),
    }
    assert!(!flags.client_ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_server_exiting_before_ready_fails_before_client() {
    let (server, flags) = fake(Behaviour::ExitsBeforeReady);

    let err = bounded(run_session(
        server,
        &fast_config(),
        &CancelToken::never(),
        client(&flags),
    ))
    .await
    .unwrap_err();

    assert!(
        matches!(err, ProbeError::ServerStartFailed { ref reason } if reason.contains("exited before")),
        "unexpected error: {err:?}"
    );
    assert!(!flags.client_ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_worker_panic_still_unblocks_session() {
    let (server, flags) = fake(Behaviour::Panics);

    let err = bounded(run_session(
        server,
        &fast_config(),
        &CancelToken::never(),
        client(&flags),
    ))
    .await
    .unwrap_err();

    assert!(
        matches!(err, ProbeError::ServerStartFailed { ref reason } if reason.contains("panicked")),
        "unexpected error: {err:?}"
    );
    assert!(!flags.client_ran.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_cancel_while_waiting_joins_worker_and_propagates() {
    let (server, flags) = fake(Behaviour::HangOnStart);
    let (handle, token) = cancel_pair();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(60)).await;
        handle.cancel();
    });

    let err = bounded(run_session(server, &fast_config(), &token, client(&flags)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Cancelled), "unexpected error: {err:?}");
    assert!(!flags.client_ran.load(Ordering::SeqCst));
    assert!(
        flags.start_abandoned.load(Ordering::SeqCst),
        "worker must have finished before run_session returned"
    );
}

#[tokio::test]
async fn test_cancel_before_start_never_runs_client() {
    let (server, flags) = fake(Behaviour::Healthy);
    let (handle, token) = cancel_pair();
    handle.cancel();

    let err = bounded(run_session(server, &fast_config(), &token, client(&flags)))
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Cancelled));
    assert!(!flags.client_ran.load(Ordering::SeqCst));
    if flags.started.load(Ordering::SeqCst) {
        assert!(flags.stopped.load(Ordering::SeqCst));
    }
}

#[tokio::test]
async fn test_cancel_during_client_is_ignored() {
    let (server, flags) = fake(Behaviour::Healthy);
    let (handle, token) = cancel_pair();

    let out = bounded(run_session(server, &fast_config(), &token, move || {
        handle.cancel();
        async { 7 }
    }))
    .await
    .expect("interrupts during the client phase belong to the debugger");

    assert_eq!(out, 7);
    assert!(flags.stopped.load(Ordering::SeqCst));
}
