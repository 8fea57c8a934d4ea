//! The background worker that owns the GDB server for one session.

use crate::error::ProbeError;
use crate::handshake::WorkerHandshake;
use crate::server::{ProbeServer, RunningServer};
use crate::types::ServerConfig;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

/// Finds a probe, starts its server, reports `Ready`, then keeps the server
/// up until a stop request arrives or the server exits.
///
/// `Stopped` is sent on every exit path, including errors and panics. A
/// server that was started is stopped before this returns.
///
/// # Errors
/// Returns the [`ProbeError`] that ended the worker.
pub async fn run_server_worker(
    server: Arc<dyn ProbeServer>,
    config: ServerConfig,
    mut handshake: WorkerHandshake,
) -> Result<(), ProbeError> {
    let _stopped = handshake.stopped_on_drop();
    info!("starting gdb server...");

    let Some(probe) = until_stop_requested(&mut handshake, server.find_probe(&config)).await else {
        return Ok(());
    };
    let probe = probe.inspect_err(|e| warn!(error = %e, "no usable debug probe"))?;

    let Some(running) = until_stop_requested(&mut handshake, server.start(&probe, &config)).await
    else {
        return Ok(());
    };
    let mut running = running.inspect_err(|e| warn!(error = %e, "gdb server did not start"))?;

    let served = serve(running.as_mut(), &mut handshake, &config).await;
    if served.is_err() && running.is_alive() {
        if let Err(e) = running.stop().await {
            warn!(error = %e, "failed to stop gdb server");
        }
    }
    served
}

async fn serve(
    running: &mut dyn RunningServer,
    handshake: &mut WorkerHandshake,
    config: &ServerConfig,
) -> Result<(), ProbeError> {
    if !running.is_alive() {
        return Err(ProbeError::ServerExited { exit_code: None });
    }
    if !handshake.ready().await {
        // The session is gone; nobody will ever connect.
        return running.stop().await;
    }

    while running.is_alive() {
        running.join(config.liveness_interval).await;
        if handshake.stop_requested() {
            info!("stop requested, shutting down gdb server");
            return running.stop().await;
        }
    }

    warn!("gdb server exited on its own");
    Ok(())
}

/// Runs `step` unless a stop request arrives first, in which case `step` is
/// dropped and `None` returned.
async fn until_stop_requested<T>(
    handshake: &mut WorkerHandshake,
    step: impl Future<Output = T>,
) -> Option<T> {
    tokio::select! {
        biased;
        () = handshake.wait_for_stop_request() => {
            info!("stop requested before gdb server was ready");
            None
        }
        out = step => Some(out),
    }
}
