//! The `pyocd gdbserver` child process.

use crate::error::ProbeError;
use crate::server::RunningServer;
use crate::types::{Probe, ServerConfig};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, Command};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info};

/// A running `pyocd gdbserver`.
///
/// The child is killed if this is dropped without [`RunningServer::stop`].
#[derive(Debug)]
pub struct PyOcdProcess {
    child: Child,
    pid: u32,
    grace: Duration,
    log_task: JoinHandle<()>,
}

enum Startup {
    Listening,
    LogClosed,
    Exited(Option<i32>),
}

/// Spawns the GDB server for `probe` and waits until it reports that it is
/// listening.
///
/// # Errors
/// Returns a [`ProbeError`] if the server cannot be spawned, exits early, or
/// does not start listening within `config.startup_timeout`.
pub async fn spawn_gdbserver(
    pyocd: &Path,
    probe: &Probe,
    config: &ServerConfig,
) -> Result<PyOcdProcess, ProbeError> {
    let args = crate::cmd::build_server_args(probe, config);
    debug!(pyocd = %pyocd.display(), ?args, "starting gdb server");

    let mut cmd = Command::new(pyocd);
    cmd.args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    // Own process group: Ctrl-C typed at the debugger must not reach the
    // server.
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd.spawn().map_err(|e| ProbeError::SpawnFailed {
        stage: "gdbserver spawn".to_string(),
        source: e,
    })?;

    let stderr = child.stderr.take().ok_or(ProbeError::NoStderr)?;
    let pid = child.id().ok_or(ProbeError::NoPid)?;

    let (ready_tx, ready_rx) = oneshot::channel();
    let log_task = tokio::spawn(forward_server_log(stderr, ready_tx));

    let mut process = PyOcdProcess {
        child,
        pid,
        grace: config.shutdown_grace,
        log_task,
    };
    process
        .wait_until_listening(ready_rx, config.startup_timeout)
        .await?;

    info!(pid, port = config.port, "gdb server listening");
    Ok(process)
}

impl PyOcdProcess {
    async fn wait_until_listening(
        &mut self,
        ready: oneshot::Receiver<()>,
        limit: Duration,
    ) -> Result<(), ProbeError> {
        let child = &mut self.child;
        let startup = timeout(limit, async move {
            tokio::select! {
                r = ready => if r.is_ok() { Startup::Listening } else { Startup::LogClosed },
                status = child.wait() => Startup::Exited(status.ok().and_then(|s| s.code())),
            }
        })
        .await;

        match startup {
            Ok(Startup::Listening) => Ok(()),
            Ok(Startup::LogClosed) => Err(ProbeError::ServerExited {
                exit_code: self.child.try_wait().ok().flatten().and_then(|s| s.code()),
            }),
            Ok(Startup::Exited(exit_code)) => Err(ProbeError::ServerExited { exit_code }),
            Err(_) => Err(ProbeError::Timeout {
                stage: "gdbserver startup".to_string(),
                elapsed: limit,
            }),
        }
    }
}

impl Drop for PyOcdProcess {
    fn drop(&mut self) {
        self.log_task.abort();
    }
}

#[async_trait]
impl RunningServer for PyOcdProcess {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    async fn join(&mut self, limit: Duration) {
        let _ = timeout(limit, self.child.wait()).await;
    }

    async fn stop(&mut self) -> Result<(), ProbeError> {
        if !self.is_alive() {
            return Ok(());
        }
        graceful_shutdown(&mut self.child, self.pid, self.grace).await?;
        info!(pid = self.pid, "gdb server stopped");
        Ok(())
    }
}

/// Forwards server output to the log and fires `ready` once the server says
/// it is listening.
async fn forward_server_log(stderr: ChildStderr, ready: oneshot::Sender<()>) {
    let mut ready = Some(ready);
    let mut reader = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = reader.next_line().await {
        debug!(target: "gdbserver", "{line}");
        if is_listening_line(&line) {
            if let Some(tx) = ready.take() {
                let _ = tx.send(());
            }
        }
    }
}

/// Matches both "GDB server started on port 3333" and
/// "GDB server listening on port 3333 (websocket disabled)".
fn is_listening_line(line: &str) -> bool {
    let line = line.to_ascii_lowercase();
    line.contains("gdb server") && (line.contains("listening on port") || line.contains("started on port"))
}

/// Graceful shutdown: `SIGTERM`, wait grace period, then `SIGKILL`.
#[cfg(unix)]
async fn graceful_shutdown(child: &mut Child, pid: u32, grace: Duration) -> Result<(), ProbeError> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    let raw_pid = i32::try_from(pid).map_err(|_| ProbeError::SignalFailed {
        signal: "SIGTERM".to_string(),
        pid,
        reason: "PID value exceeds i32::MAX".to_string(),
    })?;

    signal::kill(Pid::from_raw(raw_pid), Signal::SIGTERM).map_err(|e| {
        ProbeError::SignalFailed {
            signal: "SIGTERM".to_string(),
            pid,
            reason: e.to_string(),
        }
    })?;

    match timeout(grace, child.wait()).await {
        Ok(Ok(_status)) => Ok(()),
        Ok(Err(e)) => Err(ProbeError::SpawnFailed {
            stage: "graceful_shutdown wait".to_string(),
            source: e,
        }),
        Err(_) => {
            child.kill().await.map_err(|e| ProbeError::SpawnFailed {
                stage: "SIGKILL".to_string(),
                source: e,
            })?;
            Ok(())
        }
    }
}

/// Windows: immediate termination, no graceful shutdown for console processes.
#[cfg(windows)]
async fn graceful_shutdown(child: &mut Child, _pid: u32, _grace: Duration) -> Result<(), ProbeError> {
    child.kill().await.map_err(|e| ProbeError::SpawnFailed {
        stage: "TerminateProcess".to_string(),
        source: e,
    })
}
