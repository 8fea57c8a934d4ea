//! Probe-backed debug sessions.
//!
//! A probe-backed session runs a GDB server for an attached debug probe in a
//! background worker, waits for the worker to report that the server is up,
//! runs a foreground client (normally `arm-none-eabi-gdb`) to completion and
//! then shuts the server down again. The worker and the session talk over a
//! small typed [`handshake`].
//!
//! The server itself sits behind the [`ProbeServer`] trait; [`PyOcdServer`]
//! drives the `pyocd` command-line tool.

/// Structured cancellation for the wait phase of a session.
pub mod cancel;
/// Command-line argument construction for `pyocd`.
pub mod cmd;
/// Discovery of the `pyocd` executable and of attached probes.
pub mod discovery;
/// Error types returned by probe operations.
pub mod error;
/// Ready/stopped/stop-request signalling between session and worker.
pub mod handshake;
/// The `pyocd gdbserver` child process.
pub mod process;
/// The probe server abstraction and its pyOCD implementation.
pub mod server;
/// The session state machine.
pub mod session;
/// Shared configuration and probe descriptions.
pub mod types;
/// The background worker that owns the server.
pub mod worker;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use error::ProbeError;
pub use handshake::Signal;
pub use server::{ProbeServer, PyOcdServer, RunningServer};
pub use session::{run_session, SessionState};
pub use types::{Probe, ServerConfig, DEFAULT_GDB_PORT};
