//! Keeps terminal interrupts from stopping the orchestrator.
//!
//! While an interactive debugger runs in the foreground, Ctrl-C is meant for
//! the debuggee (GDB uses it to halt the target). The terminal delivers the
//! interrupt to the whole foreground process group, so the child still gets
//! it; this guard only makes sure our own process survives it.

use tokio::task::JoinHandle;
use tracing::debug;

#[cfg(unix)]
type Interrupts = tokio::signal::unix::Signal;
#[cfg(windows)]
type Interrupts = tokio::signal::windows::CtrlC;

#[cfg(unix)]
fn listen() -> std::io::Result<Interrupts> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
fn listen() -> std::io::Result<Interrupts> {
    tokio::signal::windows::ctrl_c()
}

/// Swallows Ctrl-C for as long as it is alive.
///
/// Interrupts are logged at debug level and are not forwarded anywhere.
#[derive(Debug)]
pub struct InterruptGuard {
    task: JoinHandle<()>,
}

impl InterruptGuard {
    /// Installs the guard. Must be called from within a tokio runtime.
    ///
    /// The handler is registered before this returns, so an interrupt
    /// arriving right after is already swallowed.
    ///
    /// # Errors
    /// Returns the OS error if the signal handler cannot be registered.
    pub fn install(context: &'static str) -> std::io::Result<Self> {
        let mut interrupts = listen()?;
        let task = tokio::spawn(async move {
            while interrupts.recv().await.is_some() {
                debug!(context, "ignoring interrupt while foreground process runs");
            }
        });
        Ok(Self { task })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_interrupt_right_after_install_is_swallowed() {
        let _guard = InterruptGuard::install("test").expect("install guard");

        let status = std::process::Command::new("kill")
            .args(["-INT", &std::process::id().to_string()])
            .status()
            .expect("run kill");
        assert!(status.success());

        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
