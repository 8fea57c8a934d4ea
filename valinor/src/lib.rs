#![deny(missing_docs)]
//! valinor opens a debug session for an embedded executable.
//!
//! It detects which debuggers and IDEs are installed, picks the best one for
//! the target board, generates the files that tool needs and launches it.
//! For `arm-none-eabi-gdb` it also runs a pyOCD GDB server for the attached
//! probe for as long as the debugger runs.

/// User configuration.
pub mod config;
/// Error types for the orchestrator.
pub mod errors;
/// Launchers bound to detected tools.
pub mod launcher;
/// The end-to-end debug flow.
pub mod orchestrator;
/// Tool preference ranking.
pub mod preference;
/// Tool detection and the launcher cache.
pub mod registry;
/// Tool selection for a target.
pub mod select;
/// Known tools.
pub mod tool;

pub use config::{Config, GdbServerSettings, ToolPaths, CONFIG_ENV_VAR};
pub use errors::{Error, LaunchError};
pub use launcher::{LaunchSettings, Launcher, ToolLauncher};
pub use orchestrator::{Orchestrator, PreparedSession, SessionRequest};
pub use preference::PreferenceOrder;
pub use registry::{DetectionCache, ToolEntry, TOOL_REGISTRY};
pub use select::Selector;
pub use tool::{Tool, UnknownTool};
