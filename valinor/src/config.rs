use crate::preference::PreferenceOrder;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use valinor_probe::{ServerConfig, DEFAULT_GDB_PORT};

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "VALINOR_CONFIG";

/// User configuration, read from JSON. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base tool preference; detected tools missing from it are appended.
    pub preference: PreferenceOrder,
    /// Explicit executable locations, tried before any search.
    pub paths: ToolPaths,
    /// pyOCD GDB server settings.
    pub gdb_server: GdbServerSettings,
    /// Target definitions file consulted during tool selection.
    pub definitions: Option<PathBuf>,
}

/// Explicit executable locations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    /// Host `gdb`.
    pub gdb: Option<PathBuf>,
    /// `arm-none-eabi-gdb`.
    pub arm_none_eabi_gdb: Option<PathBuf>,
    /// uVision (`UV4`/`UV5`).
    pub uvision: Option<PathBuf>,
    /// `pyocd`.
    pub pyocd: Option<PathBuf>,
}

/// GDB server settings as written in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GdbServerSettings {
    /// Local port the server listens on.
    pub port: u16,
    /// Milliseconds between readiness checks.
    pub poll_interval_ms: u64,
    /// Milliseconds between stop-request checks in the worker.
    pub liveness_interval_ms: u64,
    /// Upper bound on probe discovery, in milliseconds.
    pub discovery_timeout_ms: u64,
    /// Upper bound on server startup, in milliseconds.
    pub startup_timeout_ms: u64,
    /// Time the server gets to exit before being killed, in milliseconds.
    pub shutdown_grace_ms: u64,
    /// Halt on hard faults.
    pub break_at_hardfault: bool,
    /// Step into interrupt handlers.
    pub step_into_interrupt: bool,
    /// Halt on reset.
    pub break_on_reset: bool,
}

impl Default for GdbServerSettings {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl From<&ServerConfig> for GdbServerSettings {
    fn from(config: &ServerConfig) -> Self {
        Self {
            port: config.port,
            poll_interval_ms: millis(config.poll_interval),
            liveness_interval_ms: millis(config.liveness_interval),
            discovery_timeout_ms: millis(config.discovery_timeout),
            startup_timeout_ms: millis(config.startup_timeout),
            shutdown_grace_ms: millis(config.shutdown_grace),
            break_at_hardfault: config.break_at_hardfault,
            step_into_interrupt: config.step_into_interrupt,
            break_on_reset: config.break_on_reset,
        }
    }
}

/// A zero interval never blocks, so it falls back to the default.
fn interval_or(ms: u64, default: Duration) -> Duration {
    if ms == 0 {
        default
    } else {
        Duration::from_millis(ms)
    }
}

impl From<&GdbServerSettings> for ServerConfig {
    fn from(settings: &GdbServerSettings) -> Self {
        let defaults = Self::default();
        Self {
            port: if settings.port == 0 {
                DEFAULT_GDB_PORT
            } else {
                settings.port
            },
            poll_interval: interval_or(settings.poll_interval_ms, defaults.poll_interval),
            liveness_interval: interval_or(
                settings.liveness_interval_ms,
                defaults.liveness_interval,
            ),
            discovery_timeout: Duration::from_millis(settings.discovery_timeout_ms),
            startup_timeout: Duration::from_millis(settings.startup_timeout_ms),
            shutdown_grace: Duration::from_millis(settings.shutdown_grace_ms),
            break_at_hardfault: settings.break_at_hardfault,
            step_into_interrupt: settings.step_into_interrupt,
            break_on_reset: settings.break_on_reset,
        }
    }
}

impl Config {
    /// Loads the configuration.
    ///
    /// Lookup order: `explicit` (which must exist), the file named by
    /// `VALINOR_CONFIG`, `<config dir>/valinor/config.json` if present,
    /// otherwise built-in defaults.
    ///
    /// # Errors
    /// Returns an error if a selected file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Self::from_file(Path::new(&path));
        }
        match default_location() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                tracing::debug!("no configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Server settings in the form the probe session expects.
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::from(&self.gdb_server)
    }
}

fn default_location() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("valinor").join("config.json"))
}
