//! Locates the Keil uVision IDE on the system.

use crate::error::UvisionError;
use std::path::PathBuf;
use which::which;

/// Environment variable that overrides the uVision binary path.
pub const UVISION_BIN_ENV_VAR: &str = "VALINOR_UVISION_BIN";

/// Binary names, newest release first.
const UVISION_BINARIES: &[&str] = &["UV5", "UV4"];

/// Locates the uVision executable.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `VALINOR_UVISION_BIN` environment variable.
/// 3. `UV5`, then `UV4`, resolved via `$PATH`.
/// 4. Default Keil install directories (Windows only).
///
/// # Errors
///
/// Returns `UvisionError::ExecutableNotFound` when no valid executable can be
/// located.
pub fn discover_uvision(explicit_path: Option<PathBuf>) -> Result<PathBuf, UvisionError> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(UvisionError::ExecutableNotFound(format!(
            "Explicit path does not exist: {}",
            path.display()
        )));
    }

    // 2. Environment variable
    if let Ok(path_str) = std::env::var(UVISION_BIN_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. PATH lookup
    for binary in UVISION_BINARIES {
        if let Ok(path) = which(binary) {
            return Ok(path);
        }
    }

    // 4. Common install locations
    for location in fallback_locations() {
        if location.exists() {
            return Ok(location);
        }
    }

    Err(UvisionError::ExecutableNotFound(
        "uVision not found. Searched: PATH, default Keil install directories.".to_string(),
    ))
}

#[cfg(windows)]
fn fallback_locations() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Keil_v5\UV4\UV4.exe"),
        PathBuf::from(r"C:\Keil\UV4\UV4.exe"),
    ]
}

// uVision is Windows-only; elsewhere it can only be found through PATH or an
// explicit override (e.g. a wine wrapper script).
#[cfg(not(windows))]
const fn fallback_locations() -> Vec<PathBuf> {
    Vec::new()
}
