//! Locates GDB binaries on the host system.

use crate::error::GdbError;
use std::path::PathBuf;
use which::which;

/// Environment variable that overrides the generic `gdb` binary path.
pub const GDB_BIN_ENV_VAR: &str = "VALINOR_GDB_BIN";

/// Environment variable that overrides the `arm-none-eabi-gdb` binary path.
pub const ARM_GDB_BIN_ENV_VAR: &str = "VALINOR_ARM_GDB_BIN";

/// Locates the generic `gdb` executable.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `VALINOR_GDB_BIN` environment variable.
/// 3. `gdb` resolved via `$PATH`.
///
/// # Errors
///
/// Returns `GdbError::ExecutableNotFound` when no valid executable can be
/// located.
pub fn discover_gdb(explicit_path: Option<PathBuf>) -> Result<PathBuf, GdbError> {
    discover("gdb", GDB_BIN_ENV_VAR, explicit_path, Vec::new())
}

/// Locates the `arm-none-eabi-gdb` executable from the GNU Arm toolchain.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `VALINOR_ARM_GDB_BIN` environment variable.
/// 3. `arm-none-eabi-gdb` resolved via `$PATH`.
/// 4. Common toolchain install locations (platform-specific).
///
/// # Errors
///
/// Returns `GdbError::ExecutableNotFound` when no valid executable can be
/// located.
pub fn discover_arm_none_eabi_gdb(explicit_path: Option<PathBuf>) -> Result<PathBuf, GdbError> {
    discover(
        "arm-none-eabi-gdb",
        ARM_GDB_BIN_ENV_VAR,
        explicit_path,
        arm_toolchain_locations(),
    )
}

fn discover(
    binary: &str,
    env_var: &str,
    explicit_path: Option<PathBuf>,
    fallbacks: Vec<PathBuf>,
) -> Result<PathBuf, GdbError> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(GdbError::ExecutableNotFound(format!(
            "Explicit path does not exist: {}",
            path.display()
        )));
    }

    // 2. Environment variable
    if let Ok(path_str) = std::env::var(env_var) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. PATH lookup
    if let Ok(path) = which(binary) {
        return Ok(path);
    }

    // 4. Common install locations
    if let Some(location) = fallbacks.into_iter().find(|p| p.exists()) {
        return Ok(location);
    }

    Err(GdbError::ExecutableNotFound(format!(
        "{binary} not found. Searched: {env_var}, PATH, common install locations."
    )))
}

#[cfg(unix)]
fn arm_toolchain_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".local/bin/arm-none-eabi-gdb"));
    }
    locations.push(PathBuf::from("/usr/local/bin/arm-none-eabi-gdb"));
    locations.push(PathBuf::from("/opt/gcc-arm-none-eabi/bin/arm-none-eabi-gdb"));
    locations.push(PathBuf::from(
        "/Applications/ArmGNUToolchain/bin/arm-none-eabi-gdb",
    ));
    locations
}

#[cfg(windows)]
fn arm_toolchain_locations() -> Vec<PathBuf> {
    vec![
        PathBuf::from(r"C:\Program Files (x86)\GNU Arm Embedded Toolchain\bin\arm-none-eabi-gdb.exe"),
        PathBuf::from(r"C:\Program Files (x86)\GNU Tools ARM Embedded\bin\arm-none-eabi-gdb.exe"),
    ]
}
