//! Locates `pyocd` and the debug probes attached to the host.

use crate::error::ProbeError;
use crate::types::Probe;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};
use which::which;

/// Environment variable that overrides the default `pyocd` binary path.
pub const PYOCD_BIN_ENV_VAR: &str = "VALINOR_PYOCD_BIN";

/// Locates the `pyocd` executable.
///
/// Resolution order:
/// 1. `explicit_path` if provided and the file exists.
/// 2. The path in the `VALINOR_PYOCD_BIN` environment variable.
/// 3. `pyocd` resolved via `$PATH`.
/// 4. Common pip install locations (platform-specific).
///
/// # Errors
///
/// Returns `ProbeError::ExecutableNotFound` when no valid executable can be
/// located.
pub fn discover_pyocd(explicit_path: Option<PathBuf>) -> Result<PathBuf, ProbeError> {
    // 1. Explicit path
    if let Some(path) = explicit_path {
        if path.exists() {
            return Ok(path);
        }
        return Err(ProbeError::ExecutableNotFound(format!(
            "Explicit path does not exist: {}",
            path.display()
        )));
    }

    // 2. Environment variable
    if let Ok(path_str) = std::env::var(PYOCD_BIN_ENV_VAR) {
        let path = PathBuf::from(path_str);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. PATH lookup
    if let Ok(path) = which("pyocd") {
        return Ok(path);
    }

    // 4. Common install locations
    for location in fallback_locations() {
        if location.exists() {
            return Ok(location);
        }
    }

    Err(ProbeError::ExecutableNotFound(
        "pyocd not found. Install: python3 -m pip install pyocd\n\
         Searched: PATH, common pip install locations."
            .to_string(),
    ))
}

#[cfg(unix)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".local/bin/pyocd"));
    }
    locations.push(PathBuf::from("/usr/local/bin/pyocd"));
    locations
}

#[cfg(windows)]
fn fallback_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(data) = dirs::data_dir() {
        locations.push(data.join(r"Python\Scripts\pyocd.exe"));
    }
    locations
}

#[derive(Debug, Deserialize)]
struct ProbeListing {
    #[serde(default)]
    status: i32,
    #[serde(default)]
    boards: Vec<ProbeEntry>,
}

#[derive(Debug, Deserialize)]
struct ProbeEntry {
    unique_id: String,
    #[serde(default)]
    info: String,
    #[serde(default)]
    target: Option<String>,
}

/// Parses the output of `pyocd json --probes`.
///
/// # Errors
/// Returns an error if the output is not valid JSON or reports a non-zero
/// status.
pub fn parse_probe_list(json: &str) -> Result<Vec<Probe>, ProbeError> {
    let listing: ProbeListing = serde_json::from_str(json)?;
    if listing.status != 0 {
        return Err(ProbeError::ProbeListFailed(format!(
            "pyocd reported status {}",
            listing.status
        )));
    }
    Ok(listing
        .boards
        .into_iter()
        .map(|entry| Probe {
            unique_id: entry.unique_id,
            description: entry.info,
            target: entry.target,
        })
        .collect())
}

/// Lists attached probes. Never waits longer than `limit`: a missing probe
/// is reported as an empty list, not waited for.
///
/// # Errors
/// Returns an error if `pyocd` cannot be run, fails, or times out.
pub async fn list_probes(pyocd: &Path, limit: Duration) -> Result<Vec<Probe>, ProbeError> {
    let mut cmd = Command::new(pyocd);
    cmd.args(crate::cmd::build_list_args()).kill_on_drop(true);

    let output = timeout(limit, cmd.output())
        .await
        .map_err(|_| ProbeError::Timeout {
            stage: "list probes".to_string(),
            elapsed: limit,
        })?
        .map_err(|e| ProbeError::SpawnFailed {
            stage: "list probes".to_string(),
            source: e,
        })?;

    if !output.status.success() {
        return Err(ProbeError::ProbeListFailed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    parse_probe_list(&String::from_utf8_lossy(&output.stdout))
}

/// Picks the probe to debug with: the first one listed.
///
/// # Errors
/// Returns `ProbeError::NoProbeAttached` for an empty list.
pub fn choose_probe(probes: Vec<Probe>) -> Result<Probe, ProbeError> {
    let mut probes = probes.into_iter();
    let chosen = probes.next().ok_or(ProbeError::NoProbeAttached)?;
    for other in probes {
        warn!(
            unique_id = %other.unique_id,
            "several probes attached, ignoring this one"
        );
    }
    debug!(unique_id = %chosen.unique_id, description = %chosen.description, "using probe");
    Ok(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "pyocd_version": "0.36.0",
        "version": {"major": 1, "minor": 0},
        "status": 0,
        "boards": [
            {
                "unique_id": "0240000032044e4500",
                "info": "FRDM-K64F [k64f]",
                "board_name": "FRDM-K64F",
                "target": "k64f",
                "vendor_name": "NXP",
                "product_name": "DAPLink CMSIS-DAP"
            },
            {
                "unique_id": "066DFF495052",
                "info": "NUCLEO-F401RE",
                "target": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_probe_list() {
        let probes = parse_probe_list(LISTING).unwrap();
        assert_eq!(probes.len(), 2);
        assert_eq!(probes[0].unique_id, "0240000032044e4500");
        assert_eq!(probes[0].description, "FRDM-K64F [k64f]");
        assert_eq!(probes[0].target.as_deref(), Some("k64f"));
        assert_eq!(probes[1].target, None);
    }

    #[test]
    fn test_parse_empty_list() {
        let probes = parse_probe_list(r#"{"status": 0, "boards": []}"#).unwrap();
        assert!(probes.is_empty());
    }

    #[test]
    fn test_parse_error_status() {
        let err = parse_probe_list(r#"{"status": 1}"#).unwrap_err();
        assert!(matches!(err, ProbeError::ProbeListFailed(_)));
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse_probe_list("Traceback (most recent call last):").unwrap_err();
        assert!(matches!(err, ProbeError::ProbeListParse(_)));
    }

    #[test]
    fn test_choose_first_probe() {
        let probes = parse_probe_list(LISTING).unwrap();
        let chosen = choose_probe(probes).unwrap();
        assert_eq!(chosen.unique_id, "0240000032044e4500");
    }

    #[test]
    fn test_choose_without_probes() {
        assert!(matches!(
            choose_probe(Vec::new()),
            Err(ProbeError::NoProbeAttached)
        ));
    }
}
