//! Command-line argument builders for `pyocd`.
//!
//! ## Flag Reference
//! - `json --probes`: machine-readable list of attached probes
//! - `gdbserver --port <port>`: GDB remote server on a local TCP port
//! - `--uid <id>`: select a probe by unique id
//! - `--vector-catch <chars>`: halt on events; `h` hard fault, `r` reset,
//!   `n` none
//! - `--step-int`: step into interrupt handlers

use crate::types::{Probe, ServerConfig};
use std::ffi::OsString;

/// Arguments for listing attached probes as JSON.
#[must_use]
pub fn build_list_args() -> Vec<OsString> {
    vec![OsString::from("json"), OsString::from("--probes")]
}

/// Arguments for running a GDB server on `probe`.
#[must_use]
pub fn build_server_args(probe: &Probe, config: &ServerConfig) -> Vec<OsString> {
    let mut args = Vec::new();

    args.push(OsString::from("gdbserver"));
    args.push(OsString::from("--port"));
    args.push(OsString::from(config.port.to_string()));
    args.push(OsString::from("--uid"));
    args.push(OsString::from(&probe.unique_id));

    args.push(OsString::from("--vector-catch"));
    args.push(OsString::from(vector_catch(config)));

    if config.step_into_interrupt {
        args.push(OsString::from("--step-int"));
    }

    args
}

fn vector_catch(config: &ServerConfig) -> String {
    let mut catch = String::new();
    if config.break_at_hardfault {
        catch.push('h');
    }
    if config.break_on_reset {
        catch.push('r');
    }
    if catch.is_empty() {
        catch.push('n');
    }
    catch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe() -> Probe {
        Probe {
            unique_id: "0240000032044e45".to_string(),
            description: "DAPLink CMSIS-DAP".to_string(),
            target: Some("k64f".to_string()),
        }
    }

    #[test]
    fn test_default_server_args() {
        let args = build_server_args(&probe(), &ServerConfig::default());
        let args_str: Vec<&str> = args.iter().filter_map(|s| s.to_str()).collect();

        assert_eq!(
            args_str,
            vec![
                "gdbserver",
                "--port",
                "3333",
                "--uid",
                "0240000032044e45",
                "--vector-catch",
                "h"
            ]
        );
    }

    #[test]
    fn test_vector_catch_combines_reset_and_hardfault() {
        let config = ServerConfig {
            break_on_reset: true,
            ..ServerConfig::default()
        };
        let args = build_server_args(&probe(), &config);
        let args_str: Vec<&str> = args.iter().filter_map(|s| s.to_str()).collect();

        assert!(
            args_str.windows(2).any(|w| w[0] == "--vector-catch" && w[1] == "hr"),
            "Expected '--vector-catch hr' but got: {args_str:?}"
        );
    }

    #[test]
    fn test_no_vector_catch_and_step_into_interrupts() {
        let config = ServerConfig {
            port: 4444,
            break_at_hardfault: false,
            step_into_interrupt: true,
            ..ServerConfig::default()
        };
        let args = build_server_args(&probe(), &config);
        let args_str: Vec<&str> = args.iter().filter_map(|s| s.to_str()).collect();

        assert!(args_str.windows(2).any(|w| w[0] == "--port" && w[1] == "4444"));
        assert!(args_str.windows(2).any(|w| w[0] == "--vector-catch" && w[1] == "n"));
        assert!(args_str.contains(&"--step-int"));
    }
}
