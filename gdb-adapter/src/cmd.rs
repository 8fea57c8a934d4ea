//! Command-line argument builder for GDB invocations.
//!
//! Session files are GDB command files. Each one is passed with `-x` and
//! sourced in order, so later files may rely on state set up by earlier ones
//! (for example a `target remote` before a `load`).

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Builds the argument list for a GDB session: one `-x <file>` per session
/// file, in the given order, followed by the executable to debug.
#[must_use]
pub fn build_args(session_files: &[PathBuf], executable: &Path) -> Vec<OsString> {
    let mut args = Vec::with_capacity(session_files.len() * 2 + 1);

    for file in session_files {
        args.push(OsString::from("-x"));
        args.push(file.as_os_str().to_owned());
    }

    args.push(executable.as_os_str().to_owned());

    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_files_keep_their_order() {
        let files = vec![
            PathBuf::from("connect.gdb"),
            PathBuf::from("load.gdb"),
            PathBuf::from("breakpoints.gdb"),
        ];
        let args = build_args(&files, Path::new("firmware.elf"));
        let args_str: Vec<&str> = args.iter().filter_map(|s| s.to_str()).collect();

        assert_eq!(
            args_str,
            vec![
                "-x",
                "connect.gdb",
                "-x",
                "load.gdb",
                "-x",
                "breakpoints.gdb",
                "firmware.elf"
            ]
        );
    }

    #[test]
    fn test_executable_is_last_argument() {
        let args = build_args(&[PathBuf::from("a.gdbstartup")], Path::new("/tmp/out/app"));
        assert_eq!(args.last().and_then(|s| s.to_str()), Some("/tmp/out/app"));
    }

    #[test]
    fn test_no_session_files() {
        let args = build_args(&[], Path::new("app"));
        let args_str: Vec<&str> = args.iter().filter_map(|s| s.to_str()).collect();
        assert_eq!(args_str, vec!["app"]);
    }
}
