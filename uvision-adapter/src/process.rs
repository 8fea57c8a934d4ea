//! Launching uVision on a generated project.

use crate::error::UvisionError;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

const PROJECT_EXTENSIONS: &[&str] = &["uvproj", "uvprojx"];

/// Picks the uVision project out of a list of generated files.
///
/// # Errors
/// Returns `UvisionError::ProjectFileCount` unless exactly one file has a
/// `.uvproj` or `.uvprojx` extension.
pub fn select_project_file(project_files: &[PathBuf]) -> Result<&Path, UvisionError> {
    let projects: Vec<&Path> = project_files
        .iter()
        .map(PathBuf::as_path)
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| PROJECT_EXTENSIONS.contains(&e))
        })
        .collect();

    match projects.as_slice() {
        [project] => Ok(*project),
        other => Err(UvisionError::ProjectFileCount(other.len())),
    }
}

/// Opens uVision on the project found in `project_files` and waits for it to
/// close.
///
/// # Errors
/// Returns a [`UvisionError`] if no single project is found, the IDE cannot
/// be spawned, or it exits unsuccessfully.
pub async fn run_uvision(path: &Path, project_files: &[PathBuf]) -> Result<(), UvisionError> {
    let project = select_project_file(project_files)?;
    debug!(uvision = %path.display(), project = %project.display(), "launching uVision");

    let status = Command::new(path)
        .arg(project)
        .status()
        .await
        .map_err(|e| UvisionError::SpawnFailed {
            stage: "spawn".to_string(),
            source: e,
        })?;

    if status.success() {
        info!("uVision closed");
        Ok(())
    } else {
        Err(UvisionError::NonZeroExit {
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_project_is_selected() {
        let files = vec![
            PathBuf::from("out/app.uvopt"),
            PathBuf::from("out/app.uvprojx"),
            PathBuf::from("out/app.gdbstartup"),
        ];
        assert_eq!(
            select_project_file(&files).unwrap(),
            Path::new("out/app.uvprojx")
        );
    }

    #[test]
    fn test_legacy_project_extension_is_accepted() {
        let files = vec![PathBuf::from("app.uvproj")];
        assert_eq!(select_project_file(&files).unwrap(), Path::new("app.uvproj"));
    }

    #[test]
    fn test_no_project_is_rejected() {
        let files = vec![PathBuf::from("app.gdbstartup")];
        assert!(matches!(
            select_project_file(&files),
            Err(UvisionError::ProjectFileCount(0))
        ));
    }

    #[test]
    fn test_two_projects_are_rejected() {
        let files = vec![PathBuf::from("a.uvproj"), PathBuf::from("b.uvprojx")];
        assert!(matches!(
            select_project_file(&files),
            Err(UvisionError::ProjectFileCount(2))
        ));
    }
}
