use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Description of the project to generate.
///
/// When only debugging a prebuilt executable, everything except the name,
/// target and output directory is usually empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectData {
    /// Project name; generated files are named after it.
    pub name: String,
    /// CPU core, e.g. `cortex-m4f`. Empty when unknown.
    pub core: String,
    /// Linker command file.
    pub linker_file: Option<PathBuf>,
    /// Include search paths.
    pub include_paths: Vec<PathBuf>,
    /// Source search paths.
    pub source_paths: Vec<PathBuf>,
    /// C sources.
    pub source_files_c: Vec<PathBuf>,
    /// C++ sources.
    pub source_files_cpp: Vec<PathBuf>,
    /// Assembly sources.
    pub source_files_s: Vec<PathBuf>,
    /// Object files.
    pub source_files_obj: Vec<PathBuf>,
    /// Libraries.
    pub source_files_lib: Vec<PathBuf>,
    /// Preprocessor definitions.
    pub macros: Vec<String>,
    /// Directory generated files are written to.
    pub output_dir: PathBuf,
    /// Board being debugged, e.g. `K64F`.
    pub target: String,
}

impl ProjectData {
    /// Project data for debugging an existing executable: no sources, no
    /// build settings.
    #[must_use]
    pub fn for_executable(
        name: impl Into<String>,
        target: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }
}

/// Files produced by an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedProject {
    /// Directory holding the generated project.
    pub path: PathBuf,
    /// Every generated file, in the order a tool should consume them.
    pub files: Vec<PathBuf>,
}
