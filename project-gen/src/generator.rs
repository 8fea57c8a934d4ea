use crate::error::ProjectError;
use crate::exporter::{Exporter, GdbStartupExporter};
use crate::types::{GeneratedProject, ProjectData};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What the orchestrator needs from a project generator.
pub trait ProjectGenerator: Send + Sync {
    /// Generates the files `tool` needs to debug `data`.
    ///
    /// # Errors
    ///
    /// [`ProjectError::UnsupportedTool`] when `tool` is unknown, or an I/O
    /// error while writing.
    fn export(&self, data: &ProjectData, tool: &str) -> Result<GeneratedProject, ProjectError>;

    /// Adjusts `executable` so `tool` accepts it. Applying it twice gives the
    /// same path as applying it once.
    ///
    /// # Errors
    ///
    /// [`ProjectError::UnsupportedTool`] when `tool` is unknown, or an I/O
    /// error while inspecting the file.
    fn fixup_executable(&self, executable: &Path, tool: &str) -> Result<PathBuf, ProjectError>;

    /// Whether `tool` can debug `target` without extra definitions. Unknown
    /// tools never support anything.
    fn supports_target(&self, target: &str, tool: &str) -> bool;
}

/// Generator dispatching to one [`Exporter`] per tool name.
pub struct ExporterRegistry {
    exporters: BTreeMap<String, Box<dyn Exporter>>,
}

impl ExporterRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            exporters: BTreeMap::new(),
        }
    }

    /// The built-in exporters, pointing GDB at a server on `port`.
    #[must_use]
    pub fn builtin(port: u16) -> Self {
        let mut registry = Self::new();
        registry.register("gdb", GdbStartupExporter::generic(port));
        registry.register("arm_none_eabi_gdb", GdbStartupExporter::arm_none_eabi(port));
        registry
    }

    /// Registers `exporter` under `tool`, replacing any previous one.
    pub fn register(&mut self, tool: impl Into<String>, exporter: impl Exporter + 'static) {
        self.exporters.insert(tool.into(), Box::new(exporter));
    }

    /// Names of all registered tools, sorted.
    pub fn tools(&self) -> impl Iterator<Item = &str> {
        self.exporters.keys().map(String::as_str)
    }

    fn exporter(&self, tool: &str) -> Result<&dyn Exporter, ProjectError> {
        self.exporters
            .get(tool)
            .map(AsRef::as_ref)
            .ok_or_else(|| ProjectError::UnsupportedTool(tool.to_string()))
    }
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExporterRegistry")
            .field("tools", &self.exporters.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProjectGenerator for ExporterRegistry {
    fn export(&self, data: &ProjectData, tool: &str) -> Result<GeneratedProject, ProjectError> {
        self.exporter(tool)?.generate(data)
    }

    fn fixup_executable(&self, executable: &Path, tool: &str) -> Result<PathBuf, ProjectError> {
        self.exporter(tool)?.fixup_executable(executable)
    }

    fn supports_target(&self, target: &str, tool: &str) -> bool {
        self.exporter(tool)
            .is_ok_and(|exporter| exporter.supports_target(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_writes_startup_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let data = ProjectData::for_executable("myexe", "K64F", &out);

        let project = ExporterRegistry::builtin(4444).export(&data, "gdb").unwrap();

        let expected = out.join("myexe.gdbstartup");
        assert_eq!(project.path, out);
        assert_eq!(project.files, vec![expected.clone()]);
        let contents = std::fs::read_to_string(expected).unwrap();
        assert!(contents.contains("target remote localhost:4444"));
    }

    #[test]
    fn test_unknown_tool_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ExporterRegistry::builtin(3333);
        let data = ProjectData::for_executable("myexe", "K64F", dir.path());

        let err = registry.export(&data, "uvision").unwrap_err();
        assert!(matches!(err, ProjectError::UnsupportedTool(ref t) if t == "uvision"));
        assert!(!registry.supports_target("K64F", "uvision"));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_fixup_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let exe = dir.path().join("myexe");
        std::fs::write(&exe, b"elf").unwrap();
        let registry = ExporterRegistry::builtin(3333);

        let once = registry.fixup_executable(&exe, "gdb").unwrap();
        let twice = registry.fixup_executable(&once, "gdb").unwrap();
        assert_eq!(once, twice);
        assert!(once.is_absolute());
    }

    #[test]
    fn test_fixup_missing_executable_fails() {
        let registry = ExporterRegistry::builtin(3333);
        let err = registry
            .fixup_executable(Path::new("/nonexistent/myexe"), "gdb")
            .unwrap_err();
        assert!(matches!(err, ProjectError::Io { .. }));
    }

    #[test]
    fn test_builtin_tools() {
        let registry = ExporterRegistry::builtin(3333);
        let tools: Vec<&str> = registry.tools().collect();
        assert_eq!(tools, vec!["arm_none_eabi_gdb", "gdb"]);
        assert!(registry.supports_target("SOME_CUSTOM_BOARD", "gdb"));
        assert!(!registry.supports_target("SOME_CUSTOM_BOARD", "arm_none_eabi_gdb"));
    }
}
