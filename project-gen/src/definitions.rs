use crate::error::ProjectError;
use crate::targets::core_for;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Per-target knowledge beyond what the exporters have built in.
pub trait TargetDefinitions: Send + Sync {
    /// CPU core of `target`, if known.
    fn core(&self, target: &str) -> Option<String>;

    /// Whether the definitions explicitly allow generating for `tool` on
    /// `target`.
    fn can_generate(&self, target: &str, tool: &str) -> bool;
}

/// One target entry of a definitions file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetDefinition {
    /// CPU core, e.g. `cortex-m4f`.
    pub core: Option<String>,
    /// Tools able to debug this target.
    pub tools: Vec<String>,
}

/// Target definitions loaded from JSON.
///
/// ```json
/// { "targets": { "MY_BOARD": { "core": "cortex-m4f", "tools": ["gdb"] } } }
/// ```
///
/// Board names match case-insensitively. The default value knows only the
/// built-in boards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitionFile {
    /// Definitions keyed by board name.
    pub targets: BTreeMap<String, TargetDefinition>,
}

impl DefinitionFile {
    /// Parses definitions from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the parse error.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads definitions from `path`.
    ///
    /// # Errors
    ///
    /// [`ProjectError::Io`] when the file cannot be read,
    /// [`ProjectError::Definitions`] when it is not valid.
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let json = std::fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| ProjectError::Definitions {
            path: path.to_path_buf(),
            source,
        })
    }

    fn lookup(&self, target: &str) -> Option<&TargetDefinition> {
        self.targets
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(target))
            .map(|(_, def)| def)
    }
}

impl TargetDefinitions for DefinitionFile {
    fn core(&self, target: &str) -> Option<String> {
        self.lookup(target)
            .and_then(|def| def.core.clone())
            .or_else(|| core_for(target).map(str::to_string))
    }

    fn can_generate(&self, target: &str, tool: &str) -> bool {
        self.lookup(target)
            .is_some_and(|def| def.tools.iter().any(|t| t == tool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "targets": {
            "MY_BOARD": { "core": "cortex-m7", "tools": ["uvision", "gdb"] },
            "K64F": { "tools": ["uvision"] }
        }
    }"#;

    #[test]
    fn test_parse_and_lookup() {
        let defs = DefinitionFile::from_json(SAMPLE).unwrap();
        assert_eq!(defs.core("my_board").as_deref(), Some("cortex-m7"));
        assert!(defs.can_generate("MY_BOARD", "uvision"));
        assert!(!defs.can_generate("MY_BOARD", "arm_none_eabi_gdb"));
        assert!(!defs.can_generate("UNKNOWN", "gdb"));
    }

    #[test]
    fn test_core_falls_back_to_builtin_table() {
        let defs = DefinitionFile::from_json(SAMPLE).unwrap();
        assert_eq!(defs.core("K64F").as_deref(), Some("cortex-m4f"));
        assert_eq!(DefinitionFile::default().core("lpc1768").as_deref(), Some("cortex-m3"));
        assert_eq!(DefinitionFile::default().core("UNKNOWN"), None);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = DefinitionFile::load(&path).unwrap_err();
        assert!(matches!(err, ProjectError::Definitions { .. }));

        let err = DefinitionFile::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ProjectError::Io { .. }));
    }
}
