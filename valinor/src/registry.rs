//! Tool detection and the cache of bound launchers.
//!
//! [`TOOL_REGISTRY`] pairs each tool with a detector and a launcher factory.
//! [`DetectionCache`] runs the detectors once, keeps a launcher for every
//! tool found and extends the preference order with tools it did not rank.

use crate::config::ToolPaths;
use crate::launcher::{LaunchSettings, ToolLauncher};
use crate::preference::PreferenceOrder;
use crate::tool::Tool;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};
use valinor_gdb::{discover_arm_none_eabi_gdb, discover_gdb, GdbCli};
use valinor_probe::PyOcdServer;
use valinor_uvision::{discover_uvision, UvisionCli};

/// How to find and launch one tool.
#[derive(Clone, Copy)]
pub struct ToolEntry {
    /// The tool.
    pub tool: Tool,
    /// Finds the tool's executable. Absence is `None`, never an error.
    pub detect: fn(&ToolPaths) -> Option<PathBuf>,
    /// Binds a launcher to a detected executable.
    pub launcher: fn(PathBuf, &LaunchSettings) -> ToolLauncher,
}

impl std::fmt::Debug for ToolEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolEntry")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}

/// Detectors and launchers for every known tool, in registry order.
pub const TOOL_REGISTRY: &[ToolEntry] = &[
    ToolEntry {
        tool: Tool::Uvision,
        detect: detect_uvision,
        launcher: uvision_launcher,
    },
    ToolEntry {
        tool: Tool::Gdb,
        detect: detect_gdb,
        launcher: gdb_launcher,
    },
    ToolEntry {
        tool: Tool::ArmNoneEabiGdb,
        detect: detect_arm_none_eabi_gdb,
        launcher: probe_gdb_launcher,
    },
];

fn detect_uvision(paths: &ToolPaths) -> Option<PathBuf> {
    discover_uvision(paths.uvision.clone()).ok()
}

fn detect_gdb(paths: &ToolPaths) -> Option<PathBuf> {
    discover_gdb(paths.gdb.clone()).ok()
}

fn detect_arm_none_eabi_gdb(paths: &ToolPaths) -> Option<PathBuf> {
    discover_arm_none_eabi_gdb(paths.arm_none_eabi_gdb.clone()).ok()
}

fn uvision_launcher(path: PathBuf, _settings: &LaunchSettings) -> ToolLauncher {
    ToolLauncher::Uvision(UvisionCli::new(path))
}

fn gdb_launcher(path: PathBuf, _settings: &LaunchSettings) -> ToolLauncher {
    ToolLauncher::Gdb(GdbCli::new(path))
}

fn probe_gdb_launcher(path: PathBuf, settings: &LaunchSettings) -> ToolLauncher {
    ToolLauncher::ProbeGdb {
        gdb: GdbCli::new(path),
        server: Arc::new(PyOcdServer::new(settings.pyocd.clone())),
        config: settings.server.clone(),
    }
}

/// Detected tools and their launchers.
///
/// Detection runs at most once until [`reset`](Self::reset) or
/// [`rescan`](Self::rescan) is called.
#[derive(Debug)]
pub struct DetectionCache {
    entries: Vec<ToolEntry>,
    paths: ToolPaths,
    settings: LaunchSettings,
    base_preference: PreferenceOrder,
    preference: PreferenceOrder,
    launchers: HashMap<Tool, ToolLauncher>,
    scanned: bool,
}

impl DetectionCache {
    /// Cache over [`TOOL_REGISTRY`].
    #[must_use]
    pub fn new(paths: ToolPaths, settings: LaunchSettings, preference: PreferenceOrder) -> Self {
        Self::with_entries(TOOL_REGISTRY.to_vec(), paths, settings, preference)
    }

    /// Cache over a custom set of entries.
    #[must_use]
    pub fn with_entries(
        entries: Vec<ToolEntry>,
        paths: ToolPaths,
        settings: LaunchSettings,
        preference: PreferenceOrder,
    ) -> Self {
        Self {
            entries,
            paths,
            settings,
            base_preference: preference.clone(),
            preference,
            launchers: HashMap::new(),
            scanned: false,
        }
    }

    /// Runs every detector unless that already happened.
    ///
    /// Detectors run concurrently on the blocking pool. Found tools missing
    /// from the preference order are appended in registry order.
    pub async fn ensure_scanned(&mut self) {
        if self.scanned {
            return;
        }

        let mut scans = JoinSet::new();
        for (index, entry) in self.entries.iter().enumerate() {
            let detect = entry.detect;
            let paths = self.paths.clone();
            scans.spawn_blocking(move || (index, detect(&paths)));
        }

        let mut found = Vec::new();
        while let Some(joined) = scans.join_next().await {
            match joined {
                Ok((index, Some(path))) => found.push((index, path)),
                Ok((index, None)) => {
                    debug!(tool = %self.entries[index].tool, "scanning... not found");
                }
                Err(e) => warn!(error = %e, "tool detector failed"),
            }
        }

        found.sort_by_key(|(index, _)| *index);
        for (index, path) in found {
            let entry = self.entries[index];
            debug!(tool = %entry.tool, path = %path.display(), "scanning... found");
            self.launchers
                .insert(entry.tool, (entry.launcher)(path, &self.settings));
            self.preference.extend_with(entry.tool);
        }
        self.scanned = true;
    }

    /// Forgets all detections and restores the configured preference.
    pub fn reset(&mut self) {
        self.launchers.clear();
        self.preference = self.base_preference.clone();
        self.scanned = false;
    }

    /// [`reset`](Self::reset) followed by a fresh scan.
    pub async fn rescan(&mut self) {
        self.reset();
        self.ensure_scanned().await;
    }

    /// Whether detection has run.
    #[must_use]
    pub const fn is_scanned(&self) -> bool {
        self.scanned
    }

    /// Detected tools, best first.
    #[must_use]
    pub fn available(&self) -> Vec<Tool> {
        self.preference
            .iter()
            .filter(|tool| self.launchers.contains_key(tool))
            .collect()
    }

    /// The launcher for `tool`, if it was detected.
    #[must_use]
    pub fn launcher(&self, tool: Tool) -> Option<&ToolLauncher> {
        self.launchers.get(&tool)
    }

    /// Current preference order, including appended tools.
    #[must_use]
    pub const fn preference_order(&self) -> &PreferenceOrder {
        &self.preference
    }
}
