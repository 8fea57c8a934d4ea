use crate::tool::Tool;
use serde::{Deserialize, Serialize};

/// Ranking of tools; earlier entries win during selection.
///
/// Tools are only ever appended, so the rank of a tool never improves once
/// the order has been extended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Tool>", into = "Vec<Tool>")]
pub struct PreferenceOrder(Vec<Tool>);

impl PreferenceOrder {
    /// Preference order from a list, dropping repeated entries.
    #[must_use]
    pub fn new(tools: impl IntoIterator<Item = Tool>) -> Self {
        let mut order = Self(Vec::new());
        for tool in tools {
            order.extend_with(tool);
        }
        order
    }

    /// Appends `tool` unless it is already ranked. Returns whether it was
    /// added.
    pub fn extend_with(&mut self, tool: Tool) -> bool {
        if self.0.contains(&tool) {
            return false;
        }
        self.0.push(tool);
        true
    }

    /// Rank of `tool`, lower is better.
    #[must_use]
    pub fn index_of(&self, tool: Tool) -> Option<usize> {
        self.0.iter().position(|t| *t == tool)
    }

    /// Ranked tools, best first.
    pub fn iter(&self) -> impl Iterator<Item = Tool> + '_ {
        self.0.iter().copied()
    }
}

impl From<Vec<Tool>> for PreferenceOrder {
    fn from(tools: Vec<Tool>) -> Self {
        Self::new(tools)
    }
}

impl From<PreferenceOrder> for Vec<Tool> {
    fn from(order: PreferenceOrder) -> Self {
        order.0
    }
}

impl Default for PreferenceOrder {
    /// IDEs first, then the probe-aware debugger, then a plain host `gdb`.
    fn default() -> Self {
        Self(vec![Tool::Uvision, Tool::ArmNoneEabiGdb, Tool::Gdb])
    }
}
