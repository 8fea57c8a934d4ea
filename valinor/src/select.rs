use crate::preference::PreferenceOrder;
use crate::tool::Tool;
use valinor_project::{ProjectGenerator, TargetDefinitions};

/// Picks the tool to debug a target with.
///
/// A tool qualifies when the generator supports the target for it, or when
/// the target definitions say files can be generated for it. The qualifying
/// tool ranked best by the preference order wins; unranked tools never do.
#[derive(Clone, Copy)]
pub struct Selector<'a> {
    generator: &'a dyn ProjectGenerator,
    definitions: &'a dyn TargetDefinitions,
}

impl<'a> Selector<'a> {
    /// Selector over a generator and a definitions source.
    #[must_use]
    pub const fn new(generator: &'a dyn ProjectGenerator, definitions: &'a dyn TargetDefinitions) -> Self {
        Self {
            generator,
            definitions,
        }
    }

    /// Whether `tool` can debug `target`.
    #[must_use]
    pub fn qualifies(&self, tool: Tool, target: &str) -> bool {
        self.generator.supports_target(target, tool.as_str())
            || self.definitions.can_generate(target, tool.as_str())
    }

    /// Best detected tool for `target`, or `None` if none qualifies.
    #[must_use]
    pub fn select(
        &self,
        detected: &[Tool],
        target: &str,
        preference: &PreferenceOrder,
    ) -> Option<Tool> {
        detected
            .iter()
            .copied()
            .filter(|tool| self.qualifies(*tool, target))
            .filter_map(|tool| preference.index_of(tool).map(|rank| (rank, tool)))
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, tool)| tool)
    }
}
