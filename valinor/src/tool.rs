use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A debugging front-end valinor knows how to detect and launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Keil uVision IDE.
    Uvision,
    /// A host `gdb`.
    Gdb,
    /// `arm-none-eabi-gdb` talking to a pyOCD GDB server.
    ArmNoneEabiGdb,
}

impl Tool {
    /// Every tool, in registry order.
    pub const ALL: [Self; 3] = [Self::Uvision, Self::Gdb, Self::ArmNoneEabiGdb];

    /// Stable identifier, as used on the command line and by project
    /// generators.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uvision => "uvision",
            Self::Gdb => "gdb",
            Self::ArmNoneEabiGdb => "arm_none_eabi_gdb",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a tool identifier valinor does not know.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown debug tool '{0}'")]
pub struct UnknownTool(pub String);

impl FromStr for Tool {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| UnknownTool(s.to_string()))
    }
}
