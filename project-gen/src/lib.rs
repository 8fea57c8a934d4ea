//! # valinor-project
//!
//! The project-generation side of a debug session, as seen by the
//! orchestrator: a [`ProjectGenerator`] turns a [`ProjectData`] record into
//! files a given tool can open, adjusts the executable for that tool, and
//! answers whether a tool can handle a target at all.
//!
//! [`ExporterRegistry`] is the built-in generator. It knows the GDB family
//! (`gdb`, `arm_none_eabi_gdb`) and writes GDB command files; IDE project
//! formats are left to external generators implementing the same trait.
//!
//! ## Example
//!
//! ```no_run
//! # use valinor_project::{ExporterRegistry, ProjectData, ProjectGenerator};
//! # fn example() -> Result<(), valinor_project::ProjectError> {
//! let generator = ExporterRegistry::builtin(3333);
//! let data = ProjectData::for_executable("blinky", "K64F", "build/out");
//! let project = generator.export(&data, "arm_none_eabi_gdb")?;
//! for file in &project.files {
//!     println!("{}", file.display());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

/// User-supplied target definitions.
pub mod definitions;

/// Public error types.
pub mod error;

/// Per-tool exporters.
pub mod exporter;

/// The generator interface and the built-in registry.
pub mod generator;

/// Built-in table of known boards.
pub mod targets;

/// Project description and generation results.
pub mod types;

pub use definitions::{DefinitionFile, TargetDefinition, TargetDefinitions};
pub use error::ProjectError;
pub use exporter::{Exporter, GdbStartupExporter};
pub use generator::{ExporterRegistry, ProjectGenerator};
pub use types::{GeneratedProject, ProjectData};
