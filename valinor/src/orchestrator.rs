use crate::config::Config;
use crate::errors::Error;
use crate::launcher::{LaunchSettings, Launcher};
use crate::registry::DetectionCache;
use crate::select::Selector;
use crate::tool::Tool;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use valinor_probe::CancelToken;
use valinor_project::{
    DefinitionFile, ExporterRegistry, GeneratedProject, ProjectData, ProjectGenerator,
    TargetDefinitions,
};

/// One debug request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    /// Executable to debug.
    pub executable: PathBuf,
    /// Target board.
    pub target: String,
    /// Tool to use instead of selecting one.
    pub tool: Option<String>,
    /// Where to write generated files; defaults to the executable's
    /// directory.
    pub output_dir: Option<PathBuf>,
}

/// Files generated for a request, ready to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedSession {
    /// Tool the files were generated for.
    pub tool: String,
    /// Generated files.
    pub project: GeneratedProject,
    /// Executable as adjusted for the tool.
    pub executable: PathBuf,
}

/// Ties detection, selection, generation and launching together.
pub struct Orchestrator {
    generator: Box<dyn ProjectGenerator>,
    definitions: Box<dyn TargetDefinitions>,
    cache: DetectionCache,
}

impl Orchestrator {
    /// Orchestrator using the built-in generator and the configured tools.
    ///
    /// # Errors
    /// Returns an error if the configured definitions file cannot be loaded.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let definitions = match &config.definitions {
            Some(path) => DefinitionFile::load(path)?,
            None => DefinitionFile::default(),
        };
        let settings = LaunchSettings {
            server: config.server_config(),
            pyocd: config.paths.pyocd.clone(),
        };
        let generator = ExporterRegistry::builtin(settings.server.port);
        let cache = DetectionCache::new(config.paths.clone(), settings, config.preference.clone());
        Ok(Self::new(Box::new(generator), Box::new(definitions), cache))
    }

    /// Orchestrator from its parts.
    #[must_use]
    pub fn new(
        generator: Box<dyn ProjectGenerator>,
        definitions: Box<dyn TargetDefinitions>,
        cache: DetectionCache,
    ) -> Self {
        Self {
            generator,
            definitions,
            cache,
        }
    }

    /// Picks the tool for `target` among the detected ones.
    ///
    /// # Errors
    /// [`Error::NoToolSelected`] if no detected tool qualifies.
    pub async fn select_tool(&mut self, target: &str) -> Result<Tool, Error> {
        self.cache.ensure_scanned().await;
        let available = self.cache.available();
        debug!(?available, target, "selecting debug tool");

        let selector = Selector::new(self.generator.as_ref(), self.definitions.as_ref());
        selector
            .select(&available, target, self.cache.preference_order())
            .ok_or_else(|| Error::NoToolSelected {
                target: target.to_string(),
            })
    }

    /// Generates the debug files for `request`.
    ///
    /// Nothing is written when the executable does not exist.
    ///
    /// # Errors
    /// * [`Error::ExecutableMissing`] if the executable is not a file.
    /// * [`Error::NoToolSelected`] if no tool was given and none qualifies.
    /// * [`Error::Project`] if the generator rejects the tool or fails.
    /// * [`Error::NoProjectFiles`] if nothing was generated.
    pub async fn prepare(&mut self, request: &SessionRequest) -> Result<PreparedSession, Error> {
        if !request.executable.is_file() {
            return Err(Error::ExecutableMissing(request.executable.clone()));
        }

        let tool = match &request.tool {
            Some(tool) => tool.clone(),
            None => self.select_tool(&request.target).await?.to_string(),
        };
        info!(%tool, target = %request.target, "generating debug files");

        let data = self.project_data(request);
        let project = self.generator.export(&data, &tool)?;
        if project.files.is_empty() {
            return Err(Error::NoProjectFiles { tool });
        }
        let executable = self.generator.fixup_executable(&request.executable, &tool)?;

        Ok(PreparedSession {
            tool,
            project,
            executable,
        })
    }

    /// Opens a debug session on prepared files.
    ///
    /// The generated files are kept whatever the outcome.
    ///
    /// # Errors
    /// * [`Error::UnknownTool`] if valinor has no launcher for the tool id.
    /// * [`Error::ToolNotFound`] if the tool is not installed.
    /// * [`Error::Launch`] if the session fails or is cancelled.
    pub async fn launch(
        &mut self,
        prepared: &PreparedSession,
        cancel: &CancelToken,
    ) -> Result<(), Error> {
        let tool: Tool = prepared.tool.parse()?;
        self.cache.ensure_scanned().await;

        let launcher = self.cache.launcher(tool).ok_or(Error::ToolNotFound(tool))?;
        info!(%tool, files = prepared.project.files.len(), "opening debug session");
        launcher
            .run(&prepared.project.files, &prepared.executable, cancel)
            .await?;
        Ok(())
    }

    fn project_data(&self, request: &SessionRequest) -> ProjectData {
        let name = request
            .executable
            .file_stem()
            .map_or_else(|| "debug".to_string(), |stem| stem.to_string_lossy().into_owned());
        let output_dir = request
            .output_dir
            .clone()
            .unwrap_or_else(|| executable_dir(&request.executable));

        let mut data = ProjectData::for_executable(name, request.target.clone(), output_dir);
        data.core = self.definitions.core(&request.target).unwrap_or_default();
        data
    }
}

fn executable_dir(executable: &Path) -> PathBuf {
    match executable.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
