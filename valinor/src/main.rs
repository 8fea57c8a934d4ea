//! The valinor binary: generates debug files for an executable and opens a
//! debug session on them.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use valinor::{Config, Error, Orchestrator, SessionRequest};
use valinor_probe::cancel_pair;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug tool (IDE) to generate for. If omitted, one is selected among
    /// the tools installed on this system
    #[arg(short, long)]
    tool: Option<String>,

    /// Directory for the generated files (default: the executable's directory)
    #[arg(short = 'd', long)]
    output_dir: Option<PathBuf>,

    /// Only generate the files and print them, do not open the debug session
    #[arg(short, long)]
    no_open: bool,

    /// Target board to debug, e.g. K64F
    #[arg(long)]
    target: String,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Executable to debug
    executable: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match &e {
                Error::Launch(launch) if launch.is_cancelled() => info!("debug session cancelled"),
                Error::Launch(_) | Error::ToolNotFound(_) | Error::UnknownTool(_) => {
                    error!("failed to open IDE: {e}; the generated files were kept");
                }
                _ => error!("{e}"),
            }
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = Config::load(cli.config.as_deref())?;
    let mut orchestrator = Orchestrator::from_config(&config)?;

    let request = SessionRequest {
        executable: cli.executable,
        target: cli.target,
        tool: cli.tool,
        output_dir: cli.output_dir,
    };
    let prepared = orchestrator.prepare(&request).await?;
    for file in &prepared.project.files {
        println!("{}", file.display());
    }
    if cli.no_open {
        return Ok(());
    }

    // Once this listener exists, Ctrl-C no longer terminates valinor; it only
    // cancels the phases valinor waits on itself.
    let (handle, cancel) = cancel_pair();
    let interrupts = tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });

    let result = orchestrator.launch(&prepared, &cancel).await;
    interrupts.abort();
    result
}
