use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process::ExitCode;

use chart_dashboard::api::{DashboardConfig, InputEvent};
use chart_dashboard::render::{JsonLinesRenderer, Renderer};
use chart_dashboard::telemetry::init_default_tracing;
use chart_dashboard::{DashboardError, DashboardResult};
use clap::Parser;
use tracing::{error, info, warn};

/// Serves a reactive chart dashboard over JSON lines.
///
/// Input events are read from stdin, one per line, e.g.
/// `{"input":"range_start","value":"2023-01-01"}`. Every recompute cycle
/// publishes the complete output set as one JSON line on stdout.
#[derive(Debug, Parser)]
#[command(name = "chart-dashboard", version, about, long_about = None)]
struct Cli {
    /// Dashboard config (JSON). Without it, generated sample data is served.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Publish the initial output set and exit.
    #[arg(long)]
    once: bool,
    /// Pretty-print published output sets.
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    let _ = init_default_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "dashboard stopped");
            eprintln!("chart-dashboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> DashboardResult<()> {
    let config = match &cli.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };
    let mut controller = config.start()?;
    info!(slots = controller.layout().len(), "dashboard started");

    let stdout = io::stdout();
    let mut renderer = JsonLinesRenderer::new(stdout.lock()).pretty(cli.pretty);
    renderer.render(controller.outputs())?;
    if cli.once {
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line
            .map_err(|e| DashboardError::InvalidData(format!("failed to read input event: {e}")))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: InputEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "ignoring malformed input event");
                continue;
            }
        };
        renderer.render(controller.handle(event))?;
    }

    info!(cycles = controller.cycles(), "input closed, shutting down");
    Ok(())
}
