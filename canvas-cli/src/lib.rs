//! # Canvas CLI
//!
//! Command-line host for the canvas script harness.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p canvas-cli -- drawing.rhai --svg out.svg
//! cargo run -p canvas-cli -- --eval 'DrawCircle(50, 50, 20, "red", true);' --png out.png
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved sources, export targets and harness limits
//! - `run` - Executes every source against one shared canvas, streaming the
//!   console to a sink, then writes the requested exports

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::Context;
use canvas_core::{CanvasState, CanvasStore};
use canvas_renderer::{ExportConfig, ExportFormat, SceneExporter};
use canvas_script::{
    CanvasBridge, ConsoleMessage, HarnessConfig, LogChange, MessageLog, ScriptError,
    ScriptHarness, Severity,
};
use clap::Parser;

/// Command-line arguments for canvas-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-cli")]
#[command(about = "Run canvas scripts and export the drawing")]
#[command(version)]
pub struct CliArgs {
    /// Script files to run, in order
    #[arg(value_name = "SCRIPT")]
    pub scripts: Vec<PathBuf>,

    /// Inline code, run after the script files
    #[arg(long, short = 'e', value_name = "CODE")]
    pub eval: Option<String>,

    /// Write the canvas as SVG
    #[arg(long, value_name = "PATH")]
    pub svg: Option<PathBuf>,

    /// Write the canvas as PNG
    #[arg(long, value_name = "PATH")]
    pub png: Option<PathBuf>,

    /// Write the canvas state as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// PNG scale factor
    #[arg(long, default_value = "1.0")]
    pub scale: f32,

    /// Show harness debug lines in the console
    #[arg(long)]
    pub debug: bool,

    /// Abort a script after this many interpreter operations
    #[arg(long, env = "CANVAS_MAX_OPERATIONS")]
    pub max_operations: Option<u64>,

    /// Base URL for fault help links
    #[arg(long, env = "CANVAS_HELP_URL")]
    pub help_url: Option<String>,
}

/// One unit of script input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// A script file on disk.
    File(PathBuf),
    /// Code given on the command line.
    Inline(String),
}

impl ScriptSource {
    /// Human-readable name for diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline(_) => "--eval".to_string(),
        }
    }

    /// Read the source text.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn load(&self) -> anyhow::Result<String> {
        match self {
            Self::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read script {}", path.display())),
            Self::Inline(code) => Ok(code.clone()),
        }
    }
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Sources in execution order.
    pub sources: Vec<ScriptSource>,
    /// SVG output path.
    pub svg: Option<PathBuf>,
    /// PNG output path.
    pub png: Option<PathBuf>,
    /// JSON state output path.
    pub json: Option<PathBuf>,
    /// PNG scale factor.
    pub scale: f32,
    /// Whether debug console lines are printed.
    pub show_debug: bool,
    /// Harness limits.
    pub harness: HarnessConfig,
}

impl From<&CliArgs> for HarnessConfig {
    fn from(args: &CliArgs) -> Self {
        let mut config = HarnessConfig::default();
        if let Some(max) = args.max_operations {
            config = config.with_max_operations(max);
        }
        if let Some(url) = &args.help_url {
            config = config.with_help_url(url.as_str());
        }
        config
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let harness = HarnessConfig::from(&args);
        let mut sources: Vec<ScriptSource> =
            args.scripts.into_iter().map(ScriptSource::File).collect();
        if let Some(code) = args.eval {
            sources.push(ScriptSource::Inline(code));
        }
        Self {
            sources,
            svg: args.svg,
            png: args.png,
            json: args.json,
            scale: args.scale,
            show_debug: args.debug,
            harness,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Sources that were executed.
    pub executed: usize,
    /// Executions that ended in a fault.
    pub failed: usize,
    /// Final canvas.
    pub state: CanvasState,
}

/// Render a console message as one output line.
#[must_use]
pub fn format_message(message: &ConsoleMessage) -> String {
    format!("[{}] {}", message.severity, message.text)
}

/// Run every source in `config` against a fresh canvas.
///
/// Console lines are passed to `sink` as they are appended. Script faults are
/// console output, not errors.
///
/// # Errors
///
/// Returns an error if no source was given, a script file cannot be read, or
/// an export cannot be written.
pub async fn run<F>(config: &CliConfig, sink: F) -> anyhow::Result<RunReport>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    if config.sources.is_empty() {
        anyhow::bail!("No script given: pass a SCRIPT file or --eval CODE");
    }
    let loaded = config
        .sources
        .iter()
        .map(|source| Ok((source.label(), source.load()?)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let store = CanvasStore::new();
    let log = MessageLog::new();
    let show_debug = config.show_debug;
    let subscription = log.subscribe(move |change| {
        if let LogChange::Appended { message, .. } = change {
            if show_debug || message.severity != Severity::Debug {
                sink(&format_message(message));
            }
        }
    });

    let harness = ScriptHarness::new(
        CanvasBridge::attached(store.clone()),
        log.clone(),
        config.harness.clone(),
    );

    let mut executed = 0;
    let mut failed = 0;
    for (label, source) in loaded {
        tracing::debug!("Running {label}");
        match harness.execute(&source).await {
            Ok(outcome) => {
                executed += 1;
                if !outcome.is_success() {
                    failed += 1;
                }
            }
            Err(ScriptError::EmptySource) => tracing::warn!("Skipping {label}: no code"),
            Err(err) => return Err(err).with_context(|| format!("Failed to run {label}")),
        }
    }
    log.unsubscribe(subscription);

    let state = store.snapshot();
    write_exports(config, &state)?;

    Ok(RunReport {
        executed,
        failed,
        state,
    })
}

/// Write the exports requested in `config`.
///
/// # Errors
///
/// Returns an error if rendering fails or a file cannot be written.
pub fn write_exports(config: &CliConfig, state: &CanvasState) -> anyhow::Result<()> {
    let exporter = SceneExporter::new(ExportConfig {
        scale: config.scale,
        ..ExportConfig::default()
    });

    if let Some(path) = &config.svg {
        write_file(path, &exporter.export(state, ExportFormat::Svg)?)?;
    }
    if let Some(path) = &config.png {
        write_file(path, &exporter.export(state, ExportFormat::Png)?)?;
    }
    if let Some(path) = &config.json {
        let json = serde_json::to_vec_pretty(state).context("Failed to serialize canvas")?;
        write_file(path, &json)?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
