//! # Canvas CLI
//!
//! Runs canvas scripts from the command line.

use canvas_cli::{run, CliArgs, CliConfig};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing on stderr so stdout carries only the console.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_cli=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Use JSON format when RUST_LOG_FORMAT=json
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);
    tracing::debug!("Running {} source(s)", config.sources.len());

    let report = run(&config, |line| println!("{line}")).await?;

    tracing::info!(
        "Ran {} script(s), {} faulted, {} shape(s) on canvas",
        report.executed,
        report.failed,
        report.state.shapes().len()
    );
    Ok(())
}
