use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{BundleSource, ItineraryApp};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod script;

use config::load_settings;
use script::run_script;

/// Loads an itinerary bundle and drives the editor with a command script.
#[derive(Parser, Debug)]
#[command(name = "itinerary")]
struct Cli {
    /// JSON bundle with events, destinations and offers.
    #[arg(long)]
    data: Option<PathBuf>,
    /// Command script; read from stdin when absent.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Settings file; `itinerary.toml` in the working directory by default.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(path) = cli.data {
        settings.data_path = Some(path);
    }
    if let Some(path) = cli.script {
        settings.script_path = Some(path);
    }
    if let Some(filter) = cli.log_filter {
        settings.log_filter = filter;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let data_path = settings
        .data_path
        .context("no itinerary bundle configured; pass --data or set ITINERARY_DATA")?;
    let source = BundleSource::from_json_file(&data_path)?;

    let mut app = ItineraryApp::with_system_clock()?;
    app.load(&source)?;
    info!(path = %data_path.display(), "itinerary loaded");
    print!("{}", app.render_text());

    let script: Box<dyn BufRead> = match &settings.script_path {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };
    let summary = run_script(&mut app, script, &mut io::stdout())?;
    info!(
        executed = summary.executed,
        failed = summary.failed,
        "script finished"
    );
    Ok(())
}
