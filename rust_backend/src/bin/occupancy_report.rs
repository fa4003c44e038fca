//! Occupancy Report Binary
//!
//! Runs the utilization pipeline over one occupancy CSV file and writes the
//! utilization table, forecast store, run report and summary insights.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin occupancy-report -- class_utilization.csv reports/
//! ```
//!
//! # Environment Variables
//!
//! - `ANALYTICS_CONFIG`: Path to an `analytics.toml` (default: searched in the
//!   standard locations, then built-in defaults)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use classroom_analytics::{AnalyticsConfig, AnalyticsPipeline};

fn load_config() -> anyhow::Result<AnalyticsConfig> {
    if let Ok(path) = env::var("ANALYTICS_CONFIG") {
        info!("Using configuration from {}", path);
        return AnalyticsConfig::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path));
    }

    match AnalyticsConfig::from_default_location() {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("{}; using built-in defaults", e);
            Ok(AnalyticsConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let mut args = env::args().skip(1);
    let Some(input) = args.next().map(PathBuf::from) else {
        bail!("usage: occupancy-report <input.csv> [output_dir]");
    };
    let output_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("output"));

    let config = load_config()?;
    info!(
        "Normalization mode {:?}, forecast horizon {} days",
        config.normalization.mode, config.forecast.horizon
    );
    let pipeline = Arc::new(AnalyticsPipeline::new(config).context("Invalid configuration")?);

    let bytes = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;

    // Parsing and normalization are CPU-bound
    let loaded = tokio::task::spawn_blocking({
        let pipeline = Arc::clone(&pipeline);
        move || pipeline.load_bytes(&bytes)
    })
    .await
    .context("Load task panicked")?
    .with_context(|| format!("Failed to load {}", input.display()))?;

    let output = pipeline
        .analyze_async(&loaded)
        .await
        .context("Analysis failed")?;

    write_outputs(&output, &output_dir)?;

    let report = output.run_report();
    info!(
        "Done: {} rooms, {} forecast, {} skipped, {} rejected rows",
        report.room_count,
        report.forecast_rooms.len(),
        report.skipped_rooms.len(),
        report.rejected.len()
    );
    for skipped in &report.skipped_rooms {
        info!("  room {}: {}", skipped.room_id, skipped.reason);
    }

    Ok(())
}

fn write_outputs(output: &classroom_analytics::PipelineOutput, dir: &Path) -> anyhow::Result<()> {
    output
        .write_to_dir(dir)
        .with_context(|| format!("Failed to write outputs to {}", dir.display()))?;
    info!("Outputs written to {}", dir.display());
    Ok(())
}
