//! Blockrelic headless simulation.
//!
//! Plays seeded runs against the scoring engine and prints a JSON summary.

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod player;
mod runner;

use config::SimConfig;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = SimConfig::load()?;
    info!("Starting Blockrelic simulation...");

    let summary = runner::run(&config)?;
    info!(seed = summary.seed, total_score = summary.total_score, "simulation finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
