//! Experiment runner binary for the Sweep simulation.
//!
//! This is the main entry point that wires together configuration, world
//! generation, the agents, and the episode runner. It loads
//! configuration, runs every configured agent kind on the same seeded
//! worlds, and logs a comparison.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `sweep-config.yaml` (or the path given as
//!    the first argument), falling back to defaults if the file is absent
//! 2. Initialize structured logging (tracing), `RUST_LOG` first, then
//!    `logging.level`
//! 3. Validate the configuration
//! 4. Run the experiment
//! 5. Log the per-agent summaries and the full report

mod error;
mod trace_callback;

use std::path::{Path, PathBuf};

use sweep_core::config::SimulationConfig;
use sweep_core::experiment;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::trace_callback::TraceCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "sweep-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration loading, validation, or the
/// experiment itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration (before logging, which depends on it).
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("sweep-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        width = config.world.width,
        height = config.world.height,
        layout = config.world.layout.is_some(),
        seed = config.world.seed,
        trials = config.experiment.trials,
        max_steps = config.simulation.max_steps,
        "Experiment parameters"
    );

    // 3. Validate.
    config.validate().map_err(EngineError::from)?;

    // 4. Run the experiment.
    let mut callback = TraceCallback::new();
    let report = experiment::run_experiment(&config, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 5. Log the result.
    info!(
        episodes = report.episodes.len(),
        total_steps = callback.steps_seen(),
        "Experiment complete"
    );
    let json = serde_json::to_string(&report).map_err(EngineError::from)?;
    debug!(report = %json, "Full report");

    Ok(())
}

/// Load configuration from `path`.
///
/// If the file does not exist, defaults are used. The returned flag says
/// whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides()?;
        Ok((config, false))
    }
}
