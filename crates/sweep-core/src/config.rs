//! Configuration loading and typed config structures for the Sweep simulation.
//!
//! The canonical configuration lives in `sweep-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty file (or no file at all) yields
//! the classic 4x4 setup.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Deserialize;
use sweep_types::{AgentKind, Position};
use sweep_world::GridEnvironment;
use sweep_world::WorldError;
use sweep_world::generation::validate_probability;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but its values are unusable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `sweep-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World shape, dirt, obstacles, and seed.
    #[serde(default)]
    pub world: WorldConfig,

    /// Per-episode boundaries.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Trials and agent kinds to compare.
    #[serde(default)]
    pub experiment: ExperimentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SWEEP_SEED` overrides `world.seed`
    /// - `SWEEP_TRIALS` overrides `experiment.trials`
    /// - `SWEEP_MAX_STEPS` overrides `simulation.max_steps`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override is not a number.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying the same
    /// environment overrides as [`from_file`](Self::from_file).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if an override is not a number.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `SWEEP_*` environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a set variable does not parse.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("SWEEP_SEED") {
            self.world.seed = parse_override("SWEEP_SEED", &val)?;
        }
        if let Some(val) = lookup("SWEEP_TRIALS") {
            self.experiment.trials = parse_override("SWEEP_TRIALS", &val)?;
        }
        if let Some(val) = lookup("SWEEP_MAX_STEPS") {
            self.simulation.max_steps = parse_override("SWEEP_MAX_STEPS", &val)?;
        }
        Ok(())
    }

    /// Check that the configuration describes a runnable experiment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for zero dimensions, probabilities
    /// outside `[0, 1]`, an unparsable layout, an obstacle on the start
    /// cell, zero steps, zero trials, or an empty agent list.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        if self.simulation.max_steps == 0 {
            return Err(invalid("simulation.max_steps must be greater than 0"));
        }
        if self.experiment.trials == 0 {
            return Err(invalid("experiment.trials must be greater than 0"));
        }
        if self.experiment.agents.is_empty() {
            return Err(invalid("experiment.agents must name at least one agent kind"));
        }
        Ok(())
    }
}

/// World construction settings.
///
/// When `layout` is set it wins over the random generator, and the
/// dimensions and probabilities are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Number of columns.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Number of rows.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Chance that a cell starts dirty.
    #[serde(default = "default_dirt_probability")]
    pub dirt_probability: f64,

    /// Chance that a cell is an obstacle.
    #[serde(default = "default_obstacle_probability")]
    pub obstacle_probability: f64,

    /// Base seed. Trial `i` uses `seed + i`.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Optional ASCII layout (`.` clean, `*` dirty, `#` obstacle).
    #[serde(default)]
    pub layout: Option<String>,

    /// Extra obstacles placed after generation or parsing.
    #[serde(default)]
    pub obstacles: Vec<Position>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            dirt_probability: default_dirt_probability(),
            obstacle_probability: default_obstacle_probability(),
            seed: default_seed(),
            layout: None,
            obstacles: Vec::new(),
        }
    }
}

impl WorldConfig {
    /// Build the world for one trial.
    ///
    /// A fixed layout ignores `seed`. Otherwise the world is generated
    /// from a [`SmallRng`] seeded with `seed`, so equal seeds give equal
    /// worlds.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError`] if the layout does not parse, the generator
    /// rejects the parameters, or an extra obstacle is out of bounds or on
    /// the start cell.
    pub fn build(&self, seed: u64) -> Result<GridEnvironment, WorldError> {
        let mut env = match &self.layout {
            Some(text) => GridEnvironment::from_layout(text)?,
            None => {
                let mut rng = SmallRng::seed_from_u64(seed);
                GridEnvironment::generate(
                    self.width,
                    self.height,
                    self.dirt_probability,
                    self.obstacle_probability,
                    &mut rng,
                )?
            }
        };
        for &pos in &self.obstacles {
            env.set_obstacle(pos, true)?;
        }
        Ok(env)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(text) = &self.layout {
            GridEnvironment::from_layout(text).map_err(|e| invalid(&e.to_string()))?;
        } else {
            if self.width == 0 || self.height == 0 {
                return Err(invalid(&format!(
                    "world dimensions must be positive, got {}x{}",
                    self.width, self.height
                )));
            }
            validate_probability("dirt_probability", self.dirt_probability)
                .and_then(|()| {
                    validate_probability("obstacle_probability", self.obstacle_probability)
                })
                .map_err(|e| invalid(&e.to_string()))?;
        }
        if self.obstacles.contains(&GridEnvironment::START) {
            return Err(invalid("world.obstacles must not include the start cell (0, 0)"));
        }
        Ok(())
    }
}

/// Per-episode boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Hard cap on steps per episode.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,

    /// Real-time pause between steps, 0 for none.
    #[serde(default)]
    pub step_interval_ms: u64,

    /// End the episode as soon as no dirt remains.
    #[serde(default)]
    pub stop_when_clean: bool,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            step_interval_ms: 0,
            stop_when_clean: false,
        }
    }
}

/// Experiment comparison settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExperimentConfig {
    /// Number of seeded trials.
    #[serde(default = "default_trials")]
    pub trials: u32,

    /// Agent kinds to run in every trial, in report order.
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentKind>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            agents: default_agents(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn parse_override<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| invalid(&format!("{key}={value:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_width() -> u32 {
    4
}

const fn default_height() -> u32 {
    4
}

const fn default_dirt_probability() -> f64 {
    0.3
}

const fn default_obstacle_probability() -> f64 {
    0.15
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_steps() -> u64 {
    1000
}

const fn default_trials() -> u32 {
    10
}

fn default_agents() -> Vec<AgentKind> {
    vec![AgentKind::Reactive, AgentKind::ModelBased]
}

fn default_log_level() -> String {
    String::from("info")
}
