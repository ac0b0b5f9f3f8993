//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and experiment execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: sweep_core::config::ConfigError,
    },

    /// The experiment failed.
    #[error("experiment error: {source}")]
    Experiment {
        /// The underlying experiment error.
        #[from]
        source: sweep_core::experiment::ExperimentError,
    },

    /// The final report could not be serialized.
    #[error("report serialization failed: {source}")]
    Report {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}
