//! CLI error type.

use std::path::PathBuf;

use intentfetch::intent::ConfigError;
use thiserror::Error;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad command-line input or configuration key.
    #[error("{0}")]
    Config(String),

    /// The configuration file or a resolved setting is unusable.
    #[error("Configuration error: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The scenario file could not be read.
    #[error("Failed to read scenario {path}: {source}")]
    ScenarioRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scenario file is not a valid scenario.
    #[error("Invalid scenario {path}: {source}")]
    ScenarioParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
