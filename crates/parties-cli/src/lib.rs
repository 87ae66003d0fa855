//! Parties CLI Library
//!
//! Line-oriented shell over a party session:
//! - `commands`: clap grammar of one shell line
//! - `roster`: names, connections and admin rights
//! - `handlers`: executes lines against the directory
//! - `texts`: player-facing messages

pub mod commands;
pub mod config;
pub mod handlers;
pub mod roster;
pub mod texts;

pub use config::load_config;
pub use handlers::{Output, Shell};

use parties_core::ConfigError;
use std::path::PathBuf;

/// CLI error types
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error in {path}: {source}")]
    Config {
        /// File being loaded
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ConfigError,
    },

    /// Script file could not be read
    #[error("Cannot read script {path}: {source}")]
    Script {
        /// Script path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}
