//! Driver configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::{session::SessionConfig, undo::AddReversalMode};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human readable events
    #[default]
    Compact,

    /// One JSON object per event
    Json,
}

/// Emporium configuration
#[derive(Debug, Parser)]
#[command(name = "emporium", about = "Retail ordering simulator", long_about = None)]
pub struct AppConfig {
    /// Fixture set to trade under; the built-in reference data is used when omitted
    #[arg(short, long, env = "EMPORIUM_FIXTURE_SET")]
    pub set: Option<String>,

    /// Base directory for fixture files
    #[arg(short, long, env = "EMPORIUM_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "EMPORIUM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// How undoing an add is applied
    #[arg(long, env = "EMPORIUM_UNDO_MODE", value_enum, default_value_t = AddReversalMode::RemoveLine)]
    pub undo_mode: AddReversalMode,

    /// Discard the undo history after each checkout
    #[arg(long, env = "EMPORIUM_CLEAR_UNDO_ON_CHECKOUT")]
    pub clear_undo_on_checkout: bool,

    /// Seed for delivery estimates; drawn from the OS when omitted
    #[arg(long, env = "EMPORIUM_SEED")]
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Session switches selected by the flags
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            add_reversal: self.undo_mode,
            clear_undo_on_checkout: self.clear_undo_on_checkout,
        }
    }
}
