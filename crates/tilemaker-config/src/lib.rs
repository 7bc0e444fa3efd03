//! Configuration for the tile atlas builder.
//!
//! Settings persist to disk as a RON file with per-section defaults, so old
//! files keep loading as fields are added. Command-line arguments parsed with
//! clap override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, InputConfig, OutputConfig, ProcessingConfig,
};
pub use error::ConfigError;
