//! Ripcheck command-line front end
//!
//! Argument parsing, layered configuration, the text and image reporters and
//! the multi-file runner. The binary in `main.rs` only wires these together.
//!
//! This library exposes the components for testing purposes.

pub mod cli;
pub mod config;
pub mod error;
pub mod image;
pub mod runner;
pub mod template;
pub mod text;

pub use cli::Cli;
pub use config::RipcheckConfig;
pub use error::{CliError, Result};
pub use image::{ImageOptions, ImageReporter};
pub use runner::{run, RunSummary, Source};
pub use template::FilenameTemplate;
pub use text::TextReporter;

use ripcheck_core::ScanSettings;

/// Final settings for an invocation: configuration sources, then flags
pub fn resolve_settings(cli: &Cli) -> Result<ScanSettings> {
    let mut config = RipcheckConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config.scan);
    config.validate()?;
    Ok(config.scan)
}
