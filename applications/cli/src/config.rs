//! Layered configuration
//!
//! Sources, lowest priority first: built-in defaults, a TOML file, environment
//! variables prefixed with `RIPCHECK_`, and finally command-line flags (applied
//! by [`crate::cli::Cli::apply`]).
//!
//! ```toml
//! [scan]
//! intro_length = "2s"
//! pop_limit = "40%"
//! min_dupes = 300
//! ```
//!
//! The same keys can be set as `RIPCHECK_SCAN__INTRO_LENGTH=2s`.
use crate::error::{CliError, Result};
use ripcheck_core::ScanSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "ripcheck.toml";

pub const ENV_PREFIX: &str = "RIPCHECK";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RipcheckConfig {
    #[serde(default)]
    pub scan: ScanSettings,
}

impl RipcheckConfig {
    /// Load from `path` (or `ripcheck.toml` if present) and the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, environment())
    }

    /// Load with an explicit environment source
    pub fn load_with_env(path: Option<&Path>, env: config::Environment) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading configuration file");
                settings = settings.add_source(
                    config::File::new(&path.to_string_lossy(), config::FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    debug!("loading {}", DEFAULT_CONFIG_FILE);
                    settings = settings.add_source(
                        config::File::new(DEFAULT_CONFIG_FILE, config::FileFormat::Toml),
                    );
                }
            }
        }

        let config = settings.add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Reject settings the scanner cannot work with
    pub fn validate(&self) -> Result<()> {
        validate_settings(&self.scan)
    }
}

/// Environment source for `RIPCHECK_<SECTION>__<KEY>` variables
pub fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

pub fn validate_settings(settings: &ScanSettings) -> Result<()> {
    if settings.min_dupes <= 1 {
        return Err(CliError::InvalidSetting {
            option: "--min-dupes",
            reason: format!("{} (must be at least 2)", settings.min_dupes),
        });
    }
    if settings.max_bad_areas == Some(0) {
        return Err(CliError::InvalidSetting {
            option: "--max-bad-areas",
            reason: "0 (must be at least 1)".to_string(),
        });
    }
    Ok(())
}
