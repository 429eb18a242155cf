//! # cdt-config
//!
//! Layered configuration loading for cdoctest using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CDOCTEST_*` prefix, `__` as separator)
//! 2. Project-level `.cdoctest/config.toml`
//! 3. User-level `~/.config/cdoctest/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CDOCTEST_REPL__BINARY` -> `repl.binary`,
//! `CDOCTEST_RUN__FAILURE_POLICY` -> `run.failure_policy`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cdt_config::CdtConfig;
//!
//! let config = CdtConfig::load_with_dotenv().expect("config");
//! println!("interpreter: {}", config.repl.binary);
//! ```

mod error;
mod parse;
mod repl;
mod run;

pub use error::ConfigError;
pub use parse::ParseConfig;
pub use repl::ReplConfig;
pub use run::RunConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local config file, relative to the working directory.
pub const LOCAL_CONFIG_PATH: &str = ".cdoctest/config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CdtConfig {
    #[serde(default)]
    pub repl: ReplConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub parse: ParseConfig,
}

impl CdtConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`load_with_dotenv`](Self::load_with_dotenv)
    /// for `.env` support.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Figment`] for unreadable or mistyped sources,
    /// [`ConfigError::InvalidValue`] when validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support from the working directory.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load).
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        // A missing .env is the common case.
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment, e.g. one with CLI
    /// overrides merged on top.
    ///
    /// # Errors
    ///
    /// As [`load`](Self::load).
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("CDOCTEST_").split("__"))
    }

    /// Path to the user-global config file.
    #[must_use]
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cdoctest").join("config.toml"))
    }

    /// Reject values no run could work with.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.marker.trim().is_empty() {
            return Err(invalid("run.marker", "must not be empty"));
        }
        if self.run.header_ext.trim().is_empty() {
            return Err(invalid("run.header_ext", "must not be empty"));
        }
        if self.repl.binary.trim().is_empty() {
            return Err(invalid("repl.binary", "must not be empty"));
        }
        if self.repl.statement_timeout_secs == 0 {
            return Err(invalid("repl.statement_timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
