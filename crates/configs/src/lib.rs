//! # configs
//!
//! Typed configuration for the Inkwell binary.
//!
//! Sources, later ones overriding earlier ones:
//! 1. built-in defaults (the `Default` impls below)
//! 2. `inkwell.toml` in the working directory, if present
//! 3. environment variables prefixed `INKWELL__`, sections separated by `__`
//!    (e.g. `INKWELL__LOG__FORMAT=json`, `INKWELL__BURST__WORKERS=16`)
//!
//! A `.env` file is loaded into the environment first.

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const FILE_STEM: &str = "inkwell";
const ENV_PREFIX: &str = "INKWELL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log: LogConfig,
    pub seed: SeedConfig,
    pub burst: BurstConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// An `EnvFilter` directive; `RUST_LOG` wins when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Sample data created at start-up.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub users: usize,
    pub posts: usize,
    pub comments_per_post: usize,
    pub replies_per_comment: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            users: 8,
            posts: 3,
            comments_per_post: 4,
            replies_per_comment: 2,
        }
    }
}

/// The concurrent engagement burst run against the seeded data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Threads issuing like/unlike/toggle calls at once
    pub workers: usize,
    /// Operations per worker
    pub rounds: usize,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self { workers: 8, rounds: 200 }
    }
}

impl AppConfig {
    /// Loads `.env`, `inkwell.toml` and `INKWELL__*` variables over the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => debug!(error = %err, "ignoring unreadable .env"),
        }

        let settings = Config::builder()
            .add_source(File::with_name(FILE_STEM).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::finish(settings)
    }

    /// Parses a TOML document over the defaults, without touching the
    /// environment.
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seed.users == 0 {
            return Err(ConfigError::Invalid("seed.users must be at least 1".into()));
        }
        if self.burst.workers == 0 {
            return Err(ConfigError::Invalid("burst.workers must be at least 1".into()));
        }
        Ok(())
    }
}
