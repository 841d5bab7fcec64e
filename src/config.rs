//! Converter configuration.
//!
//! [`ConversionConfig`] can be built in code (`ConversionConfig::default()`
//! plus the `with_*` setters) or loaded from `config/db2ice.toml` and
//! `DB2ICE__CONVERSION__*` environment variables with
//! [`ConversionConfig::load`].

use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use config::builder::DefaultState;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

const DEFAULT_CONFIG_FILE: &str = "config/db2ice.toml";
const ENV_PREFIX: &str = "DB2ICE";
const SECTION: &str = "conversion";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConversionConfig {
    /// Snowflake external volume written into `EXTERNAL_VOLUME = '...'`.
    #[serde(default = "default_external_volume")]
    pub external_volume: String,
    /// `BASE_LOCATION` pattern with `{schema}` and `{table}` placeholders.
    #[serde(default = "default_base_location_pattern")]
    pub base_location_pattern: String,
    /// Emit `--` documentation comments.
    #[serde(default = "default_true")]
    pub include_comments: bool,
    /// Emit inline EWI markers (and count them).
    #[serde(default = "default_true")]
    pub include_ewi: bool,
}

fn default_external_volume() -> String {
    "<EXTERNAL_VOLUME>".to_string()
}

fn default_base_location_pattern() -> String {
    "{schema}/{table}".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            external_volume: default_external_volume(),
            base_location_pattern: default_base_location_pattern(),
            include_comments: true,
            include_ewi: true,
        }
    }
}

impl ConversionConfig {
    /// Load from `config/db2ice.toml` (optional), then `DB2ICE__*` env vars.
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from an explicit TOML file, then `DB2ICE__*` env vars.
    ///
    /// A file that exists but cannot be read or parsed is logged and skipped;
    /// environment variables are still applied.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let builder = env_source(
            Config::builder().add_source(File::from(path).required(false)),
        );

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if path.exists() {
                    log::warn!(
                        "Failed to load config file {}, falling back to env: {}",
                        path.display(),
                        err
                    );
                }
                env_source(Config::builder()).build().map_err(|env_err| {
                    ConfigError::Message(format!(
                        "Failed to load configuration from file and env: {}, then env-only error: {}",
                        err, env_err
                    ))
                })?
            }
        };

        match settings.get::<ConversionConfig>(SECTION) {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Conversion configuration could not be loaded from file or environment: {}",
                e
            ))
            .into()),
        }
    }

    pub fn with_external_volume(mut self, volume: impl Into<String>) -> Self {
        self.external_volume = volume.into();
        self
    }

    pub fn with_base_location(mut self, pattern: impl Into<String>) -> Self {
        self.base_location_pattern = pattern.into();
        self
    }

    pub fn with_comments(mut self, include: bool) -> Self {
        self.include_comments = include;
        self
    }

    pub fn with_ewi(mut self, include: bool) -> Self {
        self.include_ewi = include;
        self
    }
}

fn env_source(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}
