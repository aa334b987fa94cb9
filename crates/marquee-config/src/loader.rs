//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use marquee_core::{MarqueeError, MarqueeResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable selecting the environment-specific config file.
pub const ENVIRONMENT_VAR: &str = "MARQUEE_ENVIRONMENT";

/// Prefix of environment variable overrides (`MARQUEE__CACHE__URL`).
pub const ENV_PREFIX: &str = "MARQUEE";

/// Loads [`AppConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a loader reading files from `config_dir`.
    ///
    /// Configuration is loaded from these sources, later ones overriding
    /// earlier ones:
    /// 1. `{config_dir}/default.toml`
    /// 2. `{config_dir}/{environment}.toml`
    /// 3. `{config_dir}/local.toml` (not committed to version control)
    /// 4. Environment variables with the `MARQUEE__` prefix
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Creates a loader for the default location (`./config`).
    #[must_use]
    pub fn from_default_location() -> Self {
        Self::new("./config")
    }

    /// Loads and validates the configuration.
    ///
    /// A `.env` file in the working directory is applied to the process
    /// environment first.
    pub fn load(&self) -> MarqueeResult<AppConfig> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var(ENVIRONMENT_VAR).unwrap_or_else(|_| "development".to_string());
        self.load_for(&environment)
    }

    /// Loads and validates the configuration for a named environment.
    pub fn load_for(&self, environment: &str) -> MarqueeResult<AppConfig> {
        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();
        for name in ["default", environment, "local"] {
            let path = self.config_dir.join(format!("{name}.toml"));
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path.as_path()).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error)?;

        app_config.app.environment = environment.to_string();

        ConfigValidator::validate(&app_config)
            .map_err(|errors| MarqueeError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }

    /// Returns the directory files are read from.
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

fn config_error(err: ConfigError) -> MarqueeError {
    MarqueeError::Configuration(err.to_string())
}
