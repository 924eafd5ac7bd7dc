//! Composes defaults, an optional TOML file and environment overrides.
//!
//! Precedence, lowest to highest: built-in defaults, the config file, then
//! environment variables. The file is taken from the explicit loader path,
//! else `$ALLVA_CONFIG`, else `<config dir>/allva.toml` if it exists.

pub mod error;

use std::path::{Path, PathBuf};

use crate::constants::{
    ENV_LOCKOUT_TICKS, ENV_MAX_FAILED_ATTEMPTS, ENV_PASSWORD_MIN_LENGTH,
};
use crate::models::default_config_file;
use crate::models::sources::{EnvConfig, FileConfig};
use crate::util::{parse_csv, parse_duration, parse_number};
use crate::validation::{ConfigWarnings, validate};
use crate::Config;

use error::ConfigLoadError;

/// Where the file layer of a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// No config file was found; defaults plus environment only.
    Defaults,
    /// Values were read from this file.
    File(PathBuf),
}

/// Result of a successful load.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    /// Merged and validated configuration.
    pub config: Config,
    /// Where the file layer came from.
    pub source: ConfigSource,
    /// Soft problems worth logging.
    pub warnings: ConfigWarnings,
}

/// Builder for one configuration load.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    env: Option<EnvConfig>,
}

impl ConfigLoader {
    /// Loader that searches for the file and reads the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this file instead of searching; it must exist.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use these overrides instead of the process environment. `.env` files
    /// are not consulted when overrides are supplied.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = Some(env);
        self
    }

    /// Merge every layer and run the guard-rails.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env = match &self.env {
            Some(env) => env.clone(),
            None => {
                load_dotenv();
                EnvConfig::from_env()
            }
        };

        let (file, source) = self.read_file_layer(&env)?;

        let mut config = Config::default();
        apply_file(&mut config, &file)?;
        apply_env(&mut config, &env)?;

        let warnings = validate(&config)?;
        for warning in warnings.iter() {
            log::warn!("[Config] {warning}");
        }
        log::debug!("[Config] Loaded configuration from {source:?}");

        Ok(ConfigLoad {
            config,
            source,
            warnings,
        })
    }

    fn read_file_layer(
        &self,
        env: &EnvConfig,
    ) -> Result<(FileConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) =
            self.config_path.as_ref().or(env.config_path.as_ref())
        {
            let file = read_file_config(path)?;
            return Ok((file, ConfigSource::File(path.clone())));
        }

        let fallback = default_config_file();
        if fallback.is_file() {
            let file = read_file_config(&fallback)?;
            return Ok((file, ConfigSource::File(fallback)));
        }

        Ok((FileConfig::default(), ConfigSource::Defaults))
    }
}

fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        log::warn!("[Config] Ignoring unreadable .env file: {err}");
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| {
        ConfigLoadError::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    toml::from_str(&raw).map_err(|source| ConfigLoadError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_file(
    config: &mut Config,
    file: &FileConfig,
) -> Result<(), ConfigLoadError> {
    let login = &file.login;
    if let Some(value) = login.max_failed_attempts {
        config.login.max_failed_attempts = value;
    }
    if let Some(value) = login.lockout_ticks {
        config.login.lockout_ticks = value;
    }
    if let Some(raw) = &login.tick_interval {
        config.login.tick_interval = parse_duration("login.tick_interval", raw)?;
    }
    if let Some(value) = login.password_min_length {
        config.login.password_min_length = value;
    }

    if let Some(path) = &file.preferences.path {
        config.preferences.path = path.clone();
    }

    if let Some(raw) = &file.auth.request_timeout {
        config.auth.request_timeout =
            parse_duration("auth.request_timeout", raw)?;
    }
    if let Some(raw) = &file.auth.simulated_latency {
        config.auth.simulated_latency =
            parse_duration("auth.simulated_latency", raw)?;
    }

    if let Some(dir) = &file.localization.catalog_dir {
        config.localization.catalog_dir = Some(dir.clone());
    }
    if let Some(languages) = &file.localization.languages {
        config.localization.languages = languages
            .iter()
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .collect();
    }

    Ok(())
}

fn apply_env(
    config: &mut Config,
    env: &EnvConfig,
) -> Result<(), ConfigLoadError> {
    if let Some(raw) = &env.max_failed_attempts {
        config.login.max_failed_attempts =
            parse_number(ENV_MAX_FAILED_ATTEMPTS, raw)?;
    }
    if let Some(raw) = &env.lockout_ticks {
        config.login.lockout_ticks = parse_number(ENV_LOCKOUT_TICKS, raw)?;
    }
    if let Some(raw) = &env.lockout_tick_interval {
        config.login.tick_interval = parse_duration("login.tick_interval", raw)?;
    }
    if let Some(raw) = &env.password_min_length {
        config.login.password_min_length =
            parse_number(ENV_PASSWORD_MIN_LENGTH, raw)?;
    }
    if let Some(path) = &env.preferences_path {
        config.preferences.path = path.clone();
    }
    if let Some(raw) = &env.auth_timeout {
        config.auth.request_timeout =
            parse_duration("auth.request_timeout", raw)?;
    }
    if let Some(raw) = &env.auth_latency {
        config.auth.simulated_latency =
            parse_duration("auth.simulated_latency", raw)?;
    }
    if let Some(dir) = &env.localization_dir {
        config.localization.catalog_dir = Some(dir.clone());
    }
    if let Some(raw) = &env.languages {
        config.localization.languages = parse_csv(raw);
    }
    Ok(())
}
