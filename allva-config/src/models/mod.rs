//! Effective configuration handed to the runtime once loading finishes.

pub mod sources;

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::constants::{
    APP_NAME, APP_ORGANIZATION, CONFIG_FILE, DEFAULT_AUTH_TIMEOUT,
    DEFAULT_LANGUAGES, DEFAULT_LOCKOUT_TICKS, DEFAULT_MAX_FAILED_ATTEMPTS,
    DEFAULT_PASSWORD_MIN_LENGTH, DEFAULT_SIMULATED_LATENCY,
    DEFAULT_TICK_INTERVAL, PREFERENCES_FILE,
};

/// Rules applied to every login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginPolicy {
    /// Consecutive password-incorrect failures before the form locks.
    pub max_failed_attempts: u32,
    /// Number of countdown ticks a lockout lasts.
    pub lockout_ticks: u32,
    /// Time between two countdown ticks.
    pub tick_interval: Duration,
    /// Shortest password accepted before the network is touched.
    pub password_min_length: usize,
}

impl Default for LoginPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: DEFAULT_MAX_FAILED_ATTEMPTS,
            lockout_ticks: DEFAULT_LOCKOUT_TICKS,
            tick_interval: DEFAULT_TICK_INTERVAL,
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }
}

impl LoginPolicy {
    /// Wall-clock length of a full lockout, saturating at `Duration::MAX`.
    pub fn lockout_duration(&self) -> Duration {
        self.tick_interval
            .checked_mul(self.lockout_ticks)
            .unwrap_or(Duration::MAX)
    }

    /// Attempts left before a lockout, given the current failure count.
    pub fn remaining_attempts(&self, failed_count: u32) -> u32 {
        self.max_failed_attempts.saturating_sub(failed_count)
    }
}

/// Where the preference store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferencesConfig {
    /// Flat `key=value` file backing the preference store.
    pub path: PathBuf,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_config_dir().join(PREFERENCES_FILE),
        }
    }
}

/// Settings for the authentication collaborator boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Upper bound on a single login or recovery call.
    pub request_timeout: Duration,
    /// Artificial delay used by the simulated client.
    pub simulated_latency: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_AUTH_TIMEOUT,
            simulated_latency: DEFAULT_SIMULATED_LATENCY,
        }
    }
}

/// Message catalogs and the language cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationConfig {
    /// Directory holding `<lang>.lang` catalogs. `None` means messages are
    /// rendered as their keys.
    pub catalog_dir: Option<PathBuf>,
    /// Languages cycled by the toggle; the first one is active at startup.
    pub languages: Vec<String>,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            catalog_dir: None,
            languages: DEFAULT_LANGUAGES
                .iter()
                .map(|lang| lang.to_string())
                .collect(),
        }
    }
}

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Attempt threshold, lockout length and password rules.
    pub login: LoginPolicy,
    /// Preference store location.
    pub preferences: PreferencesConfig,
    /// Authentication boundary timings.
    pub auth: AuthConfig,
    /// Message catalogs.
    pub localization: LocalizationConfig,
}

/// Per-user configuration directory, falling back to the working directory
/// when the platform exposes none.
pub fn default_config_dir() -> PathBuf {
    match ProjectDirs::from("", APP_ORGANIZATION, APP_NAME) {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => {
            log::warn!(
                "[Config] Unable to determine config directory, using working directory"
            );
            PathBuf::from(".")
        }
    }
}

/// `allva.toml` inside [`default_config_dir`].
pub fn default_config_file() -> PathBuf {
    default_config_dir().join(CONFIG_FILE)
}
