//! Raw configuration layers before they are merged into [`Config`].
//!
//! [`Config`]: crate::Config

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    ENV_AUTH_LATENCY, ENV_AUTH_TIMEOUT, ENV_CONFIG_PATH, ENV_LANGUAGES,
    ENV_LOCALIZATION_DIR, ENV_LOCKOUT_TICK_INTERVAL, ENV_LOCKOUT_TICKS,
    ENV_MAX_FAILED_ATTEMPTS, ENV_PASSWORD_MIN_LENGTH, ENV_PREFERENCES_PATH,
    MANAGED_KEYS,
};
use crate::util::non_blank;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    /// `[login]` table.
    #[serde(default)]
    pub login: FileLoginConfig,
    /// `[preferences]` table.
    #[serde(default)]
    pub preferences: FilePreferencesConfig,
    /// `[auth]` table.
    #[serde(default)]
    pub auth: FileAuthConfig,
    /// `[localization]` table.
    #[serde(default)]
    pub localization: FileLocalizationConfig,
}

/// `[login]` as written in the file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLoginConfig {
    /// See [`LoginPolicy::max_failed_attempts`](crate::LoginPolicy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_failed_attempts: Option<u32>,
    /// See [`LoginPolicy::lockout_ticks`](crate::LoginPolicy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockout_ticks: Option<u32>,
    /// Humantime string, e.g. `"60s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<String>,
    /// See [`LoginPolicy::password_min_length`](crate::LoginPolicy).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_min_length: Option<usize>,
}

/// `[preferences]` as written in the file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FilePreferencesConfig {
    /// Preference file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// `[auth]` as written in the file. Durations use humantime syntax.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    /// Deadline for one authentication call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
    /// Delay of the offline client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulated_latency: Option<String>,
}

/// `[localization]` as written in the file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileLocalizationConfig {
    /// Directory of `<lang>.lang` catalogs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_dir: Option<PathBuf>,
    /// Language cycle, first entry active.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
}

/// Raw environment overrides. Blank values count as unset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    /// `ALLVA_CONFIG`
    pub config_path: Option<PathBuf>,
    /// `ALLVA_MAX_FAILED_ATTEMPTS`
    pub max_failed_attempts: Option<String>,
    /// `ALLVA_LOCKOUT_TICKS`
    pub lockout_ticks: Option<String>,
    /// `ALLVA_LOCKOUT_TICK_INTERVAL`
    pub lockout_tick_interval: Option<String>,
    /// `ALLVA_PASSWORD_MIN_LENGTH`
    pub password_min_length: Option<String>,
    /// `ALLVA_PREFERENCES_PATH`
    pub preferences_path: Option<PathBuf>,
    /// `ALLVA_AUTH_TIMEOUT`
    pub auth_timeout: Option<String>,
    /// `ALLVA_AUTH_LATENCY`
    pub auth_latency: Option<String>,
    /// `ALLVA_LOCALIZATION_DIR`
    pub localization_dir: Option<PathBuf>,
    /// `ALLVA_LANGUAGES`
    pub languages: Option<String>,
}

impl EnvConfig {
    /// Snapshot the managed keys from the process environment.
    pub fn from_env() -> Self {
        Self::from_pairs(
            MANAGED_KEYS
                .iter()
                .filter_map(|key| std::env::var(key).ok().map(|v| (*key, v))),
        )
    }

    /// Build from explicit key/value pairs; unknown keys are ignored.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();
        let mut take = |key: &str| non_blank(map.remove(key));

        Self {
            config_path: take(ENV_CONFIG_PATH).map(PathBuf::from),
            max_failed_attempts: take(ENV_MAX_FAILED_ATTEMPTS),
            lockout_ticks: take(ENV_LOCKOUT_TICKS),
            lockout_tick_interval: take(ENV_LOCKOUT_TICK_INTERVAL),
            password_min_length: take(ENV_PASSWORD_MIN_LENGTH),
            preferences_path: take(ENV_PREFERENCES_PATH).map(PathBuf::from),
            auth_timeout: take(ENV_AUTH_TIMEOUT),
            auth_latency: take(ENV_AUTH_LATENCY),
            localization_dir: take(ENV_LOCALIZATION_DIR).map(PathBuf::from),
            languages: take(ENV_LANGUAGES),
        }
    }
}
