//! Built-in defaults and the names of every recognised environment key.

use std::time::Duration;

/// Consecutive password-incorrect failures that trigger a lockout.
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;
/// Countdown ticks in a lockout (15 one-minute ticks).
pub const DEFAULT_LOCKOUT_TICKS: u32 = 15;
/// Time between lockout countdown ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(60);
/// Shortest password sent to the server, in characters.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;
/// Longest lockout the guard-rails accept.
pub const MAX_LOCKOUT_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

/// Deadline for one authentication call.
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(30);
/// Artificial delay of the offline authentication client.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// First entry is the language active at startup.
pub const DEFAULT_LANGUAGES: &[&str] = &["es", "en"];

/// Organisation segment of the platform config dir.
pub const APP_ORGANIZATION: &str = "allva";
/// Application segment of the platform config dir.
pub const APP_NAME: &str = "allva-desktop";
/// File name of the preference store inside the config dir.
pub const PREFERENCES_FILE: &str = "preferences.dat";
/// File name searched for inside the config dir.
pub const CONFIG_FILE: &str = "allva.toml";

/// Explicit path of the TOML config file.
pub const ENV_CONFIG_PATH: &str = "ALLVA_CONFIG";
/// Overrides `login.max_failed_attempts`.
pub const ENV_MAX_FAILED_ATTEMPTS: &str = "ALLVA_MAX_FAILED_ATTEMPTS";
/// Overrides `login.lockout_ticks`.
pub const ENV_LOCKOUT_TICKS: &str = "ALLVA_LOCKOUT_TICKS";
/// Overrides `login.tick_interval`; humantime syntax.
pub const ENV_LOCKOUT_TICK_INTERVAL: &str = "ALLVA_LOCKOUT_TICK_INTERVAL";
/// Overrides `login.password_min_length`.
pub const ENV_PASSWORD_MIN_LENGTH: &str = "ALLVA_PASSWORD_MIN_LENGTH";
/// Overrides `preferences.path`.
pub const ENV_PREFERENCES_PATH: &str = "ALLVA_PREFERENCES_PATH";
/// Overrides `auth.request_timeout`.
pub const ENV_AUTH_TIMEOUT: &str = "ALLVA_AUTH_TIMEOUT";
/// Overrides `auth.simulated_latency`.
pub const ENV_AUTH_LATENCY: &str = "ALLVA_AUTH_LATENCY";
/// Overrides `localization.catalog_dir`.
pub const ENV_LOCALIZATION_DIR: &str = "ALLVA_LOCALIZATION_DIR";
/// Comma-separated language cycle, e.g. `es,en`.
pub const ENV_LANGUAGES: &str = "ALLVA_LANGUAGES";

/// Every environment key the loader reads.
pub const MANAGED_KEYS: &[&str] = &[
    ENV_CONFIG_PATH,
    ENV_MAX_FAILED_ATTEMPTS,
    ENV_LOCKOUT_TICKS,
    ENV_LOCKOUT_TICK_INTERVAL,
    ENV_PASSWORD_MIN_LENGTH,
    ENV_PREFERENCES_PATH,
    ENV_AUTH_TIMEOUT,
    ENV_AUTH_LATENCY,
    ENV_LOCALIZATION_DIR,
    ENV_LANGUAGES,
];
