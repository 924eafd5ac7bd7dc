//! Guard-rails run after every load.
//!
//! Hard errors reject values the login core cannot run with; warnings flag
//! values that work but are probably a mistake.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::Config;
use crate::constants::{DEFAULT_PASSWORD_MIN_LENGTH, MAX_LOCKOUT_DURATION};

/// Configuration the login core refuses to run with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigGuardRailError {
    /// Lockout threshold of zero.
    #[error("login.max_failed_attempts must be at least 1")]
    ZeroAttempts,
    /// Lockout with no ticks.
    #[error("login.lockout_ticks must be at least 1")]
    ZeroLockoutTicks,
    /// Countdown that never advances.
    #[error("login.tick_interval must be greater than zero")]
    ZeroTickInterval,
    /// Full lockout longer than [`MAX_LOCKOUT_DURATION`].
    #[error(
        "login.lockout_ticks x login.tick_interval must not exceed {max:?}"
    )]
    LockoutTooLong {
        /// Configured ceiling.
        max: Duration,
    },
    /// Empty passwords would pass local validation.
    #[error("login.password_min_length must be at least 1")]
    ZeroPasswordLength,
    /// Every authentication call would time out.
    #[error("auth.request_timeout must be greater than zero")]
    ZeroRequestTimeout,
    /// Empty language cycle.
    #[error("localization.languages must name at least one language")]
    NoLanguages,
}

/// Accepted but suspicious configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Countdown ticks faster than once per second.
    FastTick(Duration),
    /// Minimum password length below the recommended default.
    WeakPasswordLength(usize),
    /// A language appears twice in the cycle.
    DuplicateLanguage(String),
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FastTick(interval) => write!(
                f,
                "lockout tick interval {interval:?} is shorter than one second"
            ),
            Self::WeakPasswordLength(len) => write!(
                f,
                "password minimum length {len} is below the recommended {DEFAULT_PASSWORD_MIN_LENGTH}"
            ),
            Self::DuplicateLanguage(lang) => {
                write!(f, "language {lang:?} is listed more than once")
            }
        }
    }
}

/// Warnings collected by [`validate`], in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigWarnings(Vec<ConfigWarning>);

impl ConfigWarnings {
    /// True when nothing was flagged.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Warnings in check order.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.0.iter()
    }

    /// Whether `warning` was flagged.
    pub fn contains(&self, warning: &ConfigWarning) -> bool {
        self.0.contains(warning)
    }
}

/// Run every guard-rail; the first hard error wins.
pub fn validate(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let login = &config.login;
    if login.max_failed_attempts == 0 {
        return Err(ConfigGuardRailError::ZeroAttempts);
    }
    if login.lockout_ticks == 0 {
        return Err(ConfigGuardRailError::ZeroLockoutTicks);
    }
    if login.tick_interval.is_zero() {
        return Err(ConfigGuardRailError::ZeroTickInterval);
    }
    if login.lockout_duration() > MAX_LOCKOUT_DURATION {
        return Err(ConfigGuardRailError::LockoutTooLong {
            max: MAX_LOCKOUT_DURATION,
        });
    }
    if login.password_min_length == 0 {
        return Err(ConfigGuardRailError::ZeroPasswordLength);
    }
    if config.auth.request_timeout.is_zero() {
        return Err(ConfigGuardRailError::ZeroRequestTimeout);
    }
    if config.localization.languages.is_empty() {
        return Err(ConfigGuardRailError::NoLanguages);
    }

    let mut warnings = Vec::new();
    if login.tick_interval < Duration::from_secs(1) {
        warnings.push(ConfigWarning::FastTick(login.tick_interval));
    }
    if login.password_min_length < DEFAULT_PASSWORD_MIN_LENGTH {
        warnings.push(ConfigWarning::WeakPasswordLength(
            login.password_min_length,
        ));
    }
    let languages = &config.localization.languages;
    for (idx, lang) in languages.iter().enumerate() {
        if languages[..idx].contains(lang)
            && !warnings.contains(&ConfigWarning::DuplicateLanguage(lang.clone()))
        {
            warnings.push(ConfigWarning::DuplicateLanguage(lang.clone()));
        }
    }

    Ok(ConfigWarnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_without_warnings() {
        let warnings = validate(&Config::default()).expect("defaults valid");
        assert!(warnings.is_empty());
    }

    #[test]
    fn zero_ticks_are_rejected() {
        let mut config = Config::default();
        config.login.lockout_ticks = 0;
        assert_eq!(
            validate(&config),
            Err(ConfigGuardRailError::ZeroLockoutTicks)
        );
    }

    #[test]
    fn oversized_lockouts_are_rejected() {
        let mut config = Config::default();
        config.login.max_failed_attempts = 1;
        config.login.lockout_ticks = u32::MAX;
        config.login.tick_interval = Duration::from_secs(u64::MAX / 2);
        assert_eq!(
            validate(&config),
            Err(ConfigGuardRailError::LockoutTooLong {
                max: MAX_LOCKOUT_DURATION
            })
        );

        config.login.lockout_ticks = 24 * 60;
        config.login.tick_interval = Duration::from_secs(60);
        assert!(validate(&config).is_ok());

        config.login.lockout_ticks += 1;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn short_passwords_and_duplicates_warn() {
        let mut config = Config::default();
        config.login.password_min_length = 4;
        config.localization.languages =
            vec!["es".into(), "en".into(), "es".into()];
        let warnings = validate(&config).expect("valid");
        assert!(warnings.contains(&ConfigWarning::WeakPasswordLength(4)));
        assert!(
            warnings.contains(&ConfigWarning::DuplicateLanguage("es".into()))
        );
    }
}
