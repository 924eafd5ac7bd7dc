//! Shared configuration library for Allva.
//!
//! This crate owns the defaults for the login policy (attempt threshold,
//! lockout length, tick cadence), where preferences live on disk, the
//! authentication boundary timeouts and the localization catalogs. The
//! [`ConfigLoader`] composes built-in defaults, an optional TOML file and
//! environment overrides, then runs the guard-rails in [`validation`].

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, ConfigSource, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    AuthConfig, Config, LocalizationConfig, LoginPolicy, PreferencesConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
