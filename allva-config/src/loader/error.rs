//! Errors raised while loading configuration.

use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ConfigGuardRailError;

/// Reasons a configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// The config file exists but could not be read.
    #[error("failed to read config file {path}")]
    ReadFile {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`FileConfig`](crate::FileConfig).
    #[error("failed to parse config file {path}")]
    ParseToml {
        /// File that failed.
        path: PathBuf,
        /// Parser error with location.
        #[source]
        source: toml::de::Error,
    },

    /// A duration field is not in humantime syntax.
    #[error("invalid duration for {field}: {value:?}")]
    InvalidDuration {
        /// Config field or environment key.
        field: &'static str,
        /// Offending raw value.
        value: String,
        /// Parser error.
        #[source]
        source: humantime::DurationError,
    },

    /// An environment override is not an unsigned integer.
    #[error("invalid number for {key}: {value:?}")]
    InvalidNumber {
        /// Environment key.
        key: &'static str,
        /// Offending raw value.
        value: String,
        /// Parser error.
        #[source]
        source: std::num::ParseIntError,
    },

    /// The merged configuration broke a guard-rail.
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
}
