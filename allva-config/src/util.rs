//! Parsers shared by the file and environment layers.

use std::time::Duration;

use crate::ConfigLoadError;

/// Split a comma separated list, dropping blank entries.
pub fn parse_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

/// Parse a humantime duration such as `"60s"` or `"1m 30s"`.
pub fn parse_duration(
    field: &'static str,
    raw: &str,
) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw.trim()).map_err(|source| {
        ConfigLoadError::InvalidDuration {
            field,
            value: raw.to_string(),
            source,
        }
    })
}

/// Parse an unsigned integer override, naming `key` on failure.
pub fn parse_number<T>(
    key: &'static str,
    raw: &str,
) -> Result<T, ConfigLoadError>
where
    T: std::str::FromStr<Err = std::num::ParseIntError>,
{
    raw.trim()
        .parse::<T>()
        .map_err(|source| ConfigLoadError::InvalidNumber {
            key,
            value: raw.to_string(),
            source,
        })
}

/// Treat empty or whitespace-only values as unset.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
