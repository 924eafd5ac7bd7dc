//! Failure taxonomy reported by the remote authentication service.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reason code attached to a rejected login.
///
/// Unknown or missing codes collapse into [`LoginFailureReason::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoginFailureReason {
    /// No user with that number.
    UserNotFound,
    /// Wrong password; counts towards the lockout threshold.
    PasswordIncorrect,
    /// The server has blocked the account.
    UserBlocked,
    /// Office code unknown to the server.
    InvalidOffice,
    /// User exists but may not sign in to that office.
    NoOfficePermission,
    /// The user's company is disabled.
    CompanyInactive,
    /// This device is not allowed to sign in.
    DeviceUnauthorized,
    /// Anything else, including unknown codes.
    #[serde(other)]
    Generic,
}

impl LoginFailureReason {
    /// Every reason, in wire-code order.
    pub const ALL: [Self; 8] = [
        Self::UserNotFound,
        Self::PasswordIncorrect,
        Self::UserBlocked,
        Self::InvalidOffice,
        Self::NoOfficePermission,
        Self::CompanyInactive,
        Self::DeviceUnauthorized,
        Self::Generic,
    ];

    /// Wire code as sent by the server.
    pub fn as_code(self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::PasswordIncorrect => "PASSWORD_INCORRECT",
            Self::UserBlocked => "USER_BLOCKED",
            Self::InvalidOffice => "INVALID_OFFICE",
            Self::NoOfficePermission => "NO_OFFICE_PERMISSION",
            Self::CompanyInactive => "COMPANY_INACTIVE",
            Self::DeviceUnauthorized => "DEVICE_UNAUTHORIZED",
            Self::Generic => "GENERIC",
        }
    }

    /// Parse a wire code case-insensitively. Missing or unknown codes yield
    /// [`LoginFailureReason::Generic`].
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code.map(str::trim) else {
            return Self::Generic;
        };
        Self::ALL
            .into_iter()
            .find(|reason| reason.as_code().eq_ignore_ascii_case(code))
            .unwrap_or(Self::Generic)
    }
}

impl fmt::Display for LoginFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A login the server understood and refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("login rejected: {reason}")]
pub struct LoginFailure {
    /// Why the server refused.
    pub reason: LoginFailureReason,
    /// Free-form text from the server, kept for logs only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LoginFailure {
    /// Failure with no server detail.
    pub fn new(reason: LoginFailureReason) -> Self {
        Self {
            reason,
            detail: None,
        }
    }

    /// Attach the server's free-form text.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<LoginFailureReason> for LoginFailure {
    fn from(reason: LoginFailureReason) -> Self {
        Self::new(reason)
    }
}

/// A password recovery request the server could not honour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password recovery failed: {detail}")]
pub struct RecoveryFailure {
    /// What the server said, for logs.
    pub detail: String,
}

impl RecoveryFailure {
    /// Failure carrying the service's explanation.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_reasons() {
        for reason in LoginFailureReason::ALL {
            assert_eq!(
                LoginFailureReason::from_code(Some(reason.as_code())),
                reason
            );
        }
        assert_eq!(
            LoginFailureReason::from_code(Some(" password_incorrect ")),
            LoginFailureReason::PasswordIncorrect
        );
    }

    #[test]
    fn unknown_or_missing_codes_fall_back_to_generic() {
        assert_eq!(
            LoginFailureReason::from_code(Some("SOMETHING_NEW")),
            LoginFailureReason::Generic
        );
        assert_eq!(
            LoginFailureReason::from_code(None),
            LoginFailureReason::Generic
        );
    }
}
