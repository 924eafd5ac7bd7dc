//! Authentication error types
//!
//! Errors raised by the collaborator boundary ([`AuthClientError`]) and
//! errors reported by the controller to its caller ([`LoginError`],
//! [`RecoveryError`]). Controller errors carry the localized text that was
//! also placed in the message area.

use std::time::Duration;

use allva_model::{LoginFailure, LoginFailureReason};
use thiserror::Error;

use crate::localization::MessageKey;

/// Failure returned by an [`AuthClient`](super::AuthClient) login call.
#[derive(Debug, Error)]
pub enum AuthClientError {
    /// The service answered and refused the credentials
    #[error(transparent)]
    Rejected(#[from] LoginFailure),

    /// The service could not be reached or the call blew up
    #[error("authentication service unreachable: {0}")]
    Transport(#[source] anyhow::Error),

    /// The service did not answer in time
    #[error("authentication service did not answer within {0:?}")]
    Timeout(Duration),
}

/// Local form validation, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// User number blank after trimming.
    #[error("user number is required")]
    UserRequired,

    /// Password empty.
    #[error("password is required")]
    PasswordRequired,

    /// Password shorter than the policy minimum.
    #[error("password must be at least {min} characters")]
    PasswordMinLength {
        /// Policy minimum, in characters.
        min: usize,
    },

    /// Office code blank after trimming.
    #[error("office code is required")]
    OfficeRequired,
}

impl ValidationError {
    /// Catalog key shown in the message area.
    pub fn message_key(self) -> MessageKey {
        match self {
            Self::UserRequired => MessageKey::ErrorUserRequired,
            Self::PasswordRequired => MessageKey::ErrorPasswordRequired,
            Self::PasswordMinLength { .. } => MessageKey::ErrorPasswordMinLength,
            Self::OfficeRequired => MessageKey::ErrorOfficeRequired,
        }
    }

    pub(crate) fn message_args(self) -> Vec<String> {
        match self {
            Self::PasswordMinLength { min } => vec![min.to_string()],
            _ => Vec::new(),
        }
    }
}

/// Outcome of a rejected [`submit`](super::LoginAttemptController::submit).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Local validation failed; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Another login or recovery request has not finished yet
    #[error("a request is already in progress")]
    InFlight,

    /// The local lockout is running
    #[error("login locked for {ticks_remaining} more ticks")]
    Locked {
        /// Ticks left on the countdown.
        ticks_remaining: u32,
    },

    /// The server refused the credentials
    #[error("{message}")]
    Rejected {
        /// Reason code from the server.
        reason: LoginFailureReason,
        /// Localized text shown to the user.
        message: String,
    },

    /// This failure pushed the attempt counter over the limit
    #[error("{message}")]
    LockoutStarted {
        /// Full lockout length in ticks.
        ticks_remaining: u32,
        /// Lockout length rounded up to whole minutes.
        minutes: u64,
        /// Localized text shown to the user.
        message: String,
    },

    /// Transport failure, timeout or unexpected client error
    #[error("{message}")]
    Connection {
        /// Localized text shown to the user.
        message: String,
    },
}

/// Outcome of a rejected password recovery request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    /// Recovery needs a user number.
    #[error("user number is required for password recovery")]
    UserRequired,

    /// Another login or recovery request has not finished yet.
    #[error("a request is already in progress")]
    InFlight,

    /// The service refused or failed.
    #[error("{message}")]
    Failed {
        /// Localized text shown to the user.
        message: String,
    },
}
