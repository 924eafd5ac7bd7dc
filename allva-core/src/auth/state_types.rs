//! Form, snapshot and event types published by the controller.

use std::fmt;

use allva_model::{LoginCredentials, SessionResult};
use zeroize::Zeroizing;

use super::attempts::AttemptState;

/// Raw field values as typed by the user.
#[derive(Clone, Default)]
pub struct LoginForm {
    /// User number, untrimmed.
    pub user_number: String,
    /// Password, zeroed on drop.
    pub password: Zeroizing<String>,
    /// Office code, untrimmed and in the case typed.
    pub office_code: String,
    /// Remember user and office after a successful login.
    pub remember_session: bool,
}

impl LoginForm {
    /// Every required field holds something other than whitespace.
    pub fn fields_present(&self) -> bool {
        !self.user_number.trim().is_empty()
            && !self.password.trim().is_empty()
            && !self.office_code.trim().is_empty()
    }

    /// Normalised credentials for one submission.
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials::new(
            &self.user_number,
            self.password.as_str(),
            &self.office_code,
        )
    }

    /// Empty the credential fields, keeping the remember flag.
    pub fn clear(&mut self) {
        self.user_number.clear();
        self.password = Zeroizing::default();
        self.office_code.clear();
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("user_number", &self.user_number)
            .field("password", &"<redacted>")
            .field("office_code", &self.office_code)
            .field("remember_session", &self.remember_session)
            .finish()
    }
}

/// How the message area should style its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Validation, rejection or connection problem.
    Error,
    /// Informational, e.g. a recovery mail was sent.
    Notice,
}

/// Localized text shown in the message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    /// Styling hint.
    pub kind: MessageKind,
    /// Already localized.
    pub text: String,
}

impl StatusMessage {
    /// Error-styled message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    /// Notice-styled message.
    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Notice,
            text: text.into(),
        }
    }

    /// True for [`MessageKind::Error`].
    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// Everything a view needs to render the login screen.
///
/// The password itself is never published, only whether one is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginSnapshot {
    /// User number field as typed.
    pub user_number: String,
    /// Office code field as typed.
    pub office_code: String,
    /// Password field is not empty.
    pub has_password: bool,
    /// Remember-session checkbox.
    pub remember_session: bool,
    /// A request is in flight.
    pub is_loading: bool,
    /// Message area contents, if any.
    pub message: Option<StatusMessage>,
    /// Failure counter and lockout state.
    pub attempts: AttemptState,
    /// Whether the submit button should be enabled.
    pub can_submit: bool,
    /// Active language code.
    pub language: String,
}

/// Discrete events broadcast by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    /// Hand-off point for navigation to the main window.
    LoginSucceeded(SessionResult),
    /// The failure threshold was reached.
    LockoutStarted {
        /// Full lockout length in ticks.
        ticks_remaining: u32,
    },
    /// One countdown tick elapsed and the form is still locked.
    LockoutTick {
        /// Ticks left.
        ticks_remaining: u32,
    },
    /// The countdown finished and the form is usable again.
    LockoutEnded,
}
