//! Session data produced by a successful login.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the authenticated user as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    /// Office administrator.
    Admin,
    /// Regular staff.
    Employee,
}

impl UserType {
    /// Whether the user manages the office.
    pub fn is_admin(self) -> bool {
        matches!(self, UserType::Admin)
    }

    /// Wire code as sent by the server.
    pub fn as_str(self) -> &'static str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::Employee => "EMPLOYEE",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated session handed to the navigation boundary.
///
/// Immutable once created; only the authentication client constructs one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Display name.
    pub user_name: String,
    /// Number the user signed in with.
    pub user_number: String,
    /// Office the session is bound to.
    pub office_code: String,
    /// Role reported by the server.
    pub user_type: UserType,
    /// Bearer token for subsequent requests. Never logged.
    pub token: String,
}

impl fmt::Debug for SessionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionResult")
            .field("user_name", &self.user_name)
            .field("user_number", &self.user_number)
            .field("office_code", &self.office_code)
            .field("user_type", &self.user_type)
            .field("token", &"<redacted>")
            .finish()
    }
}
