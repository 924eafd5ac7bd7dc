//! Credentials captured from the login form for a single submission.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Credentials for one login attempt.
///
/// Built fresh for every submission and wiped from memory on drop. The
/// user number is trimmed and the office code is trimmed and upper-cased;
/// the password is kept exactly as typed.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct LoginCredentials {
    user_number: String,
    password: String,
    office_code: String,
}

impl LoginCredentials {
    /// Capture one submission, normalising the user number and office code.
    pub fn new(
        user_number: impl AsRef<str>,
        password: impl Into<String>,
        office_code: impl AsRef<str>,
    ) -> Self {
        Self {
            user_number: user_number.as_ref().trim().to_string(),
            password: password.into(),
            office_code: normalize_office_code(office_code.as_ref()),
        }
    }

    /// Trimmed user number.
    pub fn user_number(&self) -> &str {
        &self.user_number
    }

    /// Password exactly as typed.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Trimmed, upper-cased office code.
    pub fn office_code(&self) -> &str {
        &self.office_code
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("user_number", &self.user_number)
            .field("password", &"<redacted>")
            .field("office_code", &self.office_code)
            .finish()
    }
}

/// Office codes are matched case-insensitively by the server; the client
/// always sends them trimmed and upper-cased.
pub fn normalize_office_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn office_code_is_trimmed_and_uppercased() {
        let creds = LoginCredentials::new(" 9999 ", "Test1234!", "  abc ");
        assert_eq!(creds.user_number(), "9999");
        assert_eq!(creds.office_code(), "ABC");
    }

    #[test]
    fn password_is_kept_verbatim() {
        let creds = LoginCredentials::new("1001", " spaced pass ", "X");
        assert_eq!(creds.password(), " spaced pass ");
    }

    #[test]
    fn debug_output_redacts_password() {
        let creds = LoginCredentials::new("1001", "Admin123!", "hq");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("Admin123!"));
        assert!(rendered.contains("<redacted>"));
    }
}
