//! Local checks run before any network call.

use allva_config::LoginPolicy;

use super::errors::ValidationError;
use super::state_types::LoginForm;

/// Check the form in field order; the first problem wins.
pub fn validate(
    form: &LoginForm,
    policy: &LoginPolicy,
) -> Result<(), ValidationError> {
    if form.user_number.trim().is_empty() {
        return Err(ValidationError::UserRequired);
    }
    if form.password.trim().is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if form.password.chars().count() < policy.password_min_length {
        return Err(ValidationError::PasswordMinLength {
            min: policy.password_min_length,
        });
    }
    if form.office_code.trim().is_empty() {
        return Err(ValidationError::OfficeRequired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(user: &str, password: &str, office: &str) -> LoginForm {
        LoginForm {
            user_number: user.into(),
            password: password.to_string().into(),
            office_code: office.into(),
            remember_session: false,
        }
    }

    #[test]
    fn fields_are_checked_in_order() {
        let policy = LoginPolicy::default();
        assert_eq!(
            validate(&form("  ", "", ""), &policy),
            Err(ValidationError::UserRequired)
        );
        assert_eq!(
            validate(&form("1001", "   ", ""), &policy),
            Err(ValidationError::PasswordRequired)
        );
        assert_eq!(
            validate(&form("1001", "short", ""), &policy),
            Err(ValidationError::PasswordMinLength { min: 8 })
        );
        assert_eq!(
            validate(&form("1001", "long-enough", " "), &policy),
            Err(ValidationError::OfficeRequired)
        );
        assert_eq!(validate(&form("1001", "long-enough", "abc"), &policy), Ok(()));
    }

    #[test]
    fn length_counts_characters() {
        let policy = LoginPolicy::default();
        assert!(validate(&form("1", "ñññññññ", "x"), &policy).is_err());
        assert_eq!(validate(&form("1", "ññññññññ", "x"), &policy), Ok(()));
    }
}
