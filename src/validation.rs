//! Input checks shared by the user, auth and location handlers.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

pub const MIN_PASSWORD_LEN: usize = 8;
/// Matches the `users.email` column width.
pub const EMAIL_MAX: usize = 255;
const SPECIAL_CHARS: &str = "!@#$%^&*()-_=+[]{}|;:,.<>?/";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Normalizes and validates an email, returning the stored form.
pub fn require_email(email: &str) -> AppResult<String> {
    let email = normalize_email(email);
    if email.chars().count() > EMAIL_MAX {
        return Err(AppError::validation(format!(
            "Email must be at most {EMAIL_MAX} characters"
        )));
    }
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid email"));
    }
    Ok(email)
}

pub fn check_password_policy(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Password must contain at least one digit"));
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(AppError::validation(
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(AppError::validation(
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(AppError::validation(
            "Password must contain at least one special character",
        ));
    }
    Ok(())
}

/// Checks the character length of a required text field.
pub fn check_len(field: &str, value: &str, min: usize, max: usize) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::validation(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub fn check_optional_len(field: &str, value: Option<&str>, max: usize) -> AppResult<()> {
    match value {
        Some(v) => check_len(field, v, 0, max),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized_before_validation() {
        assert_eq!(require_email("  Jane.Doe@Example.COM ").unwrap(), "jane.doe@example.com");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["", "plain", "a@b", "a b@example.com", "@example.com"] {
            assert!(require_email(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn overlong_email_is_a_validation_error() {
        let domain = "@example.com";
        let fits = format!("{}{domain}", "a".repeat(EMAIL_MAX - domain.len()));
        assert_eq!(require_email(&fits).unwrap().len(), EMAIL_MAX);

        let long = format!("{}{domain}", "a".repeat(300));
        let err = require_email(&long).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("at most 255"));
    }

    #[test]
    fn strong_password_passes_policy() {
        assert!(check_password_policy("Secur3P@ssw0rd!").is_ok());
    }

    #[test]
    fn weak_passwords_fail_policy_with_reason() {
        let cases = [
            ("Sh0rt!", "at least 8"),
            ("NoDigits!!", "digit"),
            ("nouppercase1!", "uppercase"),
            ("NOLOWERCASE1!", "lowercase"),
            ("NoSpecial123", "special"),
        ];
        for (pw, reason) in cases {
            let err = check_password_policy(pw).unwrap_err();
            assert!(
                err.to_string().contains(reason),
                "{pw:?}: expected {reason:?} in {err}"
            );
        }
    }

    #[test]
    fn length_checks_count_characters() {
        assert!(check_len("first_name", "Zoë", 1, 3).is_ok());
        assert!(check_len("first_name", "", 1, 100).is_err());
        assert!(check_optional_len("industry", None, 255).is_ok());
        assert!(check_optional_len("industry", Some(&"x".repeat(256)), 255).is_err());
    }
}
