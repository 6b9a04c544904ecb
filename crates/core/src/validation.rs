//! Client-side form validation
//!
//! Checks that are worth failing before a request is ever dispatched.
//! Server-side validation still applies; these only catch the obvious
//! cases early.

use crate::error::{CoreError, CoreResult};

/// Validate email format (basic check)
pub fn validate_email(email: &str, field: &str) -> CoreResult<()> {
    if !email.contains('@') || email.split('@').count() != 2 {
        return Err(CoreError::validation(format!(
            "{field}: invalid email format"
        )));
    }
    Ok(())
}

/// Validate a phone number: digits only, 10 or 11 of them.
pub fn validate_phone(phone: &str, field: &str) -> CoreResult<()> {
    let digits = phone.len();
    if !(10..=11).contains(&digits) || !phone.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation(format!(
            "{field}: must be 10-11 digits"
        )));
    }
    Ok(())
}

/// Validate that a required field is not empty
pub fn validate_required(value: &str, field: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{field}: cannot be empty")));
    }
    Ok(())
}

/// Every password rule the given candidate violates. Empty means valid.
pub fn password_issues(password: &str) -> Vec<&'static str> {
    let mut issues = Vec::new();
    if password.chars().count() < 8 {
        issues.push("must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        issues.push("must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        issues.push("must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        issues.push("must contain a digit");
    }
    if !password.chars().any(|c| r#"!@#$%^&*(),.?":{}|<>"#.contains(c)) {
        issues.push("must contain a special character");
    }
    issues
}

/// Validate a password against all rules at once.
pub fn validate_password(password: &str, field: &str) -> CoreResult<()> {
    let issues = password_issues(password);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "{field}: {}",
            issues.join(", ")
        )))
    }
}
