//! Plain records for the studio data layer plus the validation rules that
//! apply when they are created or patched.

pub mod errors;
pub mod money;
pub mod client;
pub mod appointment;
pub mod catalog;
pub mod price;
pub mod template;
pub mod studio;
pub mod account;

#[cfg(test)]
mod tests;

pub use errors::ModelError;

/// Trim and reject empty strings.
pub fn validate_name(field: &str, value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::validation(format!("{field} required")));
    }
    if trimmed.chars().count() > 120 {
        return Err(ModelError::validation(format!("{field} too long (<=120)")));
    }
    Ok(trimmed.to_string())
}

/// Loose email check: non-empty local part, `@`, and a dotted domain.
pub fn validate_email(email: &str) -> Result<String, ModelError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::validation("invalid email"));
    };
    if local.is_empty() || domain.contains('@') || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ModelError::validation("invalid email"));
    }
    Ok(email.to_string())
}

/// Empty string means "not provided"; otherwise the email must be valid.
pub fn validate_optional_email(email: &str) -> Result<String, ModelError> {
    if email.trim().is_empty() {
        return Ok(String::new());
    }
    validate_email(email)
}
