//! Input validation helpers shared by the API handlers.
//!
//! All checks return a human-readable message suitable for a 400
//! response body; they never touch the database.

const MIN_PASSWORD_LEN: usize = 8;

/// Require a non-empty value after trimming. Returns the trimmed slice.
pub fn require_trimmed<'a>(value: &'a str, field: &str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(trimmed)
}

/// Shallow email shape check: one `@`, non-empty local part, a dot in
/// the domain. Deliverability is not our problem here.
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err("invalid email address".to_string());
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') || domain.ends_with('.') {
        return Err("invalid email address".to_string());
    }
    if email.contains(char::is_whitespace) {
        return Err("invalid email address".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trimmed() {
        assert_eq!(require_trimmed("  hello ", "name").unwrap(), "hello");
        assert!(require_trimmed("   ", "name").is_err());
        assert_eq!(
            require_trimmed("", "email").unwrap_err(),
            "email is required"
        );
    }

    #[test]
    fn test_validate_email_accepts_normal_addresses() {
        assert!(validate_email("a@x.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("  padded@example.com  ").is_ok());
    }

    #[test]
    fn test_validate_email_rejects_malformed() {
        for bad in [
            "",
            "no-at-sign",
            "@example.com",
            "user@",
            "user@nodot",
            "user@dot.",
            "two words@example.com",
        ] {
            assert!(validate_email(bad).is_err(), "should reject {:?}", bad);
        }
    }

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_ok());
    }
}
