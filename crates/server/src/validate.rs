//! Request checks run before anything reaches the engine.

use crate::ServerError;

pub(crate) fn positive(amount: f64, label: &str) -> Result<f64, ServerError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ServerError::Generic(format!("{label} must be greater than 0")));
    }
    Ok(amount)
}

pub(crate) fn non_empty<'a>(value: &'a str, label: &str) -> Result<&'a str, ServerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServerError::Generic(format!("{label} must not be empty")));
    }
    Ok(trimmed)
}

/// Accepts `local@domain.tld` shaped addresses.
pub(crate) fn email<'a>(value: &'a str, label: &str) -> Result<&'a str, ServerError> {
    let value = non_empty(value, label)?;
    let invalid = || ServerError::Generic(format!("{label} is not a valid email address"));

    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.len() < 2 {
        return Err(invalid());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive() {
        assert!(positive(0.01, "amount").is_ok());
        assert!(positive(0.0, "amount").is_err());
        assert!(positive(-3.0, "amount").is_err());
        assert!(positive(f64::NAN, "amount").is_err());
    }

    #[test]
    fn strings_are_trimmed() {
        assert_eq!(non_empty("  food ", "category").ok(), Some("food"));
        assert!(non_empty("   ", "category").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email("sam@example.com", "email").is_ok());
        assert!(email(" kim@mail.example.ca ", "email").is_ok());
        for bad in ["", "sam", "@example.com", "sam@", "sam@example", "sam@.com", "a b@x.com", "a@b@c.com", "sam@example.c"] {
            assert!(email(bad, "email").is_err(), "{bad}");
        }
    }
}
