//! Helpers for monetary amounts.
//!
//! Amounts are plain `f64` dollars, exactly as they are stored in the ledger
//! document. Every amount entering the ledger is snapped to whole cents,
//! `remaining` and wallet balances are re-snapped after each change, and
//! "is there enough" checks compare whole cents. Allocation results are
//! never rounded, so category balances may carry fractions of a cent.
//!
//! ```rust
//! use engine::money::{format_amount, parse_amount};
//!
//! assert_eq!(format_amount(12.5), "$12.50");
//! assert_eq!(parse_amount("10,5").unwrap(), 10.5);
//! assert!(parse_amount("12.345").is_err());
//! ```

use crate::{EngineError, ResultEngine};

/// Rounds an amount to whole cents.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// An amount as a whole number of cents.
#[must_use]
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// `true` when `available` covers `required` to the cent.
#[must_use]
pub fn covers(available: f64, required: f64) -> bool {
    to_cents(available) >= to_cents(required)
}

/// Validates a user-supplied amount and snaps it to whole cents.
///
/// Amounts that round to zero are rejected like zero itself.
pub fn positive_cents(amount: f64, label: &str) -> ResultEngine<f64> {
    ensure_positive(amount, label)?;
    let rounded = round_cents(amount);
    ensure_positive(rounded, label)?;
    Ok(rounded)
}

/// Renders an amount as `$1234.50` (negative amounts as `-$1234.50`).
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let rounded = round_cents(amount);
    if rounded < 0.0 {
        format!("-${:.2}", -rounded)
    } else {
        format!("${:.2}", rounded.abs())
    }
}

/// Rejects zero, negative and non-finite amounts.
pub fn ensure_positive(amount: f64, label: &str) -> ResultEngine<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be greater than 0"
        )));
    }
    Ok(())
}

/// Parses a decimal string typed by a user.
///
/// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
///
/// Validation rules:
/// - max 2 fractional digits (rejects `12.345`)
/// - rejects empty/invalid strings
pub fn parse_amount(s: &str) -> ResultEngine<f64> {
    let empty = || EngineError::InvalidInput("empty amount".to_string());
    let invalid = || EngineError::InvalidInput("invalid amount".to_string());
    let overflow = || EngineError::InvalidInput("amount too large".to_string());

    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (true, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (false, stripped)
    } else {
        (false, trimmed)
    };

    let rest = rest.trim().trim_start_matches('$');
    if rest.is_empty() {
        return Err(empty());
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let whole_str = parts.next().ok_or_else(invalid)?;
    let frac_str = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if whole_str.is_empty() || !whole_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let whole: i64 = whole_str.parse().map_err(|_| overflow())?;

    let cents: i64 = match frac_str {
        None | Some("") => 0,
        Some(frac) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            match frac.len() {
                1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                2 => frac.parse::<i64>().map_err(|_| invalid())?,
                _ => return Err(EngineError::InvalidInput("too many decimals".to_string())),
            }
        }
    };

    let total = whole
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;
    let total = total as f64 / 100.0;

    Ok(if negative { -total } else { total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_renders_dollars() {
        assert_eq!(format_amount(0.0), "$0.00");
        assert_eq!(format_amount(0.1), "$0.10");
        assert_eq!(format_amount(1050.0), "$1050.00");
        assert_eq!(format_amount(-10.5), "-$10.50");
        assert_eq!(format_amount(133.333_333), "$133.33");
    }

    #[test]
    fn parse_accepts_dot_comma_and_dollar_sign() {
        assert_eq!(parse_amount("10").unwrap(), 10.0);
        assert_eq!(parse_amount("10.5").unwrap(), 10.5);
        assert_eq!(parse_amount("10,50").unwrap(), 10.5);
        assert_eq!(parse_amount("$25.99").unwrap(), 25.99);
        assert_eq!(parse_amount("-0.01").unwrap(), -0.01);
        assert_eq!(parse_amount("  2.30 ").unwrap(), 2.3);
    }

    #[test]
    fn parse_rejects_garbage_and_extra_decimals() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("1.2.3").is_err());
        assert!(parse_amount("12.345").is_err());
    }

    #[test]
    fn ensure_positive_rejects_zero_and_nan() {
        assert!(ensure_positive(0.0, "amount").is_err());
        assert!(ensure_positive(-1.0, "amount").is_err());
        assert!(ensure_positive(f64::NAN, "amount").is_err());
        assert!(ensure_positive(0.01, "amount").is_ok());
    }

    #[test]
    fn cent_comparisons_ignore_float_drift() {
        let remaining = 80.0 - 8.21;
        assert_ne!(remaining, 71.79);
        assert!(covers(remaining, 71.79));
        assert!(!covers(71.78, 71.79));
        assert_eq!(to_cents(8.21 + 71.79), 8000);
    }

    #[test]
    fn positive_cents_snaps_and_rejects_dust() {
        assert_eq!(positive_cents(12.346, "amount").unwrap(), 12.35);
        assert!(positive_cents(0.004, "amount").is_err());
        assert!(positive_cents(-3.0, "amount").is_err());
    }
}
