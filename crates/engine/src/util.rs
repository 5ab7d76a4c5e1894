//! Internal helpers shared by the ledger operations.
//!
//! These utilities are **not** part of the public API.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Generates a short human-readable reference such as `TXN-4F1A9C2E`.
pub(crate) fn generate_reference(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{prefix}-{}", &raw[..8])
}

/// Trim a required text field and reject it when empty.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text, mapping blank strings to `None`.
pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_have_prefix_and_eight_chars() {
        let reference = generate_reference("TXN");
        assert!(reference.starts_with("TXN-"));
        assert_eq!(reference.len(), 12);
        assert_ne!(reference, generate_reference("TXN"));
    }

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_required("  food ", "category").unwrap(), "food");
        assert!(normalize_required("   ", "category").is_err());
        assert_eq!(normalize_optional(Some(" ")), None);
        assert_eq!(normalize_optional(Some(" hi ")), Some("hi".to_string()));
    }
}
