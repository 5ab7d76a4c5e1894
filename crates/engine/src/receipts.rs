//! Receipt text extraction and authenticity heuristics.
//!
//! This is a keyword/regex heuristic over already-extracted text, not OCR.
//! The result feeds [`Ledger::add_expense`](crate::Ledger::add_expense) as a
//! plain `(amount, category)` pair plus the verification record.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::money::round_cents;

static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"total[:\s]+\$?(\d+\.?\d*)",
        r"amount[:\s]+\$?(\d+\.?\d*)",
        r"sum[:\s]+\$?(\d+\.?\d*)",
        r"\$(\d+\.?\d*)",
        r"(\d+\.\d{2})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

const SUSPICIOUS_KEYWORDS: [&str; 9] = [
    "photocopy",
    "duplicate",
    "copy",
    "edited",
    "modified",
    "fake",
    "sample",
    "template",
    "draft",
];

const CATEGORY_KEYWORDS: [(&str, &[&str]); 4] = [
    (
        "food",
        &[
            "restaurant",
            "cafe",
            "pizza",
            "burger",
            "coffee",
            "food",
            "grocery",
            "lunch",
            "dinner",
            "breakfast",
        ],
    ),
    (
        "venue",
        &["venue", "hall", "rental", "space", "hotel", "conference", "room"],
    ),
    (
        "decor",
        &["decor", "decoration", "flowers", "balloon", "banner", "lighting"],
    ),
    ("misc", &["misc", "other", "general", "supply", "office"]),
];

const MIN_AMOUNT: f64 = 0.01;
const MAX_AMOUNT: f64 = 100_000.0;
const HIGH_AMOUNT: f64 = 10_000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Warning,
    Suspicious,
}

/// Outcome of the authenticity check, stored on the expense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptVerification {
    pub status: VerificationStatus,
    pub confidence: u8,
    pub flags: Vec<String>,
    pub filename: String,
    pub checked_at: DateTime<Utc>,
}

/// Everything extracted from one receipt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAnalysis {
    /// `0` when no amount could be found.
    pub amount: f64,
    pub category: String,
    pub suggested_category: String,
    pub verification: ReceiptVerification,
}

/// Returns the first plausible amount found in `text`, or `0`.
///
/// Patterns are tried in priority order; within a pattern only the first
/// match is considered.
pub fn extract_amount(text: &str) -> f64 {
    let lower = text.to_lowercase();
    for pattern in AMOUNT_PATTERNS.iter() {
        let Some(captures) = pattern.captures(&lower) else {
            continue;
        };
        let Some(amount) = captures
            .get(1)
            .and_then(|m| m.as_str().trim_end_matches('.').parse::<f64>().ok())
        else {
            continue;
        };
        if (MIN_AMOUNT..=MAX_AMOUNT).contains(&amount) {
            return round_cents(amount);
        }
    }
    0.0
}

/// Guesses the category from keywords, defaulting to `misc`.
pub fn detect_category(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map_or("misc", |(category, _)| *category)
}

/// Flags suspicious receipts.
pub fn verify(text: &str, filename: &str, now: DateTime<Utc>) -> ReceiptVerification {
    let text_lower = text.to_lowercase();
    let filename_lower = filename.to_lowercase();

    let mut flags: Vec<String> = SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|k| text_lower.contains(*k) || filename_lower.contains(*k))
        .map(|k| format!("Contains '{k}'"))
        .collect();

    let amount = extract_amount(text);
    if amount == 0.0 {
        flags.push("No valid amount detected".to_string());
    }
    if amount > HIGH_AMOUNT {
        flags.push(format!("Unusually high amount: ${amount:.2}"));
    }

    let (status, confidence) = match flags.len() {
        0 => (VerificationStatus::Verified, 95),
        1 => (VerificationStatus::Warning, 75),
        _ => (VerificationStatus::Suspicious, 45),
    };

    ReceiptVerification {
        status,
        confidence,
        flags,
        filename: filename.to_string(),
        checked_at: now,
    }
}

/// Runs the full pipeline. A non-blank `user_category` wins over the
/// detected one.
pub fn process_receipt(
    text: &str,
    filename: &str,
    user_category: Option<&str>,
    now: DateTime<Utc>,
) -> ReceiptAnalysis {
    let suggested = detect_category(text).to_string();
    let category = user_category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map_or_else(|| suggested.clone(), ToString::to_string);

    ReceiptAnalysis {
        amount: extract_amount(text),
        category,
        suggested_category: suggested,
        verification: verify(text, filename, now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_total_before_other_numbers() {
        let text = "Pizza Palace\nItem 12.00\nTOTAL: $25.99\nThank you";
        assert_eq!(extract_amount(text), 25.99);
    }

    #[test]
    fn falls_back_to_dollar_then_decimal_patterns() {
        assert_eq!(extract_amount("paid $40 cash"), 40.0);
        assert_eq!(extract_amount("balance 13.50 due"), 13.5);
        assert_eq!(extract_amount("no numbers here"), 0.0);
    }

    #[test]
    fn out_of_bounds_amounts_are_skipped() {
        assert_eq!(extract_amount("total: 0.00"), 0.0);
        assert_eq!(extract_amount("total: 250000"), 0.0);
    }

    #[test]
    fn detects_categories_by_keyword() {
        assert_eq!(detect_category("Downtown Coffee House"), "food");
        assert_eq!(detect_category("Grand Hall rental"), "venue");
        assert_eq!(detect_category("balloon arch"), "decor");
        assert_eq!(detect_category("something else"), "misc");
    }

    #[test]
    fn clean_receipt_is_verified() {
        let v = verify("Cafe Luna total: 18.40", "receipt.jpg", Utc::now());
        assert_eq!(v.status, VerificationStatus::Verified);
        assert!(v.flags.is_empty());
    }

    #[test]
    fn flags_accumulate_into_suspicious() {
        let v = verify("SAMPLE receipt", "copy_of_receipt.png", Utc::now());
        // sample, copy, and the missing amount.
        assert_eq!(v.flags.len(), 3);
        assert_eq!(v.status, VerificationStatus::Suspicious);

        let v = verify("dinner total: 20000", "r.jpg", Utc::now());
        assert_eq!(v.status, VerificationStatus::Warning);
    }

    #[test]
    fn user_category_overrides_detection() {
        let analysis = process_receipt("pizza total: 12.00", "r.jpg", Some("misc"), Utc::now());
        assert_eq!(analysis.category, "misc");
        assert_eq!(analysis.suggested_category, "food");
        assert_eq!(analysis.amount, 12.0);

        let analysis = process_receipt("pizza total: 12.00", "r.jpg", Some("  "), Utc::now());
        assert_eq!(analysis.category, "food");
    }
}
