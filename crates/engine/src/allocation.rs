//! Category allocation for a new budget.
//!
//! Without history the budget is split by [`DEFAULT_WEIGHTS`]. With history
//! each default category gets `0.7 * historical_share + 0.3 * default_weight`,
//! renormalized so the weights sum to 1. Categories that only appear in the
//! history are ignored.

use std::collections::BTreeMap;

use crate::Expense;

/// Default split of a budget across the four event categories.
pub const DEFAULT_WEIGHTS: [(&str, f64); 4] =
    [("food", 0.4), ("venue", 0.3), ("decor", 0.2), ("misc", 0.1)];

/// Share of the adapted weight taken from historical spending.
pub const HISTORY_WEIGHT: f64 = 0.7;

/// Names of the default categories, in allocation order.
pub fn default_categories() -> impl Iterator<Item = &'static str> {
    DEFAULT_WEIGHTS.iter().map(|(name, _)| *name)
}

/// Returns the weight of every default category given past expenses.
///
/// Falls back to [`DEFAULT_WEIGHTS`] when the history is empty or its total
/// spend is not positive.
pub fn weights(history: &[Expense]) -> BTreeMap<String, f64> {
    let defaults = || {
        DEFAULT_WEIGHTS
            .iter()
            .map(|(name, weight)| ((*name).to_string(), *weight))
            .collect::<BTreeMap<_, _>>()
    };

    let total_spent: f64 = history.iter().map(|e| e.amount).sum();
    if history.is_empty() || total_spent <= 0.0 {
        return defaults();
    }

    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in history {
        *by_category.entry(expense.category.as_str()).or_default() += expense.amount;
    }

    let adapted: Vec<(&str, f64)> = DEFAULT_WEIGHTS
        .iter()
        .map(|(name, default)| {
            let share = by_category.get(name).copied().unwrap_or(0.0) / total_spent;
            (*name, HISTORY_WEIGHT * share + (1.0 - HISTORY_WEIGHT) * default)
        })
        .collect();

    let sum: f64 = adapted.iter().map(|(_, w)| w).sum();
    if sum <= 0.0 {
        return defaults();
    }

    adapted
        .into_iter()
        .map(|(name, weight)| (name.to_string(), weight / sum))
        .collect()
}

/// Splits `total` across the default categories.
///
/// Pure: no rounding is applied, amounts may be fractional.
pub fn split(total: f64, history: &[Expense]) -> BTreeMap<String, f64> {
    weights(history)
        .into_iter()
        .map(|(name, weight)| (name, total * weight))
        .collect()
}
