//! Rule-based spending feedback, recommendations and depletion predictions.
//!
//! Everything here is read-only over a [`Ledger`] snapshot. Recommendations
//! come from an ordered list of independent rules; each rule sees the
//! snapshot and the records produced by the rules before it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Expense, Ledger, money::format_amount};

/// Below this share of the budget left, spending must freeze.
pub const CRITICAL_RATIO: f64 = 0.1;
/// Below this share of the budget left, the user is warned.
pub const WARNING_RATIO: f64 = 0.2;
/// A category holding more than this share of the budget can donate funds.
pub const SURPLUS_RATIO: f64 = 0.15;
/// Above this share left, an idle budget is called healthy.
pub const HEALTHY_RATIO: f64 = 0.3;
/// Above this share left, a savings buffer is suggested.
pub const BUFFER_RATIO: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Info,
    Low,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Learning,
    Optimization,
    Critical,
    Reallocation,
    Overspend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub action: String,
    pub reason: String,
    pub priority: Priority,
}

impl Recommendation {
    fn new(
        kind: RecommendationKind,
        priority: Priority,
        action: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            action: action.into(),
            reason: reason.into(),
            priority,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    fn from_transactions_left(left: f64) -> Self {
        if left < 3.0 {
            Self::High
        } else if left < 5.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// How many average-sized expenses a category can still absorb.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepletionPrediction {
    pub category: String,
    pub remaining: f64,
    pub avg_transaction: f64,
    pub transactions_left: f64,
    pub risk_level: RiskLevel,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendingPatterns {
    pub total_spent: f64,
    pub avg_per_transaction: f64,
    pub category_totals: BTreeMap<String, f64>,
    pub expense_count: usize,
}

/// Everything the dashboard shows next to the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub feedback: String,
    pub recommendations: Vec<Recommendation>,
    pub predictions: Vec<DepletionPrediction>,
}

pub fn analyze(expenses: &[Expense]) -> SpendingPatterns {
    let mut category_totals: BTreeMap<String, f64> = BTreeMap::new();
    for expense in expenses {
        *category_totals.entry(expense.category.clone()).or_default() += expense.amount;
    }
    let total_spent: f64 = category_totals.values().sum();

    SpendingPatterns {
        total_spent,
        avg_per_transaction: total_spent / expenses.len().max(1) as f64,
        category_totals,
        expense_count: expenses.len(),
    }
}

/// Predictions for every category with spending, most urgent first.
///
/// The average is the category total divided by the count of *all*
/// expenses, not just the category's own.
pub fn predict_depletion(
    categories: &BTreeMap<String, f64>,
    patterns: &SpendingPatterns,
) -> Vec<DepletionPrediction> {
    if patterns.expense_count == 0 {
        return Vec::new();
    }

    let mut predictions: Vec<DepletionPrediction> = categories
        .iter()
        .filter_map(|(category, remaining)| {
            let total = patterns.category_totals.get(category)?;
            let avg_transaction = total / patterns.expense_count as f64;
            if avg_transaction <= 0.0 {
                return None;
            }
            let transactions_left = remaining / avg_transaction;
            Some(DepletionPrediction {
                category: category.clone(),
                remaining: *remaining,
                avg_transaction,
                transactions_left,
                risk_level: RiskLevel::from_transactions_left(transactions_left),
            })
        })
        .collect();
    predictions.sort_by(|a, b| a.transactions_left.total_cmp(&b.transactions_left));
    predictions
}

/// One line summarizing the budget's health.
pub fn feedback(ledger: Option<&Ledger>) -> String {
    let Some(ledger) = ledger.filter(|l| l.has_budget()) else {
        return "Create a budget to start tracking expenses with AI insights".to_string();
    };

    let total = ledger.total_budget;
    let remaining = ledger.remaining;
    let spent_pct = (total - remaining) / total * 100.0;
    let patterns = analyze(&ledger.expenses);

    if remaining <= 0.0 {
        "Budget depleted! Review spending and create a new budget with adjusted allocations."
            .to_string()
    } else if remaining < total * CRITICAL_RATIO {
        let left = if patterns.avg_per_transaction > 0.0 {
            remaining / patterns.avg_per_transaction
        } else {
            0.0
        };
        format!(
            "CRITICAL: {} left (~{left:.1} transactions at current pace). Immediate action required!",
            format_amount(remaining)
        )
    } else if remaining < total * WARNING_RATIO {
        format!(
            "WARNING: {spent_pct:.0}% spent. Depletion predicted soon. Reduce spending or reallocate funds."
        )
    } else if spent_pct < 25.0 {
        format!("Excellent start! {spent_pct:.0}% used. Learning your patterns for future optimization.")
    } else if spent_pct < 50.0 {
        format!("Good progress ({spent_pct:.0}% spent). Spending pace is healthy. Keep monitoring!")
    } else if spent_pct < 75.0 {
        format!("{spent_pct:.0}% spent. Watch high-velocity categories closely.")
    } else {
        format!(
            "{spent_pct:.0}% spent (avg {}/transaction). Plan remaining expenses carefully!",
            format_amount(patterns.avg_per_transaction)
        )
    }
}

struct Snapshot<'a> {
    ledger: &'a Ledger,
    total: f64,
    remaining: f64,
    patterns: SpendingPatterns,
    predictions: Vec<DepletionPrediction>,
}

impl Snapshot<'_> {
    fn expense_count(&self) -> usize {
        self.patterns.expense_count
    }
}

type Rule = fn(&Snapshot<'_>, &[Recommendation]) -> Vec<Recommendation>;

const RULES: [Rule; 9] = [
    onboarding,
    first_expense,
    critical_freeze,
    depletion_reallocation,
    overspend,
    active_analysis,
    mastered_patterns,
    savings_buffer,
    healthy_budget,
];

fn onboarding(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    if s.expense_count() != 0 {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Learning,
        Priority::Info,
        "Welcome! Your AI assistant is ready to learn",
        "Your budget starts from a typical event split: Food (40%), Venue (30%), Decor (20%), \
         Misc (10%). Add expenses and I'll analyze patterns, predict issues and adapt the split.",
    )]
}

fn first_expense(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    if s.expense_count() != 1 {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Learning,
        Priority::Info,
        "AI is now learning your spending patterns",
        "I've recorded your first expense. Keep adding more for better predictions and recommendations",
    )]
}

fn critical_freeze(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    if s.remaining >= s.total * CRITICAL_RATIO {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Critical,
        Priority::High,
        "URGENT: Freeze non-essential spending",
        format!(
            "Only {} remaining ({:.1}% of budget)",
            format_amount(s.remaining),
            s.remaining / s.total * 100.0
        ),
    )]
}

fn depletion_reallocation(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    let surplus_floor = s.total * SURPLUS_RATIO;
    s.predictions
        .iter()
        .filter(|p| p.risk_level == RiskLevel::High)
        .filter_map(|prediction| {
            let (donor, _) = s
                .ledger
                .categories
                .iter()
                .filter(|(name, amount)| **name != prediction.category && **amount > surplus_floor)
                .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })?;
            Some(Recommendation::new(
                RecommendationKind::Reallocation,
                Priority::High,
                format!(
                    "Reallocate {} from {donor} to {}",
                    format_amount(prediction.avg_transaction * 2.0),
                    prediction.category
                ),
                format!(
                    "{} will deplete in ~{:.1} transactions",
                    prediction.category, prediction.transactions_left
                ),
            ))
        })
        .collect()
}

fn overspend(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    s.ledger
        .categories
        .iter()
        .filter(|(_, amount)| **amount < 0.0)
        .map(|(category, amount)| {
            Recommendation::new(
                RecommendationKind::Overspend,
                Priority::High,
                format!("Stop spending in {category}"),
                format!("{category} is {} over budget", format_amount(amount.abs())),
            )
        })
        .collect()
}

fn active_analysis(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    let count = s.expense_count();
    if !(3..10).contains(&count) {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Learning,
        Priority::Info,
        "AI is actively analyzing your spending",
        format!(
            "Processed {count} expenses (avg {} per transaction). More data = smarter insights!",
            format_amount(s.patterns.avg_per_transaction)
        ),
    )]
}

fn mastered_patterns(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    if s.expense_count() < 10 {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Learning,
        Priority::Info,
        "AI has mastered your spending patterns",
        "Your next budget will be automatically optimized based on your behavior",
    )]
}

fn savings_buffer(s: &Snapshot<'_>, _: &[Recommendation]) -> Vec<Recommendation> {
    if s.remaining <= s.total * BUFFER_RATIO || s.expense_count() <= 5 {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Optimization,
        Priority::Low,
        format!(
            "Great job! Consider setting aside {} as buffer",
            format_amount(s.remaining * 0.1)
        ),
        format!(
            "Budget is healthy. Average spend: {} per transaction",
            format_amount(s.patterns.avg_per_transaction)
        ),
    )]
}

fn healthy_budget(s: &Snapshot<'_>, produced: &[Recommendation]) -> Vec<Recommendation> {
    if !produced.is_empty() || s.remaining <= s.total * HEALTHY_RATIO {
        return Vec::new();
    }
    vec![Recommendation::new(
        RecommendationKind::Optimization,
        Priority::Low,
        format!("Budget is healthy - {} remaining", format_amount(s.remaining)),
        format!(
            "You've spent {:.0}% of your budget efficiently. Monitoring for any concerning patterns.",
            (s.total - s.remaining) / s.total * 100.0
        ),
    )]
}

/// Runs every rule in order. Empty when there is no budget.
pub fn recommend(ledger: Option<&Ledger>) -> Vec<Recommendation> {
    let Some(ledger) = ledger.filter(|l| l.has_budget()) else {
        return Vec::new();
    };

    let patterns = analyze(&ledger.expenses);
    let snapshot = Snapshot {
        ledger,
        total: ledger.total_budget,
        remaining: ledger.remaining,
        predictions: predict_depletion(&ledger.categories, &patterns),
        patterns,
    };

    let mut produced = Vec::new();
    for rule in RULES {
        let records = rule(&snapshot, &produced);
        produced.extend(records);
    }
    produced
}

pub fn insights(ledger: Option<&Ledger>) -> Insights {
    let predictions = ledger
        .filter(|l| l.has_budget())
        .map(|l| predict_depletion(&l.categories, &analyze(&l.expenses)))
        .unwrap_or_default();

    Insights {
        feedback: feedback(ledger),
        recommendations: recommend(ledger),
        predictions,
    }
}
