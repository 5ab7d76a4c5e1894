use chrono::Utc;
use serde::Serialize;

use crate::{
    BulkPayment, EngineError, Expense, Ledger, NewExpense, Reallocation, ResultEngine,
    receipts::{self, ReceiptAnalysis},
};

use super::{Engine, with_ledger};

/// An expense that was just added or removed, with the balances it left.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpenseChange {
    pub index: usize,
    pub expense: Expense,
    pub category_balance: f64,
    pub remaining: f64,
}

impl ExpenseChange {
    fn new(ledger: &Ledger, index: usize, expense: Expense) -> Self {
        Self {
            index,
            category_balance: ledger
                .categories
                .get(&expense.category)
                .copied()
                .unwrap_or_default(),
            remaining: ledger.remaining,
            expense,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReceiptUpload {
    pub analysis: ReceiptAnalysis,
    pub added: ExpenseChange,
}

impl Engine {
    pub fn add_expense(&self, new: NewExpense) -> ResultEngine<ExpenseChange> {
        with_ledger!(self, |ledger| {
            let index = ledger.add_expense(new, Utc::now())?;
            let expense = ledger.expenses[index].clone();
            tracing::debug!(index, amount = expense.amount, category = %expense.category, "expense added");
            Ok(ExpenseChange::new(&ledger, index, expense))
        })
    }

    /// Deletes by position. Later expenses shift down by one.
    pub fn delete_expense(&self, index: usize) -> ResultEngine<ExpenseChange> {
        with_ledger!(self, |ledger| {
            let expense = ledger.delete_expense(index)?;
            tracing::debug!(index, amount = expense.amount, "expense deleted");
            Ok(ExpenseChange::new(&ledger, index, expense))
        })
    }

    pub fn reallocate_funds(&self, from: &str, to: &str, amount: f64) -> ResultEngine<Reallocation> {
        with_ledger!(self, |ledger| {
            let moved = ledger.reallocate_funds(from.trim(), to.trim(), amount)?;
            tracing::debug!(from, to, amount, "funds reallocated");
            Ok(moved)
        })
    }

    pub fn bulk_pay_vendors(&self) -> ResultEngine<BulkPayment> {
        with_ledger!(self, |ledger| {
            let payment = ledger.bulk_pay_vendors(Utc::now())?;
            tracing::debug!(
                payments = payment.payments.len(),
                total_paid = payment.total_paid,
                "vendors paid"
            );
            Ok(payment)
        })
    }

    /// Extracts an expense from receipt text and records it with its
    /// verification result.
    pub fn upload_receipt(
        &self,
        text: &str,
        filename: &str,
        category: Option<&str>,
    ) -> ResultEngine<ReceiptUpload> {
        let now = Utc::now();
        let analysis = receipts::process_receipt(text, filename, category, now);
        if analysis.amount <= 0.0 {
            return Err(EngineError::InvalidInput(
                "could not detect an amount on the receipt".to_string(),
            ));
        }

        with_ledger!(self, |ledger| {
            let new = NewExpense {
                category: analysis.category.clone(),
                amount: analysis.amount,
                vendor_name: None,
                receipt: Some(analysis.verification.clone()),
                ai_purchase: None,
            };
            let index = ledger.add_expense(new, now)?;
            let expense = ledger.expenses[index].clone();
            tracing::debug!(
                index,
                amount = analysis.amount,
                status = ?analysis.verification.status,
                "receipt recorded"
            );
            Ok(ReceiptUpload {
                added: ExpenseChange::new(&ledger, index, expense),
                analysis,
            })
        })
    }
}
