//! Expenses and the ledger operations that create, delete and pay them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, Ledger, ReceiptVerification, ResultEngine, WalletTransactionKind,
    money,
    util::{normalize_optional, normalize_required},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
}

/// Provenance of an expense created by the personal shopper.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiPurchase {
    pub purchase_id: String,
    pub vendor: String,
    pub product_name: String,
    pub original_price: f64,
    pub savings: f64,
    pub ai_reasoning: String,
}

/// A recorded expense.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Stable surrogate id. The public contract still addresses expenses by
    /// position. Documents written without ids read back as nil and are
    /// backfilled by [`Ledger::backfill_expense_ids`].
    #[serde(default)]
    pub id: Uuid,
    pub amount: f64,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<ReceiptVerification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_purchase: Option<AiPurchase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_id: Option<String>,
}

/// Input of [`Ledger::add_expense`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewExpense {
    pub category: String,
    pub amount: f64,
    pub vendor_name: Option<String>,
    pub receipt: Option<ReceiptVerification>,
    pub ai_purchase: Option<AiPurchase>,
}

impl NewExpense {
    pub fn new(category: impl Into<String>, amount: f64) -> Self {
        Self {
            category: category.into(),
            amount,
            ..Default::default()
        }
    }

    pub fn vendor(mut self, vendor_name: impl Into<String>) -> Self {
        self.vendor_name = Some(vendor_name.into());
        self
    }
}

impl Expense {
    pub(crate) fn from_new(new: NewExpense, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount: new.amount,
            category: new.category,
            vendor_name: new.vendor_name,
            status: ExpenseStatus::Pending,
            recorded_at: Some(now),
            receipt: new.receipt,
            ai_purchase: new.ai_purchase,
            paid_at: None,
            payment_transaction_id: None,
            settlement_id: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ExpenseStatus::Pending
    }

    /// Name used on payment descriptions.
    pub fn payee(&self) -> &str {
        self.vendor_name
            .as_deref()
            .or(self.ai_purchase.as_ref().map(|p| p.vendor.as_str()))
            .unwrap_or("Unknown vendor")
    }
}

/// One settled expense inside a [`BulkPayment`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VendorPayment {
    pub expense_index: usize,
    pub vendor_name: String,
    pub category: String,
    pub amount: f64,
    pub transaction_id: String,
    pub balance_after: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPaymentStatus {
    Success,
    NoPayments,
}

/// Outcome of [`Ledger::bulk_pay_vendors`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulkPayment {
    pub status: BulkPaymentStatus,
    pub payments: Vec<VendorPayment>,
    pub total_paid: f64,
    pub wallet_balance: f64,
}

impl Ledger {
    /// Records an expense against a category and the budget.
    ///
    /// Returns the index of the new expense.
    pub fn add_expense(&mut self, new: NewExpense, now: DateTime<Utc>) -> ResultEngine<usize> {
        self.require_budget()?;
        let amount = money::positive_cents(new.amount, "amount")?;
        let category = normalize_required(&new.category, "category")?;
        self.require_category(&category)?;
        if !money::covers(self.remaining, amount) {
            return Err(EngineError::ExceedsRemaining {
                amount,
                remaining: self.remaining,
            });
        }

        let vendor_name = normalize_optional(new.vendor_name.as_deref());
        let expense = Expense::from_new(
            NewExpense {
                category: category.clone(),
                amount,
                vendor_name,
                ..new
            },
            now,
        );

        if let Some(balance) = self.categories.get_mut(&category) {
            *balance -= amount;
        }
        self.remaining = money::round_cents(self.remaining - amount);
        self.expenses.push(expense);
        Ok(self.expenses.len() - 1)
    }

    /// Gives every nil-id expense an id derived from its position and
    /// content, so repeated reads of an unchanged document agree on it.
    pub fn backfill_expense_ids(&mut self) -> usize {
        let mut filled = 0;
        for (index, expense) in self.expenses.iter_mut().enumerate() {
            if expense.id.is_nil() {
                let seed = format!(
                    "{index}|{}|{}|{:?}",
                    expense.category, expense.amount, expense.recorded_at
                );
                expense.id = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed.as_bytes());
                filled += 1;
            }
        }
        filled
    }

    /// Returns the expense at `index`.
    pub fn expense(&self, index: usize) -> ResultEngine<&Expense> {
        if self.expenses.is_empty() {
            return Err(EngineError::NoExpenses);
        }
        self.expenses.get(index).ok_or(EngineError::IndexOutOfRange {
            index,
            len: self.expenses.len(),
        })
    }

    /// Removes the expense at `index` and gives its amount back to its
    /// category and to `remaining`. Later expenses shift down by one.
    pub fn delete_expense(&mut self, index: usize) -> ResultEngine<Expense> {
        self.expense(index)?;
        let expense = self.expenses.remove(index);
        *self
            .categories
            .entry(expense.category.clone())
            .or_default() += expense.amount;
        self.remaining = money::round_cents(self.remaining + expense.amount);
        Ok(expense)
    }

    /// Sum of all pending expenses.
    pub fn pending_total(&self) -> f64 {
        money::round_cents(
            self.expenses
                .iter()
                .filter(|e| e.is_pending())
                .map(|e| e.amount)
                .sum(),
        )
    }

    /// Pays every pending expense from the wallet, in expense order.
    ///
    /// All or nothing: the wallet must cover the pending total up front.
    pub fn bulk_pay_vendors(&mut self, now: DateTime<Utc>) -> ResultEngine<BulkPayment> {
        let pending: Vec<usize> = self
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_pending())
            .map(|(i, _)| i)
            .collect();

        if pending.is_empty() {
            return Ok(BulkPayment {
                status: BulkPaymentStatus::NoPayments,
                payments: Vec::new(),
                total_paid: 0.0,
                wallet_balance: self.wallet_balance(),
            });
        }

        let total = self.pending_total();
        let balance = self.wallet_balance();
        if !money::covers(balance, total) {
            return Err(EngineError::InsufficientWalletBalance {
                balance,
                required: total,
            });
        }

        // Deduct on a copy so a failure midway cannot leave a partially paid
        // batch behind.
        let mut wallet = self.wallet.clone().unwrap_or_default();
        let mut expenses = self.expenses.clone();
        let mut payments = Vec::with_capacity(pending.len());
        for index in pending {
            let expense = &mut expenses[index];
            let description = format!(
                "Vendor payment: {} ({}) {}",
                expense.payee(),
                expense.category,
                money::format_amount(expense.amount)
            );
            let tx = wallet.deduct_funds(
                expense.amount,
                &description,
                WalletTransactionKind::VendorPayment,
                now,
            )?;

            expense.status = ExpenseStatus::Paid;
            expense.paid_at = Some(now);
            expense.payment_transaction_id = Some(tx.id.clone());
            payments.push(VendorPayment {
                expense_index: index,
                vendor_name: expense.payee().to_string(),
                category: expense.category.clone(),
                amount: expense.amount,
                transaction_id: tx.id,
                balance_after: tx.balance_after,
            });
        }

        let wallet_balance = wallet.balance;
        self.wallet = Some(wallet);
        self.expenses = expenses;
        Ok(BulkPayment {
            status: BulkPaymentStatus::Success,
            payments,
            total_paid: total,
            wallet_balance,
        })
    }
}
