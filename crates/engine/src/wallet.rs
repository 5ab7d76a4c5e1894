//! The module contains the internal `Wallet` and its transaction log.
//!
//! The wallet is a stored-value subledger, distinct from the budget. Every
//! change appends a [`WalletTransaction`] whose signed `amount` encodes the
//! direction and whose `balance_after` snapshots the balance right after it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, money, util::generate_reference};

/// Kind of a wallet transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletTransactionKind {
    AddFunds,
    Purchase,
    AiPurchase,
    Expense,
    VendorPayment,
    InteracTransfer,
}

impl WalletTransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddFunds => "add_funds",
            Self::Purchase => "purchase",
            Self::AiPurchase => "ai_purchase",
            Self::Expense => "expense",
            Self::VendorPayment => "vendor_payment",
            Self::InteracTransfer => "interac_transfer",
        }
    }

    /// Kinds counted in [`WalletStats::total_spent`].
    ///
    /// Vendor payments and Interac transfers are not counted.
    pub fn counts_as_spending(self) -> bool {
        matches!(self, Self::Purchase | Self::AiPurchase | Self::Expense)
    }
}

/// Lifecycle status shared by wallet transactions and transfer records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Completed,
}

/// One immutable entry of the wallet log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WalletTransactionKind,
    /// Positive for credits, negative for debits.
    pub amount: f64,
    pub balance_after: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub status: TransactionStatus,
    pub description: String,
}

/// Aggregated wallet figures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletStats {
    pub current_balance: f64,
    pub total_added: f64,
    pub total_spent: f64,
    pub transaction_count: usize,
}

/// The internal wallet.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub transactions: Vec<WalletTransaction>,
}

impl Wallet {
    /// Credits the wallet.
    pub fn add_funds(
        &mut self,
        amount: f64,
        payment_method: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        let amount = money::positive_cents(amount, "amount")?;
        let balance_after = money::round_cents(self.balance + amount);
        let tx = WalletTransaction {
            id: generate_reference("TXN"),
            kind: WalletTransactionKind::AddFunds,
            amount,
            balance_after,
            payment_method: Some(payment_method.to_string()),
            timestamp: now,
            status: TransactionStatus::Completed,
            description: format!(
                "Added {} to wallet via {payment_method}",
                money::format_amount(amount)
            ),
        };
        self.balance = balance_after;
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Debits the wallet.
    ///
    /// Fails with [`EngineError::InsufficientFunds`] when the balance is lower
    /// than `amount`; the wallet is left untouched in that case.
    pub fn deduct_funds(
        &mut self,
        amount: f64,
        description: &str,
        kind: WalletTransactionKind,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        let amount = money::positive_cents(amount, "amount")?;
        if !money::covers(self.balance, amount) {
            return Err(EngineError::InsufficientFunds(format!(
                "Balance: {}, Required: {}",
                money::format_amount(self.balance),
                money::format_amount(amount)
            )));
        }

        let balance_after = money::round_cents(self.balance - amount);
        let tx = WalletTransaction {
            id: generate_reference("TXN"),
            kind,
            amount: -amount,
            balance_after,
            payment_method: None,
            timestamp: now,
            status: TransactionStatus::Completed,
            description: description.to_string(),
        };
        self.balance = balance_after;
        self.transactions.push(tx.clone());
        Ok(tx)
    }

    /// Transactions newest first; equal timestamps keep insertion order.
    ///
    /// `Some(0)` is treated like `None`.
    pub fn list_transactions(&self, limit: Option<usize>) -> Vec<&WalletTransaction> {
        let mut sorted: Vec<&WalletTransaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        if let Some(limit) = limit.filter(|l| *l > 0) {
            sorted.truncate(limit);
        }
        sorted
    }

    pub fn stats(&self) -> WalletStats {
        let total_added = money::round_cents(
            self.transactions
                .iter()
                .filter(|t| t.kind == WalletTransactionKind::AddFunds)
                .map(|t| t.amount)
                .sum(),
        );
        let total_spent = money::round_cents(
            self.transactions
                .iter()
                .filter(|t| t.kind.counts_as_spending())
                .map(|t| t.amount)
                .sum::<f64>()
                .abs(),
        );

        WalletStats {
            current_balance: self.balance,
            total_added,
            total_spent,
            transaction_count: self.transactions.len(),
        }
    }

    /// Sum of all signed amounts in the log. Equals `balance` for a wallet
    /// only ever changed through [`add_funds`](Self::add_funds) and
    /// [`deduct_funds`](Self::deduct_funds).
    pub fn replayed_balance(&self) -> f64 {
        money::round_cents(self.transactions.iter().map(|t| t.amount).sum())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn add_funds_appends_credit_with_snapshot() {
        let mut wallet = Wallet::default();
        let tx = wallet.add_funds(100.0, "interac_debit", Utc::now()).unwrap();

        assert_eq!(tx.kind, WalletTransactionKind::AddFunds);
        assert_eq!(tx.amount, 100.0);
        assert_eq!(tx.balance_after, 100.0);
        assert_eq!(tx.payment_method.as_deref(), Some("interac_debit"));
        assert_eq!(wallet.balance, 100.0);
        assert_eq!(wallet.transactions.len(), 1);
    }

    #[test]
    fn add_funds_rejects_non_positive() {
        let mut wallet = Wallet::default();
        assert!(matches!(
            wallet.add_funds(0.0, "interac_debit", Utc::now()),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(wallet.transactions.is_empty());
    }

    #[test]
    fn deduct_more_than_balance_leaves_wallet_untouched() {
        let mut wallet = Wallet::default();
        wallet.add_funds(100.0, "interac_debit", Utc::now()).unwrap();
        let before = wallet.clone();

        let err = wallet
            .deduct_funds(150.0, "x", WalletTransactionKind::Purchase, Utc::now())
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientFunds(_)));
        assert_eq!(wallet, before);
    }

    #[test]
    fn deduct_records_negative_amount_and_balance_after() {
        let mut wallet = Wallet::default();
        wallet.add_funds(100.0, "interac_debit", Utc::now()).unwrap();
        let tx = wallet
            .deduct_funds(40.0, "lunch", WalletTransactionKind::Purchase, Utc::now())
            .unwrap();

        assert_eq!(tx.amount, -40.0);
        assert_eq!(tx.balance_after, 60.0);
        assert_eq!(wallet.balance, 60.0);
        assert_eq!(wallet.replayed_balance(), wallet.balance);
    }

    #[test]
    fn deduct_exact_balance_reaches_zero() {
        let mut wallet = Wallet::default();
        wallet.add_funds(25.0, "interac_debit", Utc::now()).unwrap();
        wallet
            .deduct_funds(25.0, "all", WalletTransactionKind::Purchase, Utc::now())
            .unwrap();
        assert_eq!(wallet.balance, 0.0);
    }

    #[test]
    fn list_is_newest_first_and_limited() {
        let base = Utc::now();
        let mut wallet = Wallet::default();
        wallet.add_funds(1.0, "a", base).unwrap();
        wallet.add_funds(2.0, "b", base + Duration::seconds(5)).unwrap();
        wallet.add_funds(3.0, "c", base + Duration::seconds(5)).unwrap();
        wallet.add_funds(4.0, "d", base - Duration::seconds(5)).unwrap();

        let amounts: Vec<f64> = wallet.list_transactions(None).iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![2.0, 3.0, 1.0, 4.0]);

        assert_eq!(wallet.list_transactions(Some(2)).len(), 2);
        assert_eq!(wallet.list_transactions(Some(0)).len(), 4);
    }

    #[test]
    fn stats_exclude_vendor_payments_and_transfers_from_spent() {
        let now = Utc::now();
        let mut wallet = Wallet::default();
        wallet.add_funds(200.0, "interac_debit", now).unwrap();
        wallet
            .deduct_funds(10.0, "p", WalletTransactionKind::Purchase, now)
            .unwrap();
        wallet
            .deduct_funds(20.0, "ai", WalletTransactionKind::AiPurchase, now)
            .unwrap();
        wallet
            .deduct_funds(30.0, "vendor", WalletTransactionKind::VendorPayment, now)
            .unwrap();
        wallet
            .deduct_funds(40.0, "etransfer", WalletTransactionKind::InteracTransfer, now)
            .unwrap();

        let stats = wallet.stats();
        assert_eq!(stats.total_added, 200.0);
        // Only purchase + ai_purchase count; vendor_payment and
        // interac_transfer are left out of total_spent.
        assert_eq!(stats.total_spent, 30.0);
        assert_eq!(stats.current_balance, 100.0);
        assert_eq!(stats.transaction_count, 5);
    }
}
