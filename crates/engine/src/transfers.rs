//! Simulated Interac e-Transfers, money requests and expense settlements.
//!
//! Nothing leaves the process. A sent transfer debits either the wallet or
//! the budget-wide `remaining`; requests and settlements only add records.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Ledger, ResultEngine, TransactionStatus, WalletTransaction,
    WalletTransactionKind,
    money,
    util::{generate_reference, normalize_optional, normalize_required},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferKind {
    Send,
    Settlement,
}

/// An outgoing transfer record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteracTransfer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransferKind,
    pub recipient: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub has_security: bool,
    #[serde(default)]
    pub from_wallet: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_index: Option<usize>,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

/// A request for money from someone else; it never moves funds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoneyRequest {
    pub id: String,
    pub requester: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
}

/// Input of [`Ledger::send_interac`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SendInterac {
    pub recipient_email: String,
    pub amount: f64,
    pub message: Option<String>,
    pub security_question: Option<String>,
    pub security_answer: Option<String>,
    pub from_wallet: bool,
}

/// Suggested share of a category's spending for each participant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SettlementSuggestion {
    pub category: String,
    pub total_spent: f64,
    pub expense_count: usize,
    pub suggested_split: f64,
    pub reason: String,
}

/// Result of a send: the transfer plus the wallet entry when paid from it.
#[derive(Clone, Debug, PartialEq)]
pub struct SentTransfer {
    pub transfer: InteracTransfer,
    pub wallet_transaction: Option<WalletTransaction>,
}

impl Ledger {
    /// Sends a simulated e-Transfer.
    ///
    /// From the wallet it is an `interac_transfer` debit; otherwise it needs a
    /// budget and is taken out of `remaining`.
    pub fn send_interac(
        &mut self,
        send: SendInterac,
        now: DateTime<Utc>,
    ) -> ResultEngine<SentTransfer> {
        let amount = money::positive_cents(send.amount, "amount")?;
        let recipient = normalize_required(&send.recipient_email, "recipient email")?;
        let has_security = normalize_optional(send.security_question.as_deref()).is_some()
            && normalize_optional(send.security_answer.as_deref()).is_some();

        let wallet_transaction = if send.from_wallet {
            let description = format!(
                "Interac e-Transfer to {recipient} ({})",
                money::format_amount(amount)
            );
            let mut wallet = self.wallet.clone().unwrap_or_default();
            let tx = wallet.deduct_funds(
                amount,
                &description,
                WalletTransactionKind::InteracTransfer,
                now,
            )?;
            self.wallet = Some(wallet);
            Some(tx)
        } else {
            self.require_budget()?;
            if !money::covers(self.remaining, amount) {
                return Err(EngineError::ExceedsRemaining {
                    amount,
                    remaining: self.remaining,
                });
            }
            self.remaining = money::round_cents(self.remaining - amount);
            None
        };

        let transfer = InteracTransfer {
            id: generate_reference("INT"),
            kind: TransferKind::Send,
            recipient,
            amount,
            message: normalize_optional(send.message.as_deref()),
            has_security,
            from_wallet: send.from_wallet,
            expense_index: None,
            status: TransactionStatus::Completed,
            timestamp: now,
        };
        self.transactions.push(transfer.clone());
        Ok(SentTransfer {
            transfer,
            wallet_transaction,
        })
    }

    /// Records a pending request for money.
    pub fn request_money(
        &mut self,
        requester_email: &str,
        amount: f64,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> ResultEngine<MoneyRequest> {
        let amount = money::positive_cents(amount, "amount")?;
        let requester = normalize_required(requester_email, "requester email")?;
        let request = MoneyRequest {
            id: generate_reference("REQ"),
            requester,
            amount,
            reason: normalize_optional(reason),
            status: TransactionStatus::Pending,
            timestamp: now,
        };
        self.money_requests.push(request.clone());
        Ok(request)
    }

    /// Settles the expense at `index` with a transfer to `recipient_email`.
    ///
    /// The budget is not touched: the expense was already counted.
    pub fn settle_expense(
        &mut self,
        index: usize,
        recipient_email: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<InteracTransfer> {
        let recipient = normalize_required(recipient_email, "recipient email")?;
        let expense = self.expense(index)?;
        if expense.settlement_id.is_some() {
            return Err(EngineError::InvalidInput(format!(
                "expense {index} is already settled"
            )));
        }

        let transfer = InteracTransfer {
            id: generate_reference("SET"),
            kind: TransferKind::Settlement,
            recipient,
            amount: expense.amount,
            message: Some(format!("Settlement for {} expense", expense.category)),
            has_security: false,
            from_wallet: false,
            expense_index: Some(index),
            status: TransactionStatus::Completed,
            timestamp: now,
        };
        self.expenses[index].settlement_id = Some(transfer.id.clone());
        self.transactions.push(transfer.clone());
        Ok(transfer)
    }

    /// Per-category share when spending is split `split_ways` ways, largest
    /// first.
    pub fn settlement_suggestions(&self, split_ways: u32) -> Vec<SettlementSuggestion> {
        let ways = split_ways.max(1);
        let mut by_category: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
        for expense in &self.expenses {
            let entry = by_category.entry(expense.category.as_str()).or_default();
            entry.0 += expense.amount;
            entry.1 += 1;
        }

        let mut suggestions: Vec<SettlementSuggestion> = by_category
            .into_iter()
            .filter(|(_, (total, _))| *total > 0.0)
            .map(|(category, (total, count))| SettlementSuggestion {
                category: category.to_string(),
                total_spent: money::round_cents(total),
                expense_count: count,
                suggested_split: money::round_cents(total / f64::from(ways)),
                reason: format!(
                    "Split {count} {category} expense(s) totalling {} between {ways} people",
                    money::format_amount(total)
                ),
            })
            .collect();
        suggestions.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NewExpense;

    fn send(amount: f64, from_wallet: bool) -> SendInterac {
        SendInterac {
            recipient_email: "sam@example.com".to_string(),
            amount,
            from_wallet,
            ..Default::default()
        }
    }

    #[test]
    fn send_from_budget_debits_remaining_only() {
        let mut ledger = Ledger::new(500.0, &[]).unwrap();
        let categories = ledger.categories.clone();

        let sent = ledger.send_interac(send(120.0, false), Utc::now()).unwrap();

        assert!(sent.wallet_transaction.is_none());
        assert_eq!(ledger.remaining, 380.0);
        assert_eq!(ledger.categories, categories);
        assert_eq!(ledger.transactions.len(), 1);
        assert_eq!(ledger.transactions[0].kind, TransferKind::Send);
    }

    #[test]
    fn send_from_budget_respects_remaining() {
        let mut ledger = Ledger::new(100.0, &[]).unwrap();
        assert!(matches!(
            ledger.send_interac(send(100.5, false), Utc::now()),
            Err(EngineError::ExceedsRemaining { .. })
        ));
        assert_eq!(
            Ledger::default()
                .send_interac(send(1.0, false), Utc::now())
                .unwrap_err(),
            EngineError::NoBudget
        );
    }

    #[test]
    fn send_from_wallet_needs_balance() {
        let mut ledger = Ledger::default();
        assert!(matches!(
            ledger.send_interac(send(10.0, true), Utc::now()),
            Err(EngineError::InsufficientFunds(_))
        ));
        assert!(ledger.transactions.is_empty());
        assert!(ledger.wallet.is_none());

        ledger
            .wallet_mut()
            .add_funds(50.0, "interac_debit", Utc::now())
            .unwrap();
        let sent = ledger.send_interac(send(10.0, true), Utc::now()).unwrap();
        let tx = sent.wallet_transaction.unwrap();
        assert_eq!(tx.kind, WalletTransactionKind::InteracTransfer);
        assert_eq!(ledger.wallet_balance(), 40.0);
        assert!(ledger.transactions[0].from_wallet);
    }

    #[test]
    fn security_requires_question_and_answer() {
        let mut ledger = Ledger::new(100.0, &[]).unwrap();
        let mut req = send(5.0, false);
        req.security_question = Some("Pet?".to_string());
        assert!(!ledger.send_interac(req.clone(), Utc::now()).unwrap().transfer.has_security);
        req.security_answer = Some("Rex".to_string());
        assert!(ledger.send_interac(req, Utc::now()).unwrap().transfer.has_security);
    }

    #[test]
    fn request_money_is_pending_and_free() {
        let mut ledger = Ledger::new(100.0, &[]).unwrap();
        let request = ledger
            .request_money("kim@example.com", 25.0, Some(" pizza "), Utc::now())
            .unwrap();
        assert_eq!(request.status, TransactionStatus::Pending);
        assert_eq!(request.reason.as_deref(), Some("pizza"));
        assert_eq!(ledger.remaining, 100.0);
        assert_eq!(ledger.money_requests.len(), 1);
    }

    #[test]
    fn settle_expense_once() {
        let mut ledger = Ledger::new(100.0, &[]).unwrap();
        assert_eq!(
            ledger
                .settle_expense(0, "kim@example.com", Utc::now())
                .unwrap_err(),
            EngineError::NoExpenses
        );
        ledger
            .add_expense(NewExpense::new("food", 40.0), Utc::now())
            .unwrap();

        let transfer = ledger
            .settle_expense(0, "kim@example.com", Utc::now())
            .unwrap();
        assert_eq!(transfer.amount, 40.0);
        assert_eq!(transfer.kind, TransferKind::Settlement);
        assert_eq!(ledger.expenses[0].settlement_id, Some(transfer.id));
        assert_eq!(ledger.remaining, 60.0);

        assert!(matches!(
            ledger.settle_expense(0, "kim@example.com", Utc::now()),
            Err(EngineError::InvalidInput(_))
        ));
        assert_eq!(
            ledger
                .settle_expense(3, "kim@example.com", Utc::now())
                .unwrap_err(),
            EngineError::IndexOutOfRange { index: 3, len: 1 }
        );
    }

    #[test]
    fn suggestions_split_largest_category_first() {
        let mut ledger = Ledger::new(1000.0, &[]).unwrap();
        for (category, amount) in [("food", 30.0), ("venue", 100.0), ("food", 20.0)] {
            ledger
                .add_expense(NewExpense::new(category, amount), Utc::now())
                .unwrap();
        }

        let suggestions = ledger.settlement_suggestions(2);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, "venue");
        assert_eq!(suggestions[0].suggested_split, 50.0);
        assert_eq!(suggestions[1].category, "food");
        assert_eq!(suggestions[1].expense_count, 2);
        assert_eq!(suggestions[1].suggested_split, 25.0);
    }
}
