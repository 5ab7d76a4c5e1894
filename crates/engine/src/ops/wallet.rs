use chrono::Utc;
use serde::Serialize;

use crate::{ResultEngine, WalletStats, WalletTransaction};

use super::{Engine, with_ledger};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FundsAdded {
    pub transaction: WalletTransaction,
    pub new_balance: f64,
}

impl Engine {
    /// `0` when there is no ledger or the wallet was never used.
    pub fn wallet_balance(&self) -> f64 {
        self.ledger().map_or(0.0, |l| l.wallet_balance())
    }

    /// Credits the wallet. Works without a budget: a missing ledger is
    /// created empty.
    pub fn add_funds(&self, amount: f64, payment_method: &str) -> ResultEngine<FundsAdded> {
        with_ledger!(self, |ledger| {
            let wallet = ledger.wallet_mut();
            let transaction = wallet.add_funds(amount, payment_method, Utc::now())?;
            let new_balance = wallet.balance;
            tracing::debug!(amount, new_balance, "wallet funded");
            Ok(FundsAdded {
                transaction,
                new_balance,
            })
        })
    }

    /// Newest first, at most `limit` entries when given.
    pub fn wallet_transactions(&self, limit: Option<usize>) -> Vec<WalletTransaction> {
        self.ledger()
            .and_then(|l| l.wallet)
            .map(|w| w.list_transactions(limit).into_iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn wallet_stats(&self) -> WalletStats {
        self.ledger()
            .and_then(|l| l.wallet)
            .unwrap_or_default()
            .stats()
    }
}
