//! The module contains the `Ledger`, the single aggregate persisted by a
//! [`LedgerStore`](crate::LedgerStore).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    EngineError, Expense, InteracTransfer, MoneyRequest, ResultEngine, Wallet, allocation,
    money,
};

/// Budget totals, category balances, expenses, wallet and transfer records.
///
/// `remaining` and the category balances are decremented independently by
/// expenses; a reallocation only moves money between categories and never
/// touches `remaining`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub total_budget: f64,
    /// Funds left in each category. May go negative.
    #[serde(default)]
    pub categories: BTreeMap<String, f64>,
    #[serde(default)]
    pub remaining: f64,
    /// Expense position is its public identity.
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet: Option<Wallet>,
    #[serde(default)]
    pub transactions: Vec<InteracTransfer>,
    #[serde(default)]
    pub money_requests: Vec<MoneyRequest>,
}

/// Result of a successful reallocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reallocation {
    pub from_category: String,
    pub to_category: String,
    pub amount: f64,
    pub from_balance: f64,
    pub to_balance: f64,
}

impl Ledger {
    /// Creates a fresh ledger for `total_budget`.
    ///
    /// `history` (usually the previous ledger's expenses) adapts the category
    /// split, see [`allocation::split`]. The new ledger has no wallet.
    pub fn new(total_budget: f64, history: &[Expense]) -> ResultEngine<Self> {
        let total_budget = money::positive_cents(total_budget, "total budget")?;
        Ok(Self {
            total_budget,
            categories: allocation::split(total_budget, history),
            remaining: total_budget,
            ..Default::default()
        })
    }

    /// `true` once a budget has been created.
    pub fn has_budget(&self) -> bool {
        self.total_budget > 0.0
    }

    pub(crate) fn require_budget(&self) -> ResultEngine<()> {
        if !self.has_budget() {
            return Err(EngineError::NoBudget);
        }
        Ok(())
    }

    pub(crate) fn require_category(&self, category: &str) -> ResultEngine<()> {
        if !self.categories.contains_key(category) {
            return Err(EngineError::UnknownCategory(category.to_string()));
        }
        Ok(())
    }

    /// Money spent against the budget so far.
    pub fn spent(&self) -> f64 {
        self.total_budget - self.remaining
    }

    /// Returns the wallet, creating an empty one on first use.
    pub fn wallet_mut(&mut self) -> &mut Wallet {
        self.wallet.get_or_insert_with(Wallet::default)
    }

    /// Wallet balance, `0` when the wallet was never used.
    pub fn wallet_balance(&self) -> f64 {
        self.wallet.as_ref().map_or(0.0, |w| w.balance)
    }

    /// Moves `amount` from one category to another.
    ///
    /// Rejected, never clamped, when `from` holds less than `amount`.
    pub fn reallocate_funds(
        &mut self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> ResultEngine<Reallocation> {
        self.require_budget()?;
        let amount = money::positive_cents(amount, "amount")?;
        self.require_category(from)?;
        self.require_category(to)?;
        if from == to {
            return Err(EngineError::InvalidInput(
                "source and destination categories must differ".to_string(),
            ));
        }

        let available = self.categories[from];
        if !money::covers(available, amount) {
            return Err(EngineError::InsufficientFunds(format!(
                "{from} has {}, cannot move {}",
                money::format_amount(available),
                money::format_amount(amount)
            )));
        }

        let from_balance = available - amount;
        let to_balance = self.categories[to] + amount;
        self.categories.insert(from.to_string(), from_balance);
        self.categories.insert(to.to_string(), to_balance);

        Ok(Reallocation {
            from_category: from.to_string(),
            to_category: to.to_string(),
            amount,
            from_balance,
            to_balance,
        })
    }
}
