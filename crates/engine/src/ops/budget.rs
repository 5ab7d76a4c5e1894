use serde::Serialize;

use crate::{Insights, Ledger, ResultEngine, recommendations};

use super::{Engine, with_ledger};

/// The stored ledger together with the rule-based analysis over it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Dashboard {
    pub ledger: Option<Ledger>,
    pub insights: Insights,
}

impl Engine {
    /// Replaces the ledger with a fresh budget.
    ///
    /// The previous ledger's expenses drive the category split. The wallet
    /// is dropped unless `keep_wallet` carries it forward.
    pub fn create_budget(&self, total_budget: f64, keep_wallet: bool) -> ResultEngine<Ledger> {
        with_ledger!(self, |ledger| {
            let mut fresh = Ledger::new(total_budget, &ledger.expenses)?;
            if keep_wallet {
                fresh.wallet = ledger.wallet.take();
            }
            ledger = fresh;
            tracing::debug!(total_budget, keep_wallet, "budget created");
            Ok(ledger.clone())
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        let ledger = self.ledger();
        Dashboard {
            insights: recommendations::insights(ledger.as_ref()),
            ledger,
        }
    }
}
