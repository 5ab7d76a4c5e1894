use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    AiPurchase, EngineError, NewExpense, ResultEngine, WalletTransaction, WalletTransactionKind,
    money,
    shopper::{self, Preferences},
    util::generate_reference,
};

use super::{Engine, with_ledger};

/// Category used when the shopped category has no budget line.
const FALLBACK_CATEGORY: &str = "misc";

/// A purchase request against a balanced search of `category`.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseOrder {
    /// Position in the balanced search results.
    pub product_index: usize,
    pub category: String,
    pub auto_add_expense: bool,
    pub use_wallet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Wallet,
    Interac,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Purchase {
    pub purchase_id: String,
    pub product_name: String,
    pub vendor: String,
    pub original_price: f64,
    pub final_price: f64,
    pub savings: f64,
    pub estimated_delivery: String,
    pub ai_reasoning: String,
    pub payment_method: PaymentMethod,
    pub wallet_transaction: Option<WalletTransaction>,
    pub expense_added: bool,
    pub expense_index: Option<usize>,
    pub remaining_budget: Option<f64>,
    pub warning: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl Engine {
    /// Buys a product from the balanced search results.
    ///
    /// Wallet payment and the optional expense commit together. A price
    /// above `remaining` does not fail the purchase; it only skips the
    /// expense and reports a warning.
    pub fn purchase(&self, order: PurchaseOrder) -> ResultEngine<Purchase> {
        let prefs = Preferences::balanced(order.category.trim());
        let results = shopper::search(&prefs);
        let item = results
            .get(order.product_index)
            .ok_or_else(|| EngineError::InvalidInput("Invalid product selection".to_string()))?;
        let product = &item.product;
        let price = item.discounted_price;
        let now = Utc::now();
        let purchase_id = generate_reference("PUR");
        let ai_reasoning = shopper::reasoning(item, Some(&prefs));

        with_ledger!(self, |ledger| {
            let mut purchase = Purchase {
                purchase_id: purchase_id.clone(),
                product_name: product.name.clone(),
                vendor: product.vendor.clone(),
                original_price: product.price,
                final_price: price,
                savings: item.savings,
                estimated_delivery: shopper::delivery_estimate(product),
                ai_reasoning: ai_reasoning.clone(),
                payment_method: PaymentMethod::Interac,
                wallet_transaction: None,
                expense_added: false,
                expense_index: None,
                remaining_budget: None,
                warning: None,
                timestamp: now,
            };

            if order.use_wallet {
                ledger.require_budget()?;
                let balance = ledger.wallet_balance();
                if !money::covers(balance, price) {
                    return Err(EngineError::InsufficientWalletBalance {
                        balance,
                        required: price,
                    });
                }
                let description = format!("AI Purchase: {} from {}", product.name, product.vendor);
                let mut wallet = ledger.wallet.clone().unwrap_or_default();
                let tx = wallet.deduct_funds(
                    price,
                    &description,
                    WalletTransactionKind::AiPurchase,
                    now,
                )?;
                ledger.wallet = Some(wallet);
                purchase.payment_method = PaymentMethod::Wallet;
                purchase.wallet_transaction = Some(tx);
            }

            if order.auto_add_expense {
                ledger.require_budget()?;
                let category = if ledger.categories.contains_key(prefs.category.as_str()) {
                    prefs.category.clone()
                } else {
                    FALLBACK_CATEGORY.to_string()
                };

                if !money::covers(ledger.remaining, price) {
                    purchase.warning = Some(format!(
                        "Purchase successful but not added to expenses: exceeds remaining budget ({})",
                        money::format_amount(ledger.remaining)
                    ));
                } else {
                    let new = NewExpense {
                        ai_purchase: Some(AiPurchase {
                            purchase_id,
                            vendor: product.vendor.clone(),
                            product_name: product.name.clone(),
                            original_price: product.price,
                            savings: item.savings,
                            ai_reasoning,
                        }),
                        ..NewExpense::new(category, price)
                    };
                    let index = ledger.add_expense(new, now)?;
                    purchase.expense_added = true;
                    purchase.expense_index = Some(index);
                    purchase.remaining_budget = Some(ledger.remaining);
                }
            }

            tracing::debug!(
                id = %purchase.purchase_id,
                price,
                wallet = order.use_wallet,
                expense_added = purchase.expense_added,
                "purchase completed"
            );
            Ok(purchase)
        })
    }
}
