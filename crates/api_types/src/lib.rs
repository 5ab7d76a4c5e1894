use serde::{Deserialize, Serialize};

/// Plain `{status, message}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusMessage {
    pub status: String,
    pub message: String,
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub total_budget: f64,
        /// Carry the current wallet over to the new budget.
        #[serde(default)]
        pub keep_wallet: bool,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub category: String,
        pub amount: f64,
        #[serde(default)]
        pub vendor_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Reallocate {
        pub from_category: String,
        pub to_category: String,
        pub amount: f64,
    }

    /// Receipt contents as already-extracted text.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReceiptUpload {
        pub text: String,
        pub filename: String,
        /// Overrides the detected category when set.
        #[serde(default)]
        pub category: Option<String>,
    }
}

pub mod wallet {
    use super::*;

    fn default_payment_method() -> String {
        "interac_debit".to_string()
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AddFunds {
        pub amount: f64,
        /// `interac_debit`, `interac_online` or `interac_transfer`.
        #[serde(default = "default_payment_method")]
        pub payment_method: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionsQuery {
        pub limit: Option<usize>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletBalance {
        pub balance: f64,
        pub formatted: String,
    }
}

pub mod interac {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SendInterac {
        pub recipient_email: String,
        pub amount: f64,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub security_question: Option<String>,
        #[serde(default)]
        pub security_answer: Option<String>,
        #[serde(default)]
        pub from_wallet: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RequestMoney {
        pub requester_email: String,
        pub amount: f64,
        #[serde(default)]
        pub reason: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettleExpense {
        pub expense_index: usize,
        pub recipient_email: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SuggestionsQuery {
        pub split_ways: Option<u32>,
    }
}

pub mod shop {
    use super::*;

    fn yes() -> bool {
        true
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Purchase {
        /// Position in the balanced search results for `category`.
        pub product_index: usize,
        pub category: String,
        #[serde(default = "yes")]
        pub auto_add_expense: bool,
        #[serde(default)]
        pub use_wallet: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Filter {
        pub id: String,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OptimizeOption {
        pub id: String,
        pub name: String,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Categories {
        pub categories: Vec<String>,
        pub filters: Vec<Filter>,
        pub optimize_options: Vec<OptimizeOption>,
    }
}
