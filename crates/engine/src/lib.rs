//! Budget ledger engine.
//!
//! The [`Ledger`] is the single aggregate: budget totals, category balances,
//! expenses, an optional [`Wallet`] and transfer records. Pure operations live
//! on the ledger itself; [`Engine`] runs them against a [`LedgerStore`] with
//! load, mutate and save under one lock.

pub use error::EngineError;
pub use expenses::{
    AiPurchase, BulkPayment, BulkPaymentStatus, Expense, ExpenseStatus, NewExpense, VendorPayment,
};
pub use ledger::{Ledger, Reallocation};
pub use ops::{
    Dashboard, Engine, EngineBuilder, ExpenseChange, FundsAdded, PaymentMethod, Purchase,
    PurchaseOrder, ReceiptUpload, TransferHistory,
};
pub use receipts::{ReceiptAnalysis, ReceiptVerification, VerificationStatus};
pub use recommendations::{
    DepletionPrediction, Insights, Priority, Recommendation, RecommendationKind, RiskLevel,
};
pub use store::{JsonFileStore, LedgerStore, MemoryStore, StoreError};
pub use transfers::{
    InteracTransfer, MoneyRequest, SendInterac, SentTransfer, SettlementSuggestion, TransferKind,
};
pub use wallet::{TransactionStatus, Wallet, WalletStats, WalletTransaction, WalletTransactionKind};

pub mod allocation;
pub mod money;
pub mod receipts;
pub mod recommendations;
pub mod shopper;

mod error;
mod expenses;
mod ledger;
mod ops;
mod store;
mod transfers;
mod util;
mod wallet;

pub type ResultEngine<T> = Result<T, EngineError>;
