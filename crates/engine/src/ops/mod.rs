use std::sync::{Arc, Mutex, PoisonError};

use crate::{Ledger, LedgerStore, MemoryStore, ResultEngine};

mod budget;
mod expenses;
mod shopping;
mod transfers;
mod wallet;

pub use budget::Dashboard;
pub use expenses::{ExpenseChange, ReceiptUpload};
pub use shopping::{PaymentMethod, Purchase, PurchaseOrder};
pub use transfers::TransferHistory;
pub use wallet::FundsAdded;

/// Run a block against the stored ledger, saving it only when the block
/// succeeded and changed something.
///
/// The ledger is loaded under the engine lock; a missing document starts as
/// an empty [`Ledger`]. An early return through `?` skips the save.
macro_rules! with_ledger {
    ($self:expr, |$ledger:ident| $body:expr) => {{
        let _guard = $self
            .lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let loaded = $self.store.load();
        #[allow(unused_mut)]
        let mut $ledger = loaded.clone().unwrap_or_default();
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                if loaded.as_ref() != Some(&$ledger) {
                    $self.store.save(&$ledger)?;
                    tracing::debug!("ledger saved");
                }
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_ledger;

/// Entry point for every ledger operation.
///
/// Each mutation runs load, mutate, save under one process-wide lock, so
/// concurrent requests cannot lose each other's updates.
pub struct Engine {
    store: Arc<dyn LedgerStore>,
    lock: Mutex<()>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The stored ledger, if any, without taking part in a mutation.
    pub fn ledger(&self) -> Option<Ledger> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.load()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn LedgerStore>>,
}

impl EngineBuilder {
    /// Pass the store holding the ledger document.
    pub fn store(mut self, store: impl LedgerStore + 'static) -> EngineBuilder {
        self.store = Some(Arc::new(store));
        self
    }

    /// Same as [`EngineBuilder::store`] for a store shared with the caller.
    pub fn store_arc(mut self, store: Arc<dyn LedgerStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`. Without a store the ledger lives in memory.
    pub fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            lock: Mutex::new(()),
        })
    }
}
