//! Persistence of the single ledger document.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use thiserror::Error;

use crate::Ledger;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io: {0}")]
    Io(#[from] std::io::Error),
    #[error("store encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Where the ledger lives between requests.
///
/// `load` never fails: a missing or unreadable document is "no ledger".
pub trait LedgerStore: Send + Sync {
    fn load(&self) -> Option<Ledger>;
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError>;
}

/// One pretty-printed JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl LedgerStore for JsonFileStore {
    fn load(&self) -> Option<Ledger> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "cannot read ledger: {err}");
                return None;
            }
        };
        match serde_json::from_str::<Ledger>(&raw) {
            Ok(mut ledger) => {
                let filled = ledger.backfill_expense_ids();
                if filled > 0 {
                    tracing::debug!(filled, "backfilled expense ids");
                }
                Some(ledger)
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), "corrupt ledger ignored: {err}");
                None
            }
        }
    }

    /// Writes next to the target and renames over it, so readers never see
    /// a half-written document.
    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let encoded = serde_json::to_string_pretty(ledger)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, encoded)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Process-local store, used by tests and `--memory` runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    ledger: Mutex<Option<Ledger>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            ledger: Mutex::new(Some(ledger)),
        }
    }
}

impl LedgerStore for MemoryStore {
    fn load(&self) -> Option<Ledger> {
        self.ledger
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        *self.ledger.lock().unwrap_or_else(PoisonError::into_inner) = Some(ledger.clone());
        Ok(())
    }
}
