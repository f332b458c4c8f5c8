use crate::entity::FeedError;
use crate::interactor::ledger_store::LedgerStore;
use log::info;
use std::sync::Arc;

/// Finds where the next ingestion run starts
pub struct CursorTracker {
    store: Arc<dyn LedgerStore>,
    default_index: i64,
}

impl CursorTracker {
    /// `default_index` is used when nothing has been stored yet
    /// (`-1` asks the server for the earliest ledger it has).
    pub fn new(store: Arc<dyn LedgerStore>, default_index: i64) -> Self {
        Self {
            store,
            default_index,
        }
    }

    /// Highest persisted ledger index, inclusive: transactions of that ledger
    /// that were already stored are skipped by hash on insert.
    pub async fn resume_index(&self) -> Result<i64, FeedError> {
        match self.store.max_ledger_index().await? {
            Some(index) => {
                info!("Resuming from ledger_index {}", index);
                Ok(index)
            }
            None => {
                info!(
                    "No stored transactions, starting from ledger_index {}",
                    self.default_index
                );
                Ok(self.default_index)
            }
        }
    }
}
