use crate::entity::{FeedError, InsertOutcome, TransactionRecord};
use crate::interactor::db;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

/// Persistence seam of the ingestion pipeline
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Highest persisted ledger index, `None` if nothing is stored yet
    async fn max_ledger_index(&self) -> Result<Option<i64>, FeedError>;

    /// Insert the record unless a record with the same hash exists.
    /// An existing hash is reported as `InsertOutcome::AlreadyPresent`, not as an error.
    async fn insert_if_absent(&self, record: &TransactionRecord) -> Result<InsertOutcome, FeedError>;
}

pub struct PgLedgerStore {
    db_pool: Arc<PgPool>,
}

impl PgLedgerStore {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn max_ledger_index(&self) -> Result<Option<i64>, FeedError> {
        Ok(db::get_max_ledger_index(&self.db_pool).await?)
    }

    async fn insert_if_absent(&self, record: &TransactionRecord) -> Result<InsertOutcome, FeedError> {
        let result = db::insert_transaction_if_absent(&self.db_pool, record).await?;

        Ok(if result.rows_affected() == 0 {
            InsertOutcome::AlreadyPresent
        } else {
            InsertOutcome::Inserted
        })
    }
}
