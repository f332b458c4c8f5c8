pub mod cursor_interactor;
pub mod db;
pub mod ingestion_interactor;
pub mod ledger_store;

pub use cursor_interactor::CursorTracker;
pub use ingestion_interactor::{IngestionInteractor, IngestionInteractorImpl};
pub use ledger_store::{LedgerStore, PgLedgerStore};
