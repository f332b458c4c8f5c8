mod feed_error;
mod ingestion_report;
mod transaction_record;

pub use feed_error::FeedError;
pub use ingestion_report::IngestionReport;
pub use transaction_record::{InsertOutcome, TransactionRecord};
