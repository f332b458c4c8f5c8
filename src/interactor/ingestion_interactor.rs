use crate::entity::{FeedError, IngestionReport, InsertOutcome, TransactionRecord};
use crate::interactor::cursor_interactor::CursorTracker;
use crate::interactor::ledger_store::LedgerStore;
use crate::xrpl::{memo, to_absolute_time, RawTransaction, RejectReason, TokenFilter, TransactionPager};
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use log::{debug, error, info};
use std::sync::Arc;

#[async_trait]
pub trait IngestionInteractor: Send + Sync {
    /// Run one ingestion pass. Never fails as a whole: a fatal error ends the
    /// pass and is carried in the report next to the progress made so far.
    async fn run(&self) -> IngestionReport;
}

pub struct IngestionInteractorImpl {
    store: Arc<dyn LedgerStore>,
    cursor: CursorTracker,
    pager: TransactionPager,
    filter: TokenFilter,
}

impl IngestionInteractorImpl {
    pub fn new(
        store: Arc<dyn LedgerStore>,
        pager: TransactionPager,
        filter: TokenFilter,
        earliest_ledger_index: i64,
    ) -> Self {
        Self {
            cursor: CursorTracker::new(store.clone(), earliest_ledger_index),
            store,
            pager,
            filter,
        }
    }

    // Filter, decode and store one page. Stops at the first storage failure;
    // earlier inserts of the page stay committed.
    async fn process_page(
        &self,
        transactions: Vec<RawTransaction>,
        report: &mut IngestionReport,
    ) -> Result<(), FeedError> {
        for raw in transactions {
            report.fetched += 1;
            if let Some(ledger_index) = raw.ledger_index() {
                report.observe_ledger(ledger_index);
            }

            let record = match self.build_record(&raw, report) {
                Ok(record) => record,
                Err(reason) => {
                    debug!("Skipping {}: {}", raw.hash().unwrap_or("<no hash>"), reason);
                    report.rejected += 1;
                    continue;
                }
            };
            report.accepted += 1;

            match self.store.insert_if_absent(&record).await? {
                InsertOutcome::Inserted => report.inserted += 1,
                InsertOutcome::AlreadyPresent => {
                    debug!("{} already stored", record.transaction_hash);
                    report.already_present += 1;
                }
            }
        }

        Ok(())
    }

    fn build_record(
        &self,
        raw: &RawTransaction,
        report: &mut IngestionReport,
    ) -> Result<TransactionRecord, RejectReason> {
        let amount = self.filter.classify(raw)?;

        let (Some(hash), Some(ledger_index)) = (raw.hash(), raw.ledger_index()) else {
            return Err(RejectReason::Incomplete);
        };

        let (memo, omitted) = memo::extract_memos(&raw.tx.memos);
        report.memos_omitted += omitted;

        Ok(TransactionRecord {
            transaction_hash: hash.to_string(),
            ledger_index,
            from_address: raw.tx.account.clone(),
            to_address: raw.tx.destination.clone(),
            memo,
            amount: amount.to_decimal(),
            created_at: Utc::now(),
            transaction_timestamp: raw.tx.date.map(to_absolute_time),
        })
    }
}

#[async_trait]
impl IngestionInteractor for IngestionInteractorImpl {
    async fn run(&self) -> IngestionReport {
        let mut report = IngestionReport::default();

        let resume_index = match self.cursor.resume_index().await {
            Ok(index) => index,
            Err(e) => {
                error!("Cannot determine resume point: {}", e);
                report.fail(e);
                return report;
            }
        };
        report.resume_index = Some(resume_index);

        info!(
            "Ingesting {} payments issued by {}",
            self.filter.currency(),
            self.filter.issuer()
        );

        let mut pages = Box::pin(self.pager.fetch_from(resume_index));

        while let Some(page) = pages.next().await {
            let transactions = match page {
                Ok(transactions) => transactions,
                Err(e) => {
                    error!("Aborting run: {}", e);
                    report.fail(e);
                    break;
                }
            };

            report.pages += 1;
            if let Err(e) = self.process_page(transactions, &mut report).await {
                error!("Aborting run: {}", e);
                report.fail(e);
                break;
            }

            info!(
                "Page {} done: inserted={} already_present={} highest_ledger_index={:?}",
                report.pages, report.inserted, report.already_present, report.highest_ledger_index
            );
        }

        report
    }
}
