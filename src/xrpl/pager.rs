use crate::entity::FeedError;
use crate::xrpl::client::{LedgerApi, LedgerApiError};
use crate::xrpl::models::{AccountTxPage, AccountTxParams, RawTransaction};
use futures::stream::{self, Stream};
use log::{info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// `ledger_index_max` value meaning "latest validated ledger"
const LATEST_VALIDATED: i64 = -1;

/// Bounded exponential backoff for page requests
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

enum Cursor {
    Start,
    Marker(Value),
    Done,
}

/// Walks an account's history forward, one `account_tx` page at a time
#[derive(Clone)]
pub struct TransactionPager {
    api: Arc<dyn LedgerApi>,
    account: String,
    page_size: u32,
    retry: RetryPolicy,
}

impl TransactionPager {
    pub fn new(api: Arc<dyn LedgerApi>, account: &str, page_size: u32, retry: RetryPolicy) -> Self {
        Self {
            api,
            account: account.to_string(),
            page_size,
            retry,
        }
    }

    /// Lazily fetch pages from `ledger_index` through the latest validated
    /// ledger in ascending order.
    ///
    /// The stream ends after the page without a marker, or right after yielding
    /// `FeedError::FetchFailed`. Calling this again with the same index replays
    /// the same history.
    pub fn fetch_from(
        &self,
        ledger_index: i64,
    ) -> impl Stream<Item = Result<Vec<RawTransaction>, FeedError>> + Send + 'static {
        let api = self.api.clone();
        let retry = self.retry.clone();
        let params = AccountTxParams {
            account: self.account.clone(),
            ledger_index_min: ledger_index,
            ledger_index_max: LATEST_VALIDATED,
            limit: self.page_size,
            forward: true,
            marker: None,
        };

        stream::try_unfold(Cursor::Start, move |cursor| {
            let api = api.clone();
            let retry = retry.clone();
            let mut params = params.clone();

            async move {
                params.marker = match cursor {
                    Cursor::Done => return Ok(None),
                    Cursor::Start => None,
                    Cursor::Marker(marker) => Some(marker),
                };

                let page = fetch_page_with_retry(api.as_ref(), &params, &retry).await?;
                info!(
                    "Fetched {} transactions for {} (more pages: {})",
                    page.transactions.len(),
                    params.account,
                    page.marker.is_some()
                );

                let next = match page.marker {
                    Some(marker) => Cursor::Marker(marker),
                    None => Cursor::Done,
                };

                Ok::<_, FeedError>(Some((page.transactions, next)))
            }
        })
    }
}

async fn fetch_page_with_retry(
    api: &dyn LedgerApi,
    params: &AccountTxParams,
    retry: &RetryPolicy,
) -> Result<AccountTxPage, FeedError> {
    let mut attempt = 0;

    loop {
        attempt += 1;

        match api.account_tx(params).await {
            Ok(page) => return Ok(page),
            Err(e) if e.is_retryable() && attempt <= retry.max_retries => {
                let delay = retry.delay_for(attempt);
                warn!(
                    "Page fetch failed (attempt {}), retrying in {:?}: {}",
                    attempt, delay, e
                );
                sleep(delay).await;
            }
            Err(e) => return Err(fetch_failed(attempt, e)),
        }
    }
}

fn fetch_failed(attempts: u32, error: LedgerApiError) -> FeedError {
    FeedError::FetchFailed {
        attempts,
        reason: error.to_string(),
    }
}
