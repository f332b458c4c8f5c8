use std::sync::Arc;

use sqlx::PgPool;

use crate::entity::FeedError;
use crate::interactor::ingestion_interactor::IngestionInteractorImpl;
use crate::interactor::ledger_store::{LedgerStore, PgLedgerStore};
use crate::settings::Settings;
use crate::xrpl::client::{LedgerApi, XrplRpcClient};
use crate::xrpl::filter::TokenFilter;
use crate::xrpl::pager::TransactionPager;

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    db_pool: Arc<PgPool>,
    ledger_api: Arc<dyn LedgerApi>,
    settings: Settings,
}

impl ServiceContainer {
    /// Create a container talking to the configured rippled endpoint
    pub fn new(db_pool: Arc<PgPool>, settings: Settings) -> Result<Self, FeedError> {
        let client = XrplRpcClient::new(&settings.rpc_url, settings.request_timeout())
            .map_err(|e| FeedError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(Self::with_ledger_api(db_pool, Arc::new(client), settings))
    }

    /// Create a container around an existing ledger API implementation
    pub fn with_ledger_api(
        db_pool: Arc<PgPool>,
        ledger_api: Arc<dyn LedgerApi>,
        settings: Settings,
    ) -> Self {
        Self {
            db_pool,
            ledger_api,
            settings,
        }
    }

    pub fn db_pool(&self) -> Arc<PgPool> {
        self.db_pool.clone()
    }

    pub fn ledger_api(&self) -> Arc<dyn LedgerApi> {
        self.ledger_api.clone()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger_store(&self) -> Arc<dyn LedgerStore> {
        Arc::new(PgLedgerStore::new(self.db_pool.clone()))
    }

    pub fn token_filter(&self) -> TokenFilter {
        TokenFilter::new(&self.settings.currency_code, &self.settings.issuer_address)
    }

    pub fn transaction_pager(&self) -> TransactionPager {
        TransactionPager::new(
            self.ledger_api(),
            self.settings.source_account(),
            self.settings.page_size,
            self.settings.retry_policy(),
        )
    }

    pub fn ingestion_interactor(&self) -> IngestionInteractorImpl {
        IngestionInteractorImpl::new(
            self.ledger_store(),
            self.transaction_pager(),
            self.token_filter(),
            self.settings.earliest_ledger_index,
        )
    }
}
