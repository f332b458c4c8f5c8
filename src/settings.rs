use crate::entity::FeedError;
use crate::xrpl::RetryPolicy;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DEFAULT_RPC_URL: &str = "https://s1.ripple.com:51234/";
pub const DEFAULT_CURRENCY_CODE: &str = "PFT";
pub const DEFAULT_ISSUER_ADDRESS: &str = "rnQUEEg8yyjrwk9FhyXpKavHyCRJM9BDMW";

const CONFIG_FILE: &str = "xrpl-token-feed";
const ENV_PREFIX: &str = "FEED";

/// Runtime settings, layered as defaults < `xrpl-token-feed.toml` < `FEED_*`
/// environment variables. `DATABASE_URL` is read unprefixed.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// rippled JSON-RPC endpoint
    pub rpc_url: String,

    /// Token currency code, readable or 40-hex form
    pub currency_code: String,

    /// Token issuer address
    pub issuer_address: String,

    /// Account whose history is ingested; the issuer when unset
    #[serde(default)]
    pub account: Option<String>,

    pub database_url: String,
    pub max_connections: u32,

    /// `account_tx` page size
    pub page_size: u32,

    /// Start of history on an empty table (-1 = earliest ledger the server has)
    pub earliest_ledger_index: i64,

    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub request_timeout_secs: u64,
}

impl Settings {
    /// Load settings from the config file and environment
    pub fn load() -> Result<Self, FeedError> {
        let builder = Self::defaults()?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("database_url", env::var("DATABASE_URL").ok())?;

        Self::from_builder(builder)
    }

    /// Builder pre-populated with every default
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, FeedError> {
        Ok(config::Config::builder()
            .set_default("rpc_url", DEFAULT_RPC_URL)?
            .set_default("currency_code", DEFAULT_CURRENCY_CODE)?
            .set_default("issuer_address", DEFAULT_ISSUER_ADDRESS)?
            .set_default("max_connections", 5)?
            .set_default("page_size", 400)?
            .set_default("earliest_ledger_index", -1)?
            .set_default("max_retries", 3)?
            .set_default("retry_base_delay_ms", 500)?
            .set_default("request_timeout_secs", 20)?)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, FeedError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()
    }

    fn validate(self) -> Result<Self, FeedError> {
        if self.page_size == 0 {
            return Err(FeedError::InvalidConfig("page_size must be positive".to_string()));
        }
        if self.currency_code.trim().is_empty() {
            return Err(FeedError::InvalidConfig("currency_code is empty".to_string()));
        }
        if self.issuer_address.trim().is_empty() {
            return Err(FeedError::InvalidConfig("issuer_address is empty".to_string()));
        }
        if self.source_account().trim().is_empty() {
            return Err(FeedError::InvalidConfig("account is empty".to_string()));
        }

        Ok(self)
    }

    pub fn source_account(&self) -> &str {
        self.account.as_deref().unwrap_or(&self.issuer_address)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            ..RetryPolicy::default()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
