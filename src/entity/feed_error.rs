#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Ledger fetch failed after {attempts} attempt(s): {reason}")]
    FetchFailed { attempts: u32, reason: String },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Memo is neither readable hex nor base64")]
    DecodeAmbiguous,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

