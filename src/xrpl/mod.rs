// src/xrpl/mod.rs
pub mod client;
pub mod filter;
pub mod memo;
pub mod models;
pub mod pager;
pub mod time;

// Re-export commonly used items
pub use client::{LedgerApi, LedgerApiError, XrplRpcClient};
pub use filter::{normalize_currency_code, RejectReason, TokenFilter};
pub use models::{
    AccountTxPage, AccountTxParams, IssuedAmount, LedgerAmount, Memo, MemoWrapper, RawTransaction,
    TransactionFields, TransactionMeta,
};
pub use pager::{RetryPolicy, TransactionPager};
pub use time::{to_absolute_time, RIPPLE_EPOCH_OFFSET};
