//! Test doubles shared by the pipeline tests: a scripted ledger API and an
//! in-memory store with the same insert-if-absent semantics as PostgreSQL.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use xrpl_token_feed::{
    AccountTxPage, AccountTxParams, FeedError, IngestionInteractorImpl, InsertOutcome, LedgerApi,
    LedgerApiError, LedgerStore, RawTransaction, RetryPolicy, TokenFilter, TransactionPager,
    TransactionRecord,
};

pub const ISSUER: &str = "rnQUEEg8yyjrwk9FhyXpKavHyCRJM9BDMW";
pub const ACCOUNT: &str = ISSUER;
pub const CURRENCY: &str = "PFT";

pub fn hex_memo(text: &str) -> Value {
    json!({"Memo": {"MemoData": hex::encode_upper(text)}})
}

/// A validated `account_tx` entry in API v1 shape
pub fn entry(
    hash: &str,
    ledger_index: i64,
    currency: &str,
    result: &str,
    memos: Vec<Value>,
) -> RawTransaction {
    serde_json::from_value(json!({
        "tx": {
            "TransactionType": "Payment",
            "Account": ISSUER,
            "Destination": format!("rDest{}", hash),
            "Amount": {"currency": currency, "issuer": ISSUER, "value": "25.5"},
            "Memos": memos,
            "hash": hash,
            "ledger_index": ledger_index,
            "date": 700_000_000u32
        },
        "meta": {"TransactionResult": result},
        "validated": true
    }))
    .expect("valid account_tx entry")
}

/// A successful payment of a multi-purpose token, which is not an IOU
pub fn mpt_payment(hash: &str, ledger_index: i64) -> RawTransaction {
    let amount = json!({
        "mpt_issuance_id": "0000012FFD9EE5DA93AC614B4DB94D7E0FCE415CA51BED47",
        "value": "100"
    });
    RawTransaction::from_entry(json!({
        "tx": {
            "TransactionType": "Payment",
            "Account": ISSUER,
            "Destination": "rMptHolder",
            "Amount": amount,
            "hash": hash,
            "ledger_index": ledger_index
        },
        "meta": {"TransactionResult": "tesSUCCESS", "delivered_amount": amount},
        "validated": true
    }))
}

pub fn token_payment(hash: &str, ledger_index: i64) -> RawTransaction {
    entry(hash, ledger_index, CURRENCY, "tesSUCCESS", vec![])
}

/// Serves a fixed history, `limit` entries per page, with offset markers.
pub struct ScriptedLedgerApi {
    history: Mutex<Vec<RawTransaction>>,
    calls: Mutex<Vec<AccountTxParams>>,
    failing_calls: Mutex<HashSet<usize>>,
}

impl ScriptedLedgerApi {
    pub fn new(history: Vec<RawTransaction>) -> Arc<Self> {
        Arc::new(Self {
            history: Mutex::new(history),
            calls: Mutex::new(Vec::new()),
            failing_calls: Mutex::new(HashSet::new()),
        })
    }

    pub fn append(&self, raw: RawTransaction) {
        self.history.lock().unwrap().push(raw);
    }

    /// Make the n-th call (0-based, counted over the API's lifetime) fail with `tooBusy`
    pub fn fail_call(&self, call: usize) {
        self.failing_calls.lock().unwrap().insert(call);
    }

    pub fn calls(&self) -> Vec<AccountTxParams> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerApi for ScriptedLedgerApi {
    async fn account_tx(&self, params: &AccountTxParams) -> Result<AccountTxPage, LedgerApiError> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(params.clone());
            calls.len() - 1
        };

        if self.failing_calls.lock().unwrap().contains(&call) {
            return Err(LedgerApiError::Rpc {
                code: "tooBusy".to_string(),
                message: "The server is too busy to help you now.".to_string(),
            });
        }

        let eligible: Vec<RawTransaction> = self
            .history
            .lock()
            .unwrap()
            .iter()
            .filter(|raw| raw.ledger_index().unwrap_or(0) >= params.ledger_index_min)
            .cloned()
            .collect();

        let offset = params
            .marker
            .as_ref()
            .and_then(|m| m["offset"].as_u64())
            .unwrap_or(0) as usize;
        let end = (offset + params.limit as usize).min(eligible.len());
        let marker = (end < eligible.len()).then(|| json!({"offset": end}));

        Ok(AccountTxPage {
            transactions: eligible[offset.min(end)..end].to_vec(),
            marker,
        })
    }
}

/// In-memory `LedgerStore` keyed by hash
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<String, TransactionRecord>>,
    inserts_before_failure: Mutex<Option<usize>>,
    unavailable: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Accept `n` more insert attempts, then fail every following one
    pub fn fail_after(&self, n: usize) {
        *self.inserts_before_failure.lock().unwrap() = Some(n);
    }

    pub fn heal(&self) {
        *self.inserts_before_failure.lock().unwrap() = None;
        *self.unavailable.lock().unwrap() = false;
    }

    pub fn go_down(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn hashes(&self) -> Vec<String> {
        self.rows.lock().unwrap().keys().cloned().collect()
    }

    pub fn get(&self, hash: &str) -> Option<TransactionRecord> {
        self.rows.lock().unwrap().get(hash).cloned()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn max_ledger_index(&self) -> Result<Option<i64>, FeedError> {
        if *self.unavailable.lock().unwrap() {
            return Err(FeedError::StorageUnavailable(sqlx::Error::PoolTimedOut));
        }

        Ok(self.rows.lock().unwrap().values().map(|r| r.ledger_index).max())
    }

    async fn insert_if_absent(&self, record: &TransactionRecord) -> Result<InsertOutcome, FeedError> {
        {
            let mut budget = self.inserts_before_failure.lock().unwrap();
            match *budget {
                Some(0) => return Err(FeedError::StorageUnavailable(sqlx::Error::PoolClosed)),
                Some(ref mut remaining) => *remaining -= 1,
                None => {}
            }
        }

        let mut rows = self.rows.lock().unwrap();
        if rows.contains_key(&record.transaction_hash) {
            return Ok(InsertOutcome::AlreadyPresent);
        }
        rows.insert(record.transaction_hash.clone(), record.clone());
        Ok(InsertOutcome::Inserted)
    }
}

pub fn no_wait(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

pub fn interactor(
    store: Arc<MemoryStore>,
    api: Arc<ScriptedLedgerApi>,
    page_size: u32,
    max_retries: u32,
) -> IngestionInteractorImpl {
    IngestionInteractorImpl::new(
        store,
        TransactionPager::new(api, ACCOUNT, page_size, no_wait(max_retries)),
        TokenFilter::new(CURRENCY, ISSUER),
        -1,
    )
}
