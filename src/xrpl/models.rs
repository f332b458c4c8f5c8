// src/xrpl/models.rs
use log::warn;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Upper bound (exclusive) of a NUMERIC(18, 6) column.
const MAX_STORED_AMOUNT: i64 = 1_000_000_000_000;
const AMOUNT_SCALE: u32 = 6;

/// JSON-RPC envelope used by rippled: `{"method": ..., "params": [ ... ]}`
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: Serialize> {
    pub method: &'a str,
    pub params: [P; 1],
}

/// Parameters of the `account_tx` method
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountTxParams {
    pub account: String,
    pub ledger_index_min: i64,
    pub ledger_index_max: i64,
    pub limit: u32,
    pub forward: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: AccountTxResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountTxResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Value>,
    #[serde(default)]
    pub marker: Option<Value>,
}

impl AccountTxResult {
    /// Decode entries one by one so a single unexpected entry cannot fail the page
    pub fn into_page(self) -> AccountTxPage {
        AccountTxPage {
            transactions: self
                .transactions
                .into_iter()
                .map(RawTransaction::from_entry)
                .collect(),
            marker: self.marker,
        }
    }
}

/// One page of account history plus the continuation marker, if any
#[derive(Debug, Clone, Default)]
pub struct AccountTxPage {
    pub transactions: Vec<RawTransaction>,
    pub marker: Option<Value>,
}

/// An entry of `account_tx`: the transaction, its metadata and validation flag.
///
/// API v1 nests `hash` and `ledger_index` inside `tx`; API v2 names the object
/// `tx_json` and lifts both fields to the entry. Both shapes are accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, alias = "tx_json")]
    pub tx: TransactionFields,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub ledger_index: Option<i64>,
    #[serde(default)]
    pub validated: Option<bool>,
    /// Set when the entry did not match the expected shape
    #[serde(skip)]
    pub undecodable: bool,
}

impl RawTransaction {
    /// Decode one `account_tx` entry. An entry of unexpected shape keeps only
    /// its hash and ledger index and is marked `undecodable`.
    pub fn from_entry(entry: Value) -> Self {
        match serde_json::from_value::<RawTransaction>(entry.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                let tx = entry.get("tx").or_else(|| entry.get("tx_json"));
                let field = |name: &str| {
                    entry
                        .get(name)
                        .or_else(|| tx.and_then(|tx| tx.get(name)))
                        .cloned()
                };
                let hash = field("hash").and_then(|v| v.as_str().map(str::to_string));
                let ledger_index = field("ledger_index").and_then(|v| v.as_i64());

                warn!("Undecodable account_tx entry {:?}: {}", hash, e);
                RawTransaction {
                    hash,
                    ledger_index,
                    undecodable: true,
                    ..RawTransaction::default()
                }
            }
        }
    }

    pub fn hash(&self) -> Option<&str> {
        self.tx.hash.as_deref().or(self.hash.as_deref())
    }

    pub fn ledger_index(&self) -> Option<i64> {
        self.tx.ledger_index.or(self.ledger_index)
    }

    pub fn result_code(&self) -> Option<&str> {
        self.meta.as_ref()?.transaction_result.as_deref()
    }

    /// The amount that actually moved: `delivered_amount` when the ledger
    /// reports it, the instructed `Amount` otherwise.
    pub fn settled_amount(&self) -> Option<&LedgerAmount> {
        let delivered = self
            .meta
            .as_ref()
            .and_then(|meta| {
                meta.delivered_amount
                    .as_ref()
                    .or(meta.delivered_amount_field.as_ref())
            })
            .filter(|amount| !amount.is_unavailable());

        delivered.or_else(|| self.tx.amount.as_ref().or(self.tx.deliver_max.as_ref()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionFields {
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub amount: Option<LedgerAmount>,
    #[serde(default)]
    pub deliver_max: Option<LedgerAmount>,
    #[serde(default)]
    pub memos: Vec<MemoWrapper>,
    #[serde(default, rename = "hash")]
    pub hash: Option<String>,
    #[serde(default, rename = "ledger_index")]
    pub ledger_index: Option<i64>,
    /// Ledger close time in seconds since the Ripple epoch
    #[serde(default, rename = "date")]
    pub date: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionMeta {
    #[serde(default, rename = "TransactionResult")]
    pub transaction_result: Option<String>,
    #[serde(default)]
    pub delivered_amount: Option<LedgerAmount>,
    #[serde(default, rename = "DeliveredAmount")]
    pub delivered_amount_field: Option<LedgerAmount>,
}

/// An issued-currency amount object, native XRP in drops, or any other asset
/// shape (e.g. MPT amounts) kept as raw JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerAmount {
    Issued(IssuedAmount),
    Drops(String),
    Other(Value),
}

impl LedgerAmount {
    /// rippled reports `"unavailable"` as the delivered amount of pre-2014 payments
    fn is_unavailable(&self) -> bool {
        matches!(self, LedgerAmount::Drops(value) if value == "unavailable")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedAmount {
    pub currency: String,
    pub issuer: String,
    pub value: String,
}

impl IssuedAmount {
    /// Parses `value` into a 6-decimal amount.
    ///
    /// Returns `None` for unparsable, negative or out-of-range values.
    pub fn to_decimal(&self) -> Option<Decimal> {
        let value = self.value.trim();
        let parsed = Decimal::from_str(value)
            .or_else(|_| Decimal::from_scientific(value))
            .ok()?;

        if parsed.is_sign_negative() && !parsed.is_zero() {
            return None;
        }

        let rounded =
            parsed.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if rounded >= Decimal::from(MAX_STORED_AMOUNT) {
            return None;
        }

        Some(rounded)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoWrapper {
    #[serde(rename = "Memo")]
    pub memo: Memo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Memo {
    #[serde(default)]
    pub memo_type: Option<String>,
    #[serde(default)]
    pub memo_data: Option<String>,
    #[serde(default)]
    pub memo_format: Option<String>,
}
