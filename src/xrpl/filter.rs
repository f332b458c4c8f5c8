use crate::xrpl::models::{IssuedAmount, LedgerAmount, RawTransaction};
use std::fmt;

const PAYMENT: &str = "Payment";
const SUCCESS: &str = "tesSUCCESS";

/// Why a transaction was not ingested. Rejection is routine, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotPayment,
    Failed,
    NativeAmount,
    OtherAsset,
    ForeignToken,
    Incomplete,
    Undecodable,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::NotPayment => write!(f, "not a payment"),
            Self::Failed => write!(f, "not applied by consensus"),
            Self::NativeAmount => write!(f, "native XRP amount"),
            Self::OtherAsset => write!(f, "non-IOU asset amount"),
            Self::ForeignToken => write!(f, "different currency or issuer"),
            Self::Incomplete => write!(f, "missing hash or ledger index"),
            Self::Undecodable => write!(f, "unexpected entry shape"),
        }
    }
}

/// Matches successful payments of one issued token
#[derive(Debug, Clone)]
pub struct TokenFilter {
    currency: String,
    issuer: String,
}

impl TokenFilter {
    pub fn new(currency_code: &str, issuer: &str) -> Self {
        Self {
            currency: normalize_currency_code(currency_code),
            issuer: issuer.to_string(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn is_token_payment(&self, raw: &RawTransaction) -> bool {
        self.classify(raw).is_ok()
    }

    /// Returns the settled token amount of a qualifying payment, or the reason
    /// it does not qualify.
    pub fn classify<'a>(&self, raw: &'a RawTransaction) -> Result<&'a IssuedAmount, RejectReason> {
        if raw.undecodable {
            return Err(RejectReason::Undecodable);
        }

        if raw.tx.transaction_type.as_deref() != Some(PAYMENT) {
            return Err(RejectReason::NotPayment);
        }

        if raw.result_code() != Some(SUCCESS) || raw.validated == Some(false) {
            return Err(RejectReason::Failed);
        }

        let amount = match raw.settled_amount() {
            Some(LedgerAmount::Issued(amount)) => amount,
            Some(LedgerAmount::Other(_)) => return Err(RejectReason::OtherAsset),
            Some(LedgerAmount::Drops(_)) | None => return Err(RejectReason::NativeAmount),
        };

        if amount.currency != self.currency || amount.issuer != self.issuer {
            return Err(RejectReason::ForeignToken);
        }

        Ok(amount)
    }
}

/// Codes longer than three characters are stored on ledger as 40 hex digits
/// (the ASCII bytes, zero-padded to 20 bytes).
pub fn normalize_currency_code(code: &str) -> String {
    let code = code.trim();

    if code.len() <= 3 {
        return code.to_string();
    }

    if code.len() == 40 && code.bytes().all(|b| b.is_ascii_hexdigit()) {
        return code.to_ascii_uppercase();
    }

    if code.len() > 20 {
        return code.to_string();
    }

    let mut bytes = code.as_bytes().to_vec();
    bytes.resize(20, 0);
    hex::encode_upper(bytes)
}
