use crate::xrpl::models::{AccountTxPage, AccountTxParams, RpcRequest, RpcResponse};
use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use std::time::Duration;

const ACCOUNT_TX: &str = "account_tx";

/// rippled error codes that will not go away on retry
const PERMANENT_RPC_ERRORS: [&str; 3] = ["actMalformed", "actNotFound", "invalidParams"];

#[derive(Debug, thiserror::Error)]
pub enum LedgerApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: String, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl LedgerApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            LedgerApiError::Transport(_) => true,
            LedgerApiError::Http { status, .. } => *status == 429 || *status >= 500,
            LedgerApiError::Rpc { code, .. } => !PERMANENT_RPC_ERRORS.contains(&code.as_str()),
            LedgerApiError::Decode(_) => false,
        }
    }
}

/// Read access to an account's transaction history, one page per call
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn account_tx(&self, params: &AccountTxParams) -> Result<AccountTxPage, LedgerApiError>;
}

/// `LedgerApi` over rippled's JSON-RPC HTTP endpoint
pub struct XrplRpcClient {
    http_client: Client,
    rpc_url: String,
}

impl XrplRpcClient {
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, LedgerApiError> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            rpc_url: rpc_url.to_string(),
        })
    }
}

#[async_trait]
impl LedgerApi for XrplRpcClient {
    async fn account_tx(&self, params: &AccountTxParams) -> Result<AccountTxPage, LedgerApiError> {
        debug!(
            "account_tx account={} ledger_index_min={} marker={:?}",
            params.account, params.ledger_index_min, params.marker
        );

        let request = RpcRequest {
            method: ACCOUNT_TX,
            params: [params],
        };

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Ledger API error [account_tx]: HTTP {} {}", status, body);
            return Err(LedgerApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        parse_account_tx(&body)
    }
}

fn parse_account_tx(body: &[u8]) -> Result<AccountTxPage, LedgerApiError> {
    let RpcResponse { result } = serde_json::from_slice(body)?;

    if result.status.as_deref() == Some("error") || result.error.is_some() {
        let code = result.error.unwrap_or_else(|| "unknown".to_string());
        let message = result.error_message.unwrap_or_default();
        error!("Ledger API error [account_tx]: {} {}", code, message);
        return Err(LedgerApiError::Rpc { code, message });
    }

    Ok(result.into_page())
}
