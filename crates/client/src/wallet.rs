use std::time::Duration;

use async_trait::async_trait;
use jamii_types::Address;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::TransactionBlock;

/// The default timeout for a wallet to sign and submit, including any user prompt.
pub const DEFAULT_WALLET_TIMEOUT: Duration = Duration::from_secs(120);

/// A connected wallet account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAccount {
    /// The account address.
    pub address: Address,
    /// An optional human-readable label supplied by the wallet.
    #[serde(default)]
    pub label: Option<String>,
}

impl WalletAccount {
    /// An account with no label.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self { address, label: None }
    }
}

/// A request to sign and submit a transaction block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignAndExecuteInput<'a> {
    /// The block, with sender and gas budget already set.
    pub transaction_block: &'a TransactionBlock,
    /// The account that signs.
    pub account: &'a WalletAccount,
    /// The chain identifier, e.g. `sui:testnet`.
    pub chain: &'a str,
}

/// The wallet's answer to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmittedTransaction {
    /// The digest of the submitted transaction.
    pub digest: String,
}

/// Errors returned by a [`Wallet`].
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum WalletError {
    /// The wallet refused or failed to sign or submit. The message is shown to the user as is.
    #[error("{0}")]
    Rejected(String),
    #[error("wallet unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("wallet returned http {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("invalid wallet url: {0}")]
    InvalidUrl(String),
}

/// The external signer.
///
/// The client never holds keys: it builds a block and the wallet signs, submits and reports the
/// digest.
#[async_trait]
pub trait Wallet: Send + Sync + 'static {
    /// Signs and submits `input`.
    async fn sign_and_execute(
        &self,
        input: SignAndExecuteInput<'_>,
    ) -> Result<SubmittedTransaction, WalletError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BridgeResponse {
    Submitted(SubmittedTransaction),
    Failed { error: String },
}

/// A wallet reached over HTTP, e.g. a local signing bridge or a browser extension relay.
///
/// The bridge receives the [`SignAndExecuteInput`] as a JSON `POST` and answers either
/// `{"digest": ".."}` or `{"error": ".."}`.
#[derive(Debug, Clone)]
pub struct HttpWallet {
    http: reqwest::Client,
    url: Url,
}

impl HttpWallet {
    /// Creates a wallet posting to `url`.
    pub fn new(url: &str) -> Result<Self, WalletError> {
        let url = Url::parse(url).map_err(|e| WalletError::InvalidUrl(format!("{url}: {e}")))?;
        let http = reqwest::Client::builder().timeout(DEFAULT_WALLET_TIMEOUT).build()?;
        Ok(Self { http, url })
    }

    /// The bridge endpoint.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Wallet for HttpWallet {
    async fn sign_and_execute(
        &self,
        input: SignAndExecuteInput<'_>,
    ) -> Result<SubmittedTransaction, WalletError> {
        debug!(account = %input.account.address, chain = input.chain, "requesting signature");
        let response = self.http.post(self.url.clone()).json(&input).send().await?;
        let status = response.status();
        let body = response.text().await?;

        // Bridges report rejections in the body even on error statuses.
        match serde_json::from_str::<BridgeResponse>(&body) {
            Ok(BridgeResponse::Failed { error }) => Err(WalletError::Rejected(error)),
            Ok(BridgeResponse::Submitted(submitted)) if status.is_success() => Ok(submitted),
            _ => Err(WalletError::Http { status, body }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridge_response_shapes() {
        let ok: BridgeResponse = serde_json::from_str(r#"{"digest":"9tQ4"}"#).unwrap();
        assert!(matches!(
            ok,
            BridgeResponse::Submitted(SubmittedTransaction { digest }) if digest == "9tQ4"
        ));

        let failed: BridgeResponse =
            serde_json::from_str(r#"{"error":"Rejected from user"}"#).unwrap();
        assert!(
            matches!(failed, BridgeResponse::Failed { error } if error == "Rejected from user")
        );
    }

    #[test]
    fn test_rejection_message_is_verbatim() {
        let error = WalletError::Rejected("Rejected from user".to_string());
        assert_eq!(error.to_string(), "Rejected from user");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(HttpWallet::new("not a url"), Err(WalletError::InvalidUrl(_))));
    }
}
