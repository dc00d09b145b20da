use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::{RpcError, DEFAULT_RETRY_TIMEOUT};

/// The public testnet fullnode.
pub const TESTNET_FULLNODE_URL: &str = "https://fullnode.testnet.sui.io:443";

/// Configure an HTTP client with appropriate timeouts and keep-alive settings.
pub fn configure_client() -> Result<reqwest::Client, RpcError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .connect_timeout(Duration::from_secs(15))
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Some(Duration::from_secs(30)))
        .build()?)
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcErrorObject>,
}

#[derive(Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

/// A JSON-RPC 2.0 client for a Sui fullnode.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: Url,
    next_id: Arc<AtomicU64>,
    retry_timeout: Duration,
}

impl RpcClient {
    /// Create a new [`RpcClient`] for the fullnode at `url`.
    pub fn new(url: &str) -> Result<Self, RpcError> {
        let url = Url::parse(url).map_err(|e| RpcError::InvalidUrl(format!("{url}: {e}")))?;
        Ok(Self {
            http: configure_client()?,
            url,
            next_id: Arc::new(AtomicU64::new(1)),
            retry_timeout: DEFAULT_RETRY_TIMEOUT,
        })
    }

    /// Override how long transient read failures are retried for.
    #[must_use]
    pub fn with_retry_timeout(mut self, retry_timeout: Duration) -> Self {
        self.retry_timeout = retry_timeout;
        self
    }

    /// The fullnode URL.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// How long transient read failures are retried for.
    #[must_use]
    pub fn retry_timeout(&self) -> Duration {
        self.retry_timeout
    }

    /// Invoke `method` with positional `params` and decode the result.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(id, method, %params, "sending rpc request");

        let request = JsonRpcRequest { jsonrpc: "2.0", id, method, params };
        let response = self.http.post(self.url.clone()).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RpcError::Http { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        let response: JsonRpcResponse<T> = serde_json::from_slice(&bytes)?;
        decode_response(response)
    }
}

fn decode_response<T>(response: JsonRpcResponse<T>) -> Result<T, RpcError> {
    if let Some(error) = response.error {
        return Err(RpcError::Rpc { code: error.code, message: error.message });
    }
    response.result.ok_or(RpcError::MissingResult)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_request_envelope() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 4,
            method: "suix_getBalance",
            params: json!(["0x1", "0x2::sui::SUI"]),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "suix_getBalance",
                "params": ["0x1", "0x2::sui::SUI"]
            })
        );
    }

    #[test]
    fn test_decode_result() {
        let response: JsonRpcResponse<u64> =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1, "result": 9 })).unwrap();
        assert_eq!(decode_response(response).unwrap(), 9);
    }

    #[test]
    fn test_decode_error() {
        let response: JsonRpcResponse<u64> = serde_json::from_value(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Could not find the referenced transaction" }
        }))
        .unwrap();
        let err = decode_response(response).unwrap_err();
        assert!(matches!(err, RpcError::Rpc { code: -32602, .. }));
        assert_eq!(err.to_string(), "Could not find the referenced transaction (code -32602)");
    }

    #[test]
    fn test_decode_missing_result() {
        let response: JsonRpcResponse<u64> =
            serde_json::from_value(json!({ "jsonrpc": "2.0", "id": 1 })).unwrap();
        assert!(matches!(decode_response(response), Err(RpcError::MissingResult)));
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(RpcClient::new("not a url").is_err());
    }
}
