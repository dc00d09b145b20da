use thiserror::Error;

/// JSON-RPC error code for an internal server error.
pub const RPC_INTERNAL_ERROR: i64 = -32603;

/// An error returned by a fullnode request.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("{message} (code {code})")]
    Rpc { code: i64, message: String },

    #[error("response has neither result nor error")]
    MissingResult,

    #[error("invalid fullnode url {0}")]
    InvalidUrl(String),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RpcError {
    /// Returns true if repeating the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Transport(e) => {
                if e.is_timeout() || e.is_connect() {
                    return true;
                }
                let message = e.to_string().to_lowercase();
                message.contains("tls handshake")
                    || message.contains("dns error")
                    || message.contains("connection reset")
                    || message.contains("broken pipe")
                    || message.contains("failed to lookup")
            }
            RpcError::Http { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            RpcError::Rpc { code, .. } => *code == RPC_INTERNAL_ERROR,
            RpcError::MissingResult | RpcError::Decode(_) | RpcError::InvalidUrl(_) => false,
        }
    }
}
