use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The confirmed result of a submitted transaction.
///
/// Held only long enough to render a confirmation; effects, events and object changes are kept in
/// the node's JSON form since the client never interprets them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// The transaction digest.
    pub digest: String,
    /// The transaction effects.
    #[serde(default)]
    pub effects: Option<Value>,
    /// The events emitted by the transaction.
    #[serde(default)]
    pub events: Vec<Value>,
    /// The objects created, mutated, wrapped or deleted by the transaction.
    #[serde(default)]
    pub object_changes: Vec<Value>,
}

impl TransactionResult {
    /// Returns the execution status reported in the effects, e.g. `success` or `failure`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.effects.as_ref()?.get("status")?.get("status")?.as_str()
    }
}

/// The uniform outcome of a write: either a confirmed result or the error message that stopped it.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// The transaction was signed, submitted and confirmed.
    Success(TransactionResult),
    /// Signing, submission or confirmation failed.
    Failure {
        /// The wallet's or node's message, verbatim.
        error: String,
    },
}

impl ExecutionOutcome {
    /// Returns true for [`ExecutionOutcome::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the digest of a successful transaction.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        match self {
            Self::Success(result) => Some(&result.digest),
            Self::Failure { .. } => None,
        }
    }

    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> Result<TransactionResult, String> {
        match self {
            Self::Success(result) => Ok(result),
            Self::Failure { error } => Err(error),
        }
    }
}
