use jamii_utils::explorer_url;
use tracing::warn;
use url::Url;

use crate::{hooks::TransactionStatus, pages::TransactionSuccess, ExplorerConfig};

/// The message shown when a page does not supply its own.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Transaction completed successfully!";

/// The number of digest characters shown before the ellipsis.
pub const DIGEST_PREVIEW_LEN: usize = 20;

/// What the transaction-status notice shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionNotice {
    /// Nothing to show.
    Hidden,
    /// A write is in flight.
    Processing,
    /// The last write failed; the user may retry or close.
    Error {
        /// The error text.
        message: String,
    },
    /// The last write was confirmed.
    Success {
        /// The page's message.
        message: String,
        /// The full digest, for copying.
        digest: String,
        /// The abbreviated digest.
        preview: String,
        /// The explorer link, when one can be built.
        explorer_url: Option<Url>,
    },
}

impl TransactionNotice {
    /// Picks the notice for the hook status and the page's last success.
    ///
    /// An in-flight write takes precedence over an error, and an error over a success.
    #[must_use]
    pub fn select(
        status: &TransactionStatus,
        success: Option<&TransactionSuccess>,
        explorer: &ExplorerConfig,
    ) -> Self {
        if status.is_loading {
            return Self::Processing;
        }
        if let Some(message) = &status.error {
            return Self::Error { message: message.clone() };
        }
        let Some(success) = success else {
            return Self::Hidden;
        };

        let explorer_url = explorer_url(&explorer.base_url, &success.digest, &explorer.network)
            .map_err(|e| warn!("failed to build explorer link: {}", e))
            .ok();
        Self::Success {
            message: success.message.clone().unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string()),
            digest: success.digest.clone(),
            preview: digest_preview(&success.digest),
            explorer_url,
        }
    }

    /// Whether the notice offers a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// The first [`DIGEST_PREVIEW_LEN`] characters of `digest` followed by `...`.
#[must_use]
pub fn digest_preview(digest: &str) -> String {
    let head: String = digest.chars().take(DIGEST_PREVIEW_LEN).collect();
    format!("{head}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGEST: &str = "9tQ4pZ3mXyR8kLw2vN6bHs1cDf7gJa5eUo0iTq";

    #[test]
    fn test_loading_takes_precedence() {
        let status = TransactionStatus { is_loading: true, error: Some("stale".to_string()) };
        let success = TransactionSuccess::new(DIGEST);
        let notice = TransactionNotice::select(&status, Some(&success), &ExplorerConfig::default());
        assert_eq!(notice, TransactionNotice::Processing);
    }

    #[test]
    fn test_error_over_success() {
        let status =
            TransactionStatus { is_loading: false, error: Some("Rejected from user".to_string()) };
        let success = TransactionSuccess::new(DIGEST);
        let notice = TransactionNotice::select(&status, Some(&success), &ExplorerConfig::default());
        assert_eq!(notice, TransactionNotice::Error { message: "Rejected from user".to_string() });
        assert!(notice.is_retryable());
    }

    #[test]
    fn test_success_notice() {
        let success =
            TransactionSuccess::with_message(DIGEST, "Loan request submitted successfully!");
        let notice = TransactionNotice::select(
            &TransactionStatus::default(),
            Some(&success),
            &ExplorerConfig::default(),
        );

        let TransactionNotice::Success { message, digest, preview, explorer_url } = notice else {
            panic!("expected a success notice");
        };
        assert_eq!(message, "Loan request submitted successfully!");
        assert_eq!(digest, DIGEST);
        assert_eq!(preview, "9tQ4pZ3mXyR8kLw2vN6b...");
        assert_eq!(
            explorer_url.unwrap().as_str(),
            format!("https://suiexplorer.com/txblock/{DIGEST}?network=testnet")
        );
    }

    #[test]
    fn test_default_message_and_hidden() {
        let explorer = ExplorerConfig::default();
        let status = TransactionStatus::default();
        assert_eq!(TransactionNotice::select(&status, None, &explorer), TransactionNotice::Hidden);

        let success = TransactionSuccess::new("abc");
        let TransactionNotice::Success { message, preview, .. } =
            TransactionNotice::select(&status, Some(&success), &explorer)
        else {
            panic!("expected a success notice");
        };
        assert_eq!(message, DEFAULT_SUCCESS_MESSAGE);
        assert_eq!(preview, "abc...");
    }
}
