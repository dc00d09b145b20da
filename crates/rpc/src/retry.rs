use std::{future::Future, time::Duration};

use async_trait::async_trait;
use backoff::{future::retry, Error as BackoffError, ExponentialBackoff};
use tracing::{error, warn};

use crate::{RpcClient, RpcError};

/// Default timeout for retried read operations.
pub const DEFAULT_RETRY_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for implementing retryable RPC operations.
#[async_trait]
pub trait RetryableRpc {
    /// Execute an operation with retries using the default timeout.
    async fn with_retry<'a, T, F, Fut>(
        &'a self,
        operation: F,
        operation_name: &str,
    ) -> Result<T, RpcError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, RpcError>> + Send,
        T: Send;

    /// Execute an operation with retries using a custom timeout.
    async fn with_retry_timeout<'a, T, F, Fut>(
        &'a self,
        operation: F,
        timeout: Duration,
        operation_name: &str,
    ) -> Result<T, RpcError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, RpcError>> + Send,
        T: Send;
}

/// Execute an async operation with exponential backoff retries.
///
/// Only errors for which [`RpcError::is_transient`] holds are retried; everything else is returned
/// immediately.
pub async fn retry_operation<T, F, Fut>(
    operation: F,
    timeout: Option<Duration>,
    operation_name: &str,
) -> Result<T, RpcError>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, RpcError>> + Send,
{
    let backoff = ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        max_elapsed_time: timeout,
        ..Default::default()
    };

    retry(backoff, || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if e.is_transient() => {
                warn!("fullnode unavailable when {}: {}, retrying...", operation_name, e);
                Err(BackoffError::transient(e))
            }
            Err(e) => {
                error!("permanent error when {}: {}", operation_name, e);
                Err(BackoffError::permanent(e))
            }
        }
    })
    .await
}

#[async_trait]
impl RetryableRpc for RpcClient {
    async fn with_retry<'a, T, F, Fut>(
        &'a self,
        operation: F,
        operation_name: &str,
    ) -> Result<T, RpcError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, RpcError>> + Send,
        T: Send,
    {
        self.with_retry_timeout(operation, self.retry_timeout(), operation_name).await
    }

    async fn with_retry_timeout<'a, T, F, Fut>(
        &'a self,
        operation: F,
        timeout: Duration,
        operation_name: &str,
    ) -> Result<T, RpcError>
    where
        F: Fn() -> Fut + Send + Sync + 'a,
        Fut: Future<Output = Result<T, RpcError>> + Send,
        T: Send,
    {
        retry_operation(operation, Some(timeout), operation_name).await
    }
}
