use std::{sync::Arc, time::Duration};

use jamii_rpc::{ChainReader, RpcError, TransactionBlockResponse, TransactionBlockResponseOptions};
use jamii_types::{ExecutionOutcome, TransactionResult};
use thiserror::Error;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use crate::{SignAndExecuteInput, TransactionBlock, Wallet, WalletAccount, WalletError};

/// The default gas budget, in MIST.
pub const DEFAULT_GAS_BUDGET: u64 = 10_000_000;

/// The default chain identifier.
pub const DEFAULT_CHAIN: &str = "sui:testnet";

/// How long to wait for a submitted digest to become readable.
pub const DEFAULT_CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(60);

/// The delay between confirmation polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Settings of the [`TransactionExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// The chain the wallet submits to.
    pub chain: String,
    /// The gas budget set on every block, in MIST.
    pub gas_budget: u64,
    /// How long to wait for confirmation.
    pub confirmation_timeout: Duration,
    /// The delay between confirmation polls.
    pub poll_interval: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            chain: DEFAULT_CHAIN.to_string(),
            gas_budget: DEFAULT_GAS_BUDGET,
            confirmation_timeout: DEFAULT_CONFIRMATION_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Why an execution did not produce a confirmed result.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ExecutionError {
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("wallet returned an empty transaction digest")]
    EmptyDigest,
    #[error("transaction {digest} was not confirmed in time: {source}")]
    ConfirmationTimeout {
        digest: String,
        #[source]
        source: RpcError,
    },
    #[error("{0}")]
    ExecutionFailed(String),
}

/// Signs, submits and confirms transaction blocks.
///
/// Every call resolves to an [`ExecutionOutcome`]; errors never escape as `Err` or panics. A
/// submitted transaction is never resubmitted.
#[derive(Debug)]
pub struct TransactionExecutor<W, R> {
    wallet: Arc<W>,
    reader: Arc<R>,
    config: ExecutorConfig,
}

impl<W, R> Clone for TransactionExecutor<W, R> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            reader: self.reader.clone(),
            config: self.config.clone(),
        }
    }
}

impl<W: Wallet, R: ChainReader> TransactionExecutor<W, R> {
    /// Create a new [`TransactionExecutor`].
    pub fn new(wallet: Arc<W>, reader: Arc<R>, config: ExecutorConfig) -> Self {
        Self { wallet, reader, config }
    }

    /// The executor settings.
    #[must_use]
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Executes `block` as `account`.
    pub async fn execute(
        &self,
        block: TransactionBlock,
        account: &WalletAccount,
    ) -> ExecutionOutcome {
        match self.try_execute(block, account).await {
            Ok(result) => {
                info!(digest = %result.digest, "transaction confirmed");
                ExecutionOutcome::Success(result)
            }
            Err(e) => {
                error!("transaction execution failed: {}", e);
                ExecutionOutcome::Failure { error: e.to_string() }
            }
        }
    }

    async fn try_execute(
        &self,
        mut block: TransactionBlock,
        account: &WalletAccount,
    ) -> Result<TransactionResult, ExecutionError> {
        // Fill in what only the execution context knows.
        block.set_gas_budget(self.config.gas_budget);
        block.set_sender(account.address);

        // Ask the wallet to sign and submit.
        let input =
            SignAndExecuteInput { transaction_block: &block, account, chain: &self.config.chain };
        let submitted = self.wallet.sign_and_execute(input).await?;
        if submitted.digest.is_empty() {
            return Err(ExecutionError::EmptyDigest);
        }
        info!(digest = %submitted.digest, "transaction submitted");

        // Wait for the node to report the full block.
        let response = self.wait_for_transaction(&submitted.digest).await?;
        let result = TransactionResult {
            digest: response.digest,
            effects: response.effects,
            events: response.events.unwrap_or_default(),
            object_changes: response.object_changes.unwrap_or_default(),
        };

        if result.status() == Some("failure") {
            let message = result
                .effects
                .as_ref()
                .and_then(|effects| effects["status"]["error"].as_str())
                .unwrap_or("transaction failed during execution")
                .to_string();
            return Err(ExecutionError::ExecutionFailed(message));
        }
        Ok(result)
    }

    async fn wait_for_transaction(
        &self,
        digest: &str,
    ) -> Result<TransactionBlockResponse, ExecutionError> {
        let deadline = Instant::now() + self.config.confirmation_timeout;
        loop {
            match self
                .reader
                .get_transaction_block(digest, TransactionBlockResponseOptions::full())
                .await
            {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if Instant::now() + self.config.poll_interval > deadline {
                        return Err(ExecutionError::ConfirmationTimeout {
                            digest: digest.to_string(),
                            source: e,
                        });
                    }
                    debug!(digest, "transaction not yet available: {}", e);
                    sleep(self.config.poll_interval).await;
                }
            }
        }
    }
}
