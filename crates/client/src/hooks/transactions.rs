use std::sync::Arc;

use jamii_rpc::{ChainReader, DataFetcher};
use jamii_types::{ContractConfig, ExecutionOutcome, ObjectId, TransactionResult};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::{
    ContractCall, ContractCallBuilder, CreateGroupParams, RequestLoanParams, Session,
    TransactionExecutor, Wallet, WalletAccount,
};

/// Errors surfaced by [`TransactionHook`].
///
/// The display text is what the pages show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// No wallet account is connected.
    #[error("Wallet not connected")]
    WalletNotConnected,
    /// The account holds no coins to pay with.
    #[error("No coins available")]
    NoCoins,
    /// The wallet or the node rejected the transaction; the message is passed through verbatim.
    #[error("{0}")]
    Transaction(String),
}

/// Progress of the most recent write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionStatus {
    /// A write is in flight.
    pub is_loading: bool,
    /// The error of the most recent write, cleared when the next one starts.
    pub error: Option<String>,
}

/// [`TransactionStatus`] plus the number of writes still awaiting their outcome.
#[derive(Debug, Default)]
struct StatusTracker {
    status: TransactionStatus,
    in_flight: usize,
}

impl StatusTracker {
    fn begin(&mut self) {
        self.in_flight += 1;
        self.status = TransactionStatus { is_loading: true, error: None };
    }

    fn end(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.status.is_loading = self.in_flight > 0;
    }
}

/// Performs contract writes on behalf of the connected account.
#[derive(Debug)]
pub struct TransactionHook<W, R> {
    session: Session,
    executor: TransactionExecutor<W, R>,
    fetcher: DataFetcher<R>,
    tracker: Arc<RwLock<StatusTracker>>,
}

impl<W, R> Clone for TransactionHook<W, R> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            executor: self.executor.clone(),
            fetcher: self.fetcher.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

impl<W: Wallet, R: ChainReader> TransactionHook<W, R> {
    /// Create a new [`TransactionHook`].
    pub fn new(
        session: Session,
        executor: TransactionExecutor<W, R>,
        fetcher: DataFetcher<R>,
    ) -> Self {
        Self { session, executor, fetcher, tracker: Arc::default() }
    }

    /// The current progress.
    pub async fn status(&self) -> TransactionStatus {
        self.tracker.read().await.status.clone()
    }

    /// Dismisses the last error.
    pub async fn clear_error(&self) {
        self.tracker.write().await.status.error = None;
    }

    /// Creates a savings group.
    pub async fn create_group(
        &self,
        params: CreateGroupParams,
    ) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        self.submit(&account, ContractCall::CreateGroup(params)).await
    }

    /// Joins a group.
    pub async fn join_group(&self, group_id: ObjectId) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        self.submit(&account, ContractCall::JoinGroup { group_id }).await
    }

    /// Contributes `amount` MIST to a group.
    pub async fn make_contribution(
        &self,
        group_id: ObjectId,
        amount: u64,
    ) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        let coin_id = self.payment_coin(&account).await?;
        self.submit(&account, ContractCall::MakeContribution { group_id, amount, coin_id }).await
    }

    /// Requests a loan from a group.
    pub async fn request_loan(
        &self,
        params: RequestLoanParams,
    ) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        self.submit(&account, ContractCall::RequestLoan(params)).await
    }

    /// Votes for (`true`) or against (`false`) a proposal.
    pub async fn vote_on_proposal(
        &self,
        proposal_id: ObjectId,
        vote: bool,
    ) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        self.submit(&account, ContractCall::VoteOnProposal { proposal_id, vote }).await
    }

    /// Repays `amount` MIST of a loan.
    pub async fn repay_loan(
        &self,
        loan_id: ObjectId,
        amount: u64,
    ) -> Result<TransactionResult, HookError> {
        let account = self.account().await?;
        let coin_id = self.payment_coin(&account).await?;
        self.submit(&account, ContractCall::RepayLoan { loan_id, amount, coin_id }).await
    }

    async fn account(&self) -> Result<WalletAccount, HookError> {
        match self.session.current() {
            Some(account) => Ok(account),
            None => Err(self.reject(HookError::WalletNotConnected).await),
        }
    }

    /// Picks the first SUI coin of the account.
    async fn payment_coin(&self, account: &WalletAccount) -> Result<ObjectId, HookError> {
        let coins = self.fetcher.fetch_coins(&account.address, None).await;
        match coins.first() {
            Some(coin) => Ok(coin.coin_object_id),
            None => {
                warn!(address = %account.address, "no coins to pay with");
                Err(self.reject(HookError::NoCoins).await)
            }
        }
    }

    async fn submit(
        &self,
        account: &WalletAccount,
        call: ContractCall,
    ) -> Result<TransactionResult, HookError> {
        self.tracker.write().await.begin();

        info!(function = call.function(), "submitting contract call");
        let block = ContractCallBuilder::new(self.contract().clone()).call(&call).build();
        let outcome = self.executor.execute(block, account).await;

        let mut tracker = self.tracker.write().await;
        tracker.end();
        match outcome {
            ExecutionOutcome::Success(result) => Ok(result),
            ExecutionOutcome::Failure { error } => {
                tracker.status.error = Some(error.clone());
                Err(HookError::Transaction(error))
            }
        }
    }

    async fn reject(&self, error: HookError) -> HookError {
        self.tracker.write().await.status.error = Some(error.to_string());
        error
    }

    fn contract(&self) -> &ContractConfig {
        self.fetcher.contract()
    }
}
