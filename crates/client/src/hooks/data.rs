use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::future::join_all;
use jamii_rpc::{ChainReader, DataFetcher};
use jamii_types::{Contribution, Group, Loan, ObjectId, Proposal};
use tokio::{sync::RwLock, task::JoinHandle, time::sleep};
use tracing::{debug, info};

use crate::Session;

/// The chain data cached for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataState {
    /// Every group.
    pub groups: Vec<Group>,
    /// Groups the connected account created or belongs to.
    pub user_groups: Vec<Group>,
    /// Loans of the connected account.
    pub user_loans: Vec<Loan>,
    /// Contribution receipts of the connected account.
    pub user_contributions: Vec<Contribution>,
    /// Proposals by group, for the groups whose governance page was opened.
    pub proposals: HashMap<ObjectId, Vec<Proposal>>,
    /// SUI balance of the connected account, in MIST.
    pub user_balance: u64,
    /// A fetch is in flight.
    pub is_loading: bool,
    in_flight: usize,
}

impl DataState {
    fn begin(&mut self) {
        self.in_flight += 1;
        self.is_loading = true;
    }

    fn end(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.is_loading = self.in_flight > 0;
    }

    fn clear_user_data(&mut self) {
        self.user_groups.clear();
        self.user_loans.clear();
        self.user_contributions.clear();
        self.user_balance = 0;
    }
}

/// Caches chain data for the pages.
///
/// Fetches never fail: the fetcher degrades errors to empty results. Concurrent refreshes race and
/// the last one to finish wins; nothing is updated optimistically.
#[derive(Debug)]
pub struct DataHook<R> {
    session: Session,
    fetcher: DataFetcher<R>,
    state: Arc<RwLock<DataState>>,
    refresh_delay: Duration,
}

impl<R> Clone for DataHook<R> {
    fn clone(&self) -> Self {
        Self {
            session: self.session.clone(),
            fetcher: self.fetcher.clone(),
            state: self.state.clone(),
            refresh_delay: self.refresh_delay,
        }
    }
}

impl<R: ChainReader> DataHook<R> {
    /// Create a new [`DataHook`].
    pub fn new(session: Session, fetcher: DataFetcher<R>, refresh_delay: Duration) -> Self {
        Self { session, fetcher, state: Arc::default(), refresh_delay }
    }

    /// A snapshot of the cached data.
    pub async fn state(&self) -> DataState {
        self.state.read().await.clone()
    }

    /// Refetches every group.
    pub async fn fetch_groups(&self) {
        self.state.write().await.begin();
        let groups = self.fetcher.fetch_groups().await;

        let mut state = self.state.write().await;
        state.groups = groups;
        state.end();
    }

    /// Refetches the data of the connected account. Does nothing when no account is connected.
    pub async fn fetch_user_data(&self) {
        let Some(account) = self.session.current() else {
            return;
        };
        let address = account.address;

        self.state.write().await.begin();
        let (balance, groups, loans, contributions) = tokio::join!(
            self.fetcher.fetch_balance(&address, None),
            self.fetcher.fetch_user_groups(&address),
            self.fetcher.fetch_user_loans(&address),
            self.fetcher.fetch_user_contributions(&address),
        );

        let mut state = self.state.write().await;
        state.end();
        // The account may have changed while fetching.
        if self.session.current().map(|current| current.address) != Some(address) {
            debug!(%address, "discarding user data of a disconnected account");
            return;
        }
        state.user_balance = balance;
        state.user_groups = groups;
        state.user_loans = loans;
        state.user_contributions = contributions;
    }

    /// Refetches the proposals of a group.
    pub async fn fetch_group_proposals(&self, group_id: ObjectId) -> Vec<Proposal> {
        self.state.write().await.begin();
        let proposals = self.fetcher.fetch_group_proposals(&group_id).await;

        let mut state = self.state.write().await;
        state.proposals.insert(group_id, proposals.clone());
        state.end();
        proposals
    }

    /// Refetches groups, user data and every cached proposal list concurrently.
    pub async fn refresh(&self) {
        let group_ids: Vec<ObjectId> = self.state.read().await.proposals.keys().copied().collect();
        let proposals = join_all(group_ids.into_iter().map(|id| self.fetch_group_proposals(id)));
        tokio::join!(self.fetch_groups(), self.fetch_user_data(), proposals);
    }

    /// Refreshes after the configured delay, giving the node time to index a confirmed write.
    pub fn schedule_refresh(&self) -> JoinHandle<()> {
        let hook = self.clone();
        tokio::spawn(async move {
            sleep(hook.refresh_delay).await;
            hook.refresh().await;
        })
    }

    /// Refetches user data whenever the session account changes, and clears it on disconnect.
    ///
    /// The task runs until aborted.
    pub fn watch_account(&self) -> JoinHandle<()> {
        let hook = self.clone();
        let mut account = self.session.subscribe();
        tokio::spawn(async move {
            while account.changed().await.is_ok() {
                let connected = account.borrow_and_update().is_some();
                if connected {
                    info!("account changed, refetching user data");
                    hook.fetch_user_data().await;
                } else {
                    hook.state.write().await.clear_user_data();
                }
            }
        })
    }
}
