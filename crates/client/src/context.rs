use std::sync::Arc;

use jamii_rpc::{ChainReader, DataFetcher};

use crate::{
    hooks::{DataHook, TransactionHook},
    ClientConfig, ExplorerConfig, Session, TransactionExecutor, Wallet,
};

/// The per-session wiring of wallet, reader, hooks and settings.
///
/// Pages borrow the hooks from here; nothing in it is global, so several sessions can coexist.
#[derive(Debug)]
pub struct AppContext<W, R> {
    /// The wallet connection.
    pub session: Session,
    /// Contract writes.
    pub transactions: TransactionHook<W, R>,
    /// Cached chain data.
    pub data: DataHook<R>,
    /// Where transaction links point.
    pub explorer: ExplorerConfig,
}

impl<W: Wallet, R: ChainReader> AppContext<W, R> {
    /// Create a new [`AppContext`] with no connected account.
    pub fn new(wallet: Arc<W>, reader: Arc<R>, config: ClientConfig) -> Self {
        let session = Session::new();

        // Setup the fetcher.
        let mut fetcher = DataFetcher::new(reader.clone(), config.contract);
        if let Some(owner) = config.groups_owner {
            fetcher = fetcher.with_groups_owner(owner);
        }

        // Setup the hooks.
        let executor = TransactionExecutor::new(wallet, reader, config.executor);
        let transactions = TransactionHook::new(session.clone(), executor, fetcher.clone());
        let data = DataHook::new(session.clone(), fetcher, config.refresh_delay);

        Self { session, transactions, data, explorer: config.explorer }
    }
}
