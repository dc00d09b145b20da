use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use crate::WalletAccount;

/// The wallet connection shared by every hook of one session.
///
/// Hooks read the current account on each call and may [`Session::subscribe`] to react when it
/// changes.
#[derive(Debug, Clone)]
pub struct Session {
    account: Arc<watch::Sender<Option<WalletAccount>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with no connected account.
    #[must_use]
    pub fn new() -> Self {
        let (account, _) = watch::channel(None);
        Self { account: Arc::new(account) }
    }

    /// Connects `account`. Reconnecting the same account does not notify subscribers.
    pub fn connect(&self, account: WalletAccount) {
        self.account.send_if_modified(|current| {
            if current.as_ref() == Some(&account) {
                return false;
            }
            info!(address = %account.address, "wallet connected");
            *current = Some(account);
            true
        });
    }

    /// Disconnects the current account, if any.
    pub fn disconnect(&self) {
        self.account.send_if_modified(|current| {
            let Some(previous) = current.take() else {
                return false;
            };
            info!(address = %previous.address, "wallet disconnected");
            true
        });
    }

    /// The connected account.
    #[must_use]
    pub fn current(&self) -> Option<WalletAccount> {
        self.account.borrow().clone()
    }

    /// A receiver notified whenever the connected account changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<WalletAccount>> {
        self.account.subscribe()
    }
}
