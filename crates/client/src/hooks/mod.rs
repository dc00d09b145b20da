//! Session-scoped state shared between the pages and the chain.
//!
//! [`TransactionHook`] performs writes and tracks their progress; [`DataHook`] caches what the
//! pages display and refetches it on demand, after writes and when the account changes.

mod data;
mod transactions;

pub use data::*;
pub use transactions::*;
