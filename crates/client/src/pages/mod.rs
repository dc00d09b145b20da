//! View-models of the front-end pages.
//!
//! Pages hold only local UI state (form fields, filters, the last success). Reads come from
//! [`crate::hooks::DataHook`] and writes go through [`crate::hooks::TransactionHook`].

mod create_group;
mod dashboard;
mod governance;
mod groups;
mod kyc;
mod loans;
mod status;

pub use create_group::*;
pub use dashboard::*;
pub use governance::*;
pub use groups::*;
pub use kyc::*;
pub use loans::*;
pub use status::*;

use jamii_types::AmountError;
use thiserror::Error;

use crate::hooks::HookError;

/// A confirmed write, kept by the page that performed it until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSuccess {
    /// The transaction digest.
    pub digest: String,
    /// A page-specific message; the generic one is shown when unset.
    pub message: Option<String>,
}

impl TransactionSuccess {
    /// A success with the generic message.
    #[must_use]
    pub fn new(digest: impl Into<String>) -> Self {
        Self { digest: digest.into(), message: None }
    }

    /// A success with a page-specific message.
    #[must_use]
    pub fn with_message(digest: impl Into<String>, message: &str) -> Self {
        Self { digest: digest.into(), message: Some(message.to_string()) }
    }
}

/// Errors of page actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum PageError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error(transparent)]
    Hook(#[from] HookError),
}
