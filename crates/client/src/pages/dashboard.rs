use jamii_types::{format_sui, Group, Loan};

use crate::{hooks::DataState, WalletAccount};

/// The account overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    /// The abbreviated address of the connected account.
    pub account: Option<String>,
    /// The SUI balance, with four decimals.
    pub balance: String,
    /// The account's groups that are active.
    pub active_groups: Vec<Group>,
    /// The account's loans that are active.
    pub active_loans: Vec<Loan>,
    /// The sum of the account's contributions, in MIST.
    pub total_contributions: u64,
}

impl DashboardView {
    /// Builds the overview from the cached data.
    #[must_use]
    pub fn new(state: &DataState, account: Option<&WalletAccount>) -> Self {
        Self {
            account: account.map(|account| account.address.short()),
            balance: format_sui(state.user_balance, 4),
            active_groups: state.user_groups.iter().filter(|g| g.is_active).cloned().collect(),
            active_loans: state.user_loans.iter().filter(|l| l.is_active()).cloned().collect(),
            total_contributions: state.user_contributions.iter().map(|c| c.amount).sum(),
        }
    }
}
