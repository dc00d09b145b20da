use serde::{Deserialize, Serialize};

use crate::{Address, ObjectId};

/// The lifecycle status of a loan. Transitions happen on-chain only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Requested and awaiting approval.
    Pending,
    /// Approved but not yet disbursed.
    Approved,
    /// Disbursed and outstanding.
    Active,
    /// Fully repaid.
    Repaid,
    /// Past due and written off.
    Defaulted,
}

impl LoanStatus {
    /// All statuses in on-chain ordinal order.
    pub const ALL: [Self; 5] =
        [Self::Pending, Self::Approved, Self::Active, Self::Repaid, Self::Defaulted];

    /// Returns the textual form used by the contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Active => "active",
            Self::Repaid => "repaid",
            Self::Defaulted => "defaulted",
        }
    }
}

impl_tagged_variant!(LoanStatus, "loan status");

/// A loan taken from a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// The id of the loan object.
    pub id: ObjectId,
    /// The group that issued the loan.
    pub group_id: ObjectId,
    /// The borrowing account.
    pub borrower: Address,
    /// The principal in MIST.
    pub amount: u64,
    /// What the loan is for.
    pub purpose: String,
    /// The current status.
    pub status: LoanStatus,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Due date in milliseconds since the Unix epoch, if scheduled.
    pub due_date: Option<u64>,
}

impl Loan {
    /// Returns true if the loan is disbursed and outstanding.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == LoanStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_status_from_str() {
        assert_eq!("active".parse::<LoanStatus>().unwrap(), LoanStatus::Active);
        assert_eq!("Repaid".parse::<LoanStatus>().unwrap(), LoanStatus::Repaid);
        assert!("closed".parse::<LoanStatus>().is_err());
    }

    #[test]
    fn test_loan_status_from_ordinal() {
        assert_eq!(LoanStatus::try_from(0).unwrap(), LoanStatus::Pending);
        assert_eq!(LoanStatus::try_from(4).unwrap(), LoanStatus::Defaulted);
        assert!(LoanStatus::try_from(5).is_err());
    }

    #[test]
    fn test_loan_status_serde() {
        let json = serde_json::to_string(&LoanStatus::Defaulted).unwrap();
        assert_eq!(json, "\"defaulted\"");
    }
}
