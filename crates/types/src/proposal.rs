use serde::{Deserialize, Serialize};

use crate::{Address, ObjectId};

/// The kind of change a proposal asks the group to approve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalType {
    /// Approve a member's loan request.
    Loan,
    /// Change a group rule such as the minimum contribution.
    RuleChange,
    /// Remove a member from the group.
    MemberRemoval,
    /// Release emergency funds.
    Emergency,
}

impl ProposalType {
    /// All proposal types in on-chain ordinal order.
    pub const ALL: [Self; 4] = [Self::Loan, Self::RuleChange, Self::MemberRemoval, Self::Emergency];

    /// Returns the textual form used by the contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Loan => "loan",
            Self::RuleChange => "rule_change",
            Self::MemberRemoval => "member_removal",
            Self::Emergency => "emergency",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Loan => "Loan Request",
            Self::RuleChange => "Rule Change",
            Self::MemberRemoval => "Member Removal",
            Self::Emergency => "Emergency",
        }
    }
}

/// The voting status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Open for votes.
    Active,
    /// Voting closed with the proposal accepted.
    Passed,
    /// Voting closed with the proposal rejected.
    Failed,
    /// Accepted and carried out.
    Executed,
}

impl ProposalStatus {
    /// All statuses in on-chain ordinal order.
    pub const ALL: [Self; 4] = [Self::Active, Self::Passed, Self::Failed, Self::Executed];

    /// Returns the textual form used by the contract.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Executed => "executed",
        }
    }
}

impl_tagged_variant!(ProposalType, "proposal type");
impl_tagged_variant!(ProposalStatus, "proposal status");

/// A governance proposal within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    /// The id of the proposal object.
    pub id: ObjectId,
    /// The group the proposal belongs to.
    pub group_id: ObjectId,
    /// The proposing account.
    pub proposer: Address,
    /// The kind of proposal.
    pub proposal_type: ProposalType,
    /// A free-form description.
    pub description: String,
    /// Votes in favour.
    pub votes_for: u64,
    /// Votes against.
    pub votes_against: u64,
    /// The voting status.
    pub status: ProposalStatus,
    /// Voting deadline in milliseconds since the Unix epoch.
    pub deadline: u64,
}

impl Proposal {
    /// Returns the total number of votes cast.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Returns the share of votes in favour as a percentage, or zero when nobody voted.
    #[must_use]
    pub fn support_percentage(&self) -> f64 {
        match self.total_votes() {
            0 => 0.0,
            total => self.votes_for as f64 * 100.0 / total as f64,
        }
    }

    /// Returns true if the proposal is still open for votes at `now` (milliseconds).
    #[must_use]
    pub fn is_open(&self, now: u64) -> bool {
        self.status == ProposalStatus::Active && now < self.deadline
    }
}
