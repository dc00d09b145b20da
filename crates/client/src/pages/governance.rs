use jamii_rpc::ChainReader;
use jamii_types::{ObjectId, Proposal};

use crate::{
    pages::{PageError, TransactionSuccess},
    AppContext, Wallet,
};

/// The tabs of the governance page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GovernanceTab {
    /// Proposals open for votes.
    #[default]
    Active,
    /// Closed or decided proposals.
    History,
}

/// Share of `member_count` members that voted on `proposal`, as a percentage.
#[must_use]
pub fn participation(proposal: &Proposal, member_count: u64) -> f64 {
    match member_count {
        0 => 0.0,
        members => proposal.total_votes() as f64 * 100.0 / members as f64,
    }
}

/// Proposals and voting for one group.
#[derive(Debug, Clone)]
pub struct GovernancePage {
    group_id: ObjectId,
    /// The selected tab.
    pub tab: GovernanceTab,
    proposals: Vec<Proposal>,
    success: Option<TransactionSuccess>,
}

impl GovernancePage {
    /// Create a new [`GovernancePage`] for `group_id`.
    #[must_use]
    pub fn new(group_id: ObjectId) -> Self {
        Self { group_id, tab: GovernanceTab::default(), proposals: Vec::new(), success: None }
    }

    /// The group under governance.
    #[must_use]
    pub fn group_id(&self) -> ObjectId {
        self.group_id
    }

    /// The last confirmed vote.
    #[must_use]
    pub fn success(&self) -> Option<&TransactionSuccess> {
        self.success.as_ref()
    }

    /// Fetches the group's proposals.
    pub async fn load<W: Wallet, R: ChainReader>(&mut self, ctx: &AppContext<W, R>) {
        self.proposals = ctx.data.fetch_group_proposals(self.group_id).await;
    }

    /// Picks up the proposals cached by the last refresh, without fetching.
    pub async fn sync<W: Wallet, R: ChainReader>(&mut self, ctx: &AppContext<W, R>) {
        if let Some(proposals) = ctx.data.state().await.proposals.remove(&self.group_id) {
            self.proposals = proposals;
        }
    }

    /// The proposals of the selected tab at `now` (milliseconds).
    #[must_use]
    pub fn visible(&self, now: u64) -> Vec<&Proposal> {
        self.proposals
            .iter()
            .filter(|proposal| proposal.is_open(now) == (self.tab == GovernanceTab::Active))
            .collect()
    }

    /// Votes for (`true`) or against (`false`) a proposal and schedules a refresh.
    pub async fn vote<W: Wallet, R: ChainReader>(
        &mut self,
        ctx: &AppContext<W, R>,
        proposal_id: ObjectId,
        approve: bool,
    ) -> Result<&TransactionSuccess, PageError> {
        let result = ctx.transactions.vote_on_proposal(proposal_id, approve).await?;
        ctx.data.schedule_refresh();
        Ok(self.success.insert(TransactionSuccess::new(result.digest)))
    }
}

#[cfg(test)]
mod tests {
    use jamii_types::{Address, ProposalStatus, ProposalType};

    use super::*;

    fn id(n: u8) -> ObjectId {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        ObjectId::new(bytes)
    }

    fn proposal(n: u8, status: ProposalStatus, deadline: u64) -> Proposal {
        Proposal {
            id: id(n),
            group_id: id(1),
            proposer: Address::ZERO,
            proposal_type: ProposalType::RuleChange,
            description: format!("proposal {n}"),
            votes_for: 3,
            votes_against: 1,
            status,
            deadline,
        }
    }

    #[test]
    fn test_tabs_split_open_and_closed() {
        let mut page = GovernancePage::new(id(1));
        page.proposals = vec![
            proposal(2, ProposalStatus::Active, 2_000),
            proposal(3, ProposalStatus::Active, 500),
            proposal(4, ProposalStatus::Passed, 2_000),
        ];

        let active: Vec<ObjectId> = page.visible(1_000).iter().map(|p| p.id).collect();
        assert_eq!(active, [id(2)]);

        page.tab = GovernanceTab::History;
        let history: Vec<ObjectId> = page.visible(1_000).iter().map(|p| p.id).collect();
        assert_eq!(history, [id(3), id(4)]);
    }

    #[test]
    fn test_participation() {
        let p = proposal(2, ProposalStatus::Active, 0);
        assert!((participation(&p, 8) - 50.0).abs() < f64::EPSILON);
        assert!(participation(&p, 0).abs() < f64::EPSILON);
    }
}
