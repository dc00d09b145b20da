use std::{convert::Infallible, str::FromStr};

use jamii_rpc::ChainReader;
use jamii_types::{Group, ObjectId};

use crate::{
    pages::{PageError, TransactionSuccess},
    AppContext, Wallet,
};

/// The category selector of the groups page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    /// Every category.
    #[default]
    All,
    /// Exactly this category.
    Only(String),
}

impl CategoryFilter {
    /// Whether `group` passes the filter.
    #[must_use]
    pub fn matches(&self, group: &Group) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => group.category == *category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "" | "all" => Self::All,
            category => Self::Only(category.to_string()),
        })
    }
}

/// What the group list renders.
#[derive(Debug, PartialEq, Eq)]
pub enum GroupsView<'a> {
    /// No group matches; show the empty state.
    Empty,
    /// The matching groups, in fetch order.
    Groups(Vec<&'a Group>),
}

/// Totals shown under the group list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformStats {
    /// Number of groups.
    pub groups: usize,
    /// Sum of member counts.
    pub total_members: u64,
    /// Sum of pooled balances, in MIST.
    pub total_savings: u64,
}

impl PlatformStats {
    /// Totals over `groups`.
    #[must_use]
    pub fn of(groups: &[Group]) -> Self {
        Self {
            groups: groups.len(),
            total_members: groups.iter().map(|g| g.member_count).sum(),
            total_savings: groups.iter().map(|g| g.total_balance).sum(),
        }
    }
}

/// Browsing and joining groups.
#[derive(Debug, Clone, Default)]
pub struct GroupsPage {
    /// Matched against name and description, case-insensitively.
    pub search_term: String,
    /// The category selector.
    pub category: CategoryFilter,
    joining: Option<ObjectId>,
    success: Option<TransactionSuccess>,
}

impl GroupsPage {
    /// Create a new [`GroupsPage`] showing every group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The groups matching the search term and category.
    #[must_use]
    pub fn filtered<'a>(&self, groups: &'a [Group]) -> Vec<&'a Group> {
        let term = self.search_term.trim().to_lowercase();
        groups
            .iter()
            .filter(|group| {
                group.name.to_lowercase().contains(&term)
                    || group.description.to_lowercase().contains(&term)
            })
            .filter(|group| self.category.matches(group))
            .collect()
    }

    /// The list to render.
    #[must_use]
    pub fn view<'a>(&self, groups: &'a [Group]) -> GroupsView<'a> {
        match self.filtered(groups) {
            filtered if filtered.is_empty() => GroupsView::Empty,
            filtered => GroupsView::Groups(filtered),
        }
    }

    /// The group being joined.
    #[must_use]
    pub fn joining(&self) -> Option<ObjectId> {
        self.joining
    }

    /// The last confirmed join.
    #[must_use]
    pub fn success(&self) -> Option<&TransactionSuccess> {
        self.success.as_ref()
    }

    /// Closes the success notice.
    pub fn dismiss_success(&mut self) {
        self.success = None;
    }

    /// Joins `group_id` and schedules a refresh once confirmed.
    pub async fn join<W: Wallet, R: ChainReader>(
        &mut self,
        ctx: &AppContext<W, R>,
        group_id: ObjectId,
    ) -> Result<&TransactionSuccess, PageError> {
        self.joining = Some(group_id);
        let result = ctx.transactions.join_group(group_id).await;
        self.joining = None;

        let result = result?;
        ctx.data.schedule_refresh();
        Ok(self.success.insert(TransactionSuccess::new(result.digest)))
    }
}

#[cfg(test)]
mod tests {
    use jamii_types::Address;

    use super::*;

    fn group(n: u8, name: &str, description: &str, category: &str) -> Group {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        Group {
            id: ObjectId::new(bytes),
            name: name.to_string(),
            description: description.to_string(),
            creator: Address::ZERO,
            member_count: u64::from(n),
            max_members: 20,
            total_balance: 1_000_000_000 * u64::from(n),
            min_contribution: 100_000_000_000,
            loan_ratio: 50,
            kyc_required: true,
            is_active: true,
            created_at: 0,
            category: category.to_string(),
            location: String::new(),
            members: None,
        }
    }

    fn groups() -> Vec<Group> {
        vec![
            group(1, "Tech Savers", "Developers saving together", "professional"),
            group(2, "Mama Mboga", "Market vendors in FinTech-free zone", "business"),
            group(3, "Church Chama", "Community fund", "community"),
        ]
    }

    #[test]
    fn test_search_matches_name_or_description() {
        let groups = groups();
        let page = GroupsPage { search_term: "tech".to_string(), ..GroupsPage::new() };

        let names: Vec<&str> = page.filtered(&groups).iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Tech Savers", "Mama Mboga"]);
    }

    #[test]
    fn test_category_filter() {
        let groups = groups();
        let page = GroupsPage {
            search_term: "tech".to_string(),
            category: "business".parse().unwrap(),
            ..GroupsPage::new()
        };
        let filtered = page.filtered(&groups);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].name, "Mama Mboga");

        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
    }

    #[test]
    fn test_no_match_selects_empty_state() {
        let groups = groups();
        let page = GroupsPage { search_term: "zzz".to_string(), ..GroupsPage::new() };
        assert!(page.filtered(&groups).is_empty());
        assert_eq!(page.view(&groups), GroupsView::Empty);
        assert_eq!(GroupsPage::new().view(&[]), GroupsView::Empty);
    }

    #[test]
    fn test_platform_stats() {
        let stats = PlatformStats::of(&groups());
        assert_eq!(
            stats,
            PlatformStats { groups: 3, total_members: 6, total_savings: 6_000_000_000 }
        );
    }
}
