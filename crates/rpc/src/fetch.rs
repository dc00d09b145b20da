use std::{fmt::Display, sync::Arc};

use jamii_types::{
    Address, Coin, Contribution, ContractConfig, Group, Loan, ObjectId, Proposal, SUI_COIN_TYPE,
};
use tracing::{debug, error, warn};

use crate::{
    parse_contribution, parse_group, parse_loan, parse_proposal, ChainReader, FieldError, RpcError,
    SuiObjectResponse,
};

/// Reads contract objects and projects them into domain records.
///
/// Every fetch is independent and best-effort: a failed query is logged and degrades to an empty
/// collection (or a zero balance), and individual objects that cannot be projected are skipped.
#[derive(Debug)]
pub struct DataFetcher<R> {
    reader: Arc<R>,
    contract: ContractConfig,
    groups_owner: Address,
}

impl<R> Clone for DataFetcher<R> {
    fn clone(&self) -> Self {
        Self {
            reader: self.reader.clone(),
            contract: self.contract.clone(),
            groups_owner: self.groups_owner,
        }
    }
}

impl<R: ChainReader> DataFetcher<R> {
    /// Create a new [`DataFetcher`]. Groups and proposals are looked up under the registry.
    pub fn new(reader: Arc<R>, contract: ContractConfig) -> Self {
        let groups_owner = contract.registry_id;
        Self { reader, contract, groups_owner }
    }

    /// Look up groups and proposals under `owner` instead of the registry.
    #[must_use]
    pub fn with_groups_owner(mut self, owner: Address) -> Self {
        self.groups_owner = owner;
        self
    }

    /// The underlying chain reader.
    #[must_use]
    pub fn reader(&self) -> &Arc<R> {
        &self.reader
    }

    /// The contract this fetcher reads.
    #[must_use]
    pub fn contract(&self) -> &ContractConfig {
        &self.contract
    }

    /// Fetches every group.
    pub async fn fetch_groups(&self) -> Vec<Group> {
        match self.owned_objects(&self.groups_owner, "Group").await {
            Ok(objects) => project(&objects, parse_group, "group"),
            Err(e) => {
                error!("failed to fetch groups: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches the groups `address` created or is listed as a member of.
    pub async fn fetch_user_groups(&self, address: &Address) -> Vec<Group> {
        let groups: Vec<Group> =
            self.fetch_groups().await.into_iter().filter(|group| group.involves(address)).collect();
        debug!(%address, count = groups.len(), "resolved user groups");
        groups
    }

    /// Fetches the loans owned by `address`.
    pub async fn fetch_user_loans(&self, address: &Address) -> Vec<Loan> {
        match self.owned_objects(address, "Loan").await {
            Ok(objects) => project(&objects, parse_loan, "loan"),
            Err(e) => {
                error!("failed to fetch user loans: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches the contribution receipts owned by `address`.
    pub async fn fetch_user_contributions(&self, address: &Address) -> Vec<Contribution> {
        match self.owned_objects(address, "Contribution").await {
            Ok(objects) => project(&objects, parse_contribution, "contribution"),
            Err(e) => {
                error!("failed to fetch user contributions: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches the proposals of a group.
    pub async fn fetch_group_proposals(&self, group_id: &ObjectId) -> Vec<Proposal> {
        match self.owned_objects(&self.groups_owner, "Proposal").await {
            Ok(objects) => project(&objects, parse_proposal, "proposal")
                .into_iter()
                .filter(|proposal| proposal.group_id == *group_id)
                .collect(),
            Err(e) => {
                error!("failed to fetch group proposals: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches the coins of `coin_type` (SUI when `None`) owned by `address`.
    pub async fn fetch_coins(&self, address: &Address, coin_type: Option<&str>) -> Vec<Coin> {
        let coin_type = coin_type.unwrap_or(SUI_COIN_TYPE);
        let mut coins = Vec::new();
        let mut cursor = None;
        loop {
            match self.reader.get_coins(address, coin_type, cursor).await {
                Ok(page) => {
                    coins.extend(page.data.into_iter().map(Coin::from));
                    match page.next_cursor {
                        Some(next) if page.has_next_page => cursor = Some(next),
                        _ => break,
                    }
                }
                Err(e) => {
                    error!("failed to fetch coins: {}", e);
                    return Vec::new();
                }
            }
        }
        coins
    }

    /// Fetches the total balance of `coin_type` (SUI when `None`) held by `address`, in MIST.
    pub async fn fetch_balance(&self, address: &Address, coin_type: Option<&str>) -> u64 {
        let coin_type = coin_type.unwrap_or(SUI_COIN_TYPE);
        match self.reader.get_balance(address, coin_type).await {
            Ok(balance) => balance.total_balance,
            Err(e) => {
                error!("failed to fetch balance: {}", e);
                0
            }
        }
    }

    /// Reads every page of the contract objects named `name` owned by `owner`.
    async fn owned_objects(
        &self,
        owner: &Address,
        name: &str,
    ) -> Result<Vec<SuiObjectResponse>, RpcError> {
        let struct_type = self.contract.struct_type(name);
        let mut objects = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.reader.get_owned_objects(owner, &struct_type, cursor).await?;
            objects.extend(page.data);
            match page.next_cursor {
                Some(next) if page.has_next_page => cursor = Some(next),
                _ => break,
            }
        }
        Ok(objects)
    }
}

/// Projects every object with `parse`, skipping the ones that do not fit.
fn project<T>(
    objects: &[SuiObjectResponse],
    parse: impl Fn(&SuiObjectResponse) -> Result<T, FieldError>,
    kind: impl Display,
) -> Vec<T> {
    objects
        .iter()
        .filter_map(|object| match parse(object) {
            Ok(record) => Some(record),
            Err(e) => {
                let id = object.data.as_ref().map(|data| data.object_id.to_string());
                warn!(object = ?id, "skipping {} object: {}", kind, e);
                None
            }
        })
        .collect()
}
