use serde::{Deserialize, Serialize};

use crate::{Address, ObjectId};

/// A savings group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// The id of the group object.
    pub id: ObjectId,
    /// The display name.
    pub name: String,
    /// A free-form description.
    pub description: String,
    /// The account that created the group.
    pub creator: Address,
    /// The current number of members.
    pub member_count: u64,
    /// The membership cap.
    pub max_members: u64,
    /// The pooled balance in MIST.
    pub total_balance: u64,
    /// The minimum contribution in MIST.
    pub min_contribution: u64,
    /// The loan-to-contribution ratio in percent.
    pub loan_ratio: u64,
    /// Whether members need a KYC badge.
    pub kyc_required: bool,
    /// Whether the group accepts activity.
    pub is_active: bool,
    /// Creation time in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// The category, empty when the contract does not record one.
    pub category: String,
    /// The location, empty when the contract does not record one.
    pub location: String,
    /// The member list, when the contract exposes it on the group object.
    pub members: Option<Vec<Address>>,
}

impl Group {
    /// Returns true if the group has no free membership slots.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.member_count >= self.max_members
    }

    /// Returns true if `address` created the group or appears in its member list.
    #[must_use]
    pub fn involves(&self, address: &Address) -> bool {
        self.creator == *address
            || self.members.as_ref().is_some_and(|members| members.contains(address))
    }
}

/// A contribution made by an account to a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// The id of the contribution object.
    pub id: ObjectId,
    /// The group the contribution was made to.
    pub group_id: ObjectId,
    /// The contributing account.
    pub contributor: Address,
    /// The amount in MIST.
    pub amount: u64,
    /// Contribution time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}
