//! Raw fullnode response types.
//!
//! Only the parts of the Sui JSON-RPC schema the client reads are modelled; everything else is
//! ignored during deserialization.

use jamii_types::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// The maximum page size accepted by the fullnode.
pub const MAX_PAGE_SIZE: usize = 50;

/// One page of a cursor-paginated response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// The cursor to pass to fetch the next page.
    #[serde(default)]
    pub next_cursor: Option<Value>,
    /// Whether another page follows.
    #[serde(default)]
    pub has_next_page: bool,
}

impl<T> Page<T> {
    /// Returns a single page holding `data`.
    #[must_use]
    pub fn last(data: Vec<T>) -> Self {
        Self { data, next_cursor: None, has_next_page: false }
    }
}

/// The entry for one object in an object query.
#[derive(Debug, Clone, Deserialize)]
pub struct SuiObjectResponse {
    /// The object data, if it could be read.
    #[serde(default)]
    pub data: Option<SuiObjectData>,
    /// The reason the object could not be read.
    #[serde(default)]
    pub error: Option<Value>,
}

/// The data of an on-chain object.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiObjectData {
    /// The object id.
    pub object_id: ObjectId,
    /// The fully qualified type of the object.
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    /// The parsed Move content of the object.
    #[serde(default)]
    pub content: Option<SuiParsedData>,
}

/// The parsed content of an object.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "dataType", rename_all = "camelCase")]
pub enum SuiParsedData {
    /// A Move struct instance.
    MoveObject {
        /// The fully qualified struct type.
        #[serde(rename = "type")]
        object_type: String,
        /// The struct fields, as rendered by the fullnode.
        fields: Map<String, Value>,
    },
    /// A published package.
    Package {},
}

/// A coin object as returned by `suix_getCoins`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinRecord {
    /// The fully qualified coin type.
    pub coin_type: String,
    /// The coin object id.
    pub coin_object_id: ObjectId,
    /// The object version.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub version: u64,
    /// The object digest.
    pub digest: String,
    /// The coin balance in MIST.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub balance: u64,
}

/// The total balance of one coin type as returned by `suix_getBalance`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceRecord {
    /// The fully qualified coin type.
    pub coin_type: String,
    /// The number of coin objects of this type.
    pub coin_object_count: u64,
    /// The total balance in MIST.
    #[serde(deserialize_with = "u64_from_str_or_number")]
    pub total_balance: u64,
}

/// Which parts of a transaction block to include in a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponseOptions {
    /// Include the transaction effects.
    pub show_effects: bool,
    /// Include the emitted events.
    pub show_events: bool,
    /// Include the object changes.
    pub show_object_changes: bool,
}

impl TransactionBlockResponseOptions {
    /// Options requesting effects, events and object changes.
    #[must_use]
    pub const fn full() -> Self {
        Self { show_effects: true, show_events: true, show_object_changes: true }
    }
}

/// A transaction block as returned by `sui_getTransactionBlock`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    /// The transaction digest.
    pub digest: String,
    /// The transaction effects.
    #[serde(default)]
    pub effects: Option<Value>,
    /// The emitted events.
    #[serde(default)]
    pub events: Option<Vec<Value>>,
    /// The object changes.
    #[serde(default)]
    pub object_changes: Option<Vec<Value>>,
}

/// Deserializes a `u64` the fullnode may render either as a JSON number or a decimal string.
pub fn u64_from_str_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(u64),
        Text(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
