use serde::{Deserialize, Serialize};

use crate::ObjectId;

/// The coin type of the native SUI token.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// A coin object owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// The id of the coin object.
    pub coin_object_id: ObjectId,
    /// The fully qualified coin type, e.g. `0x2::sui::SUI`.
    pub coin_type: String,
    /// The balance held by the coin in MIST.
    pub balance: u64,
    /// The object version.
    pub version: u64,
    /// The object digest.
    pub digest: String,
}
