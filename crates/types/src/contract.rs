use serde::Deserialize;

use crate::ObjectId;

/// The deployed package id of the JamiiFund contract on testnet.
pub const DEFAULT_PACKAGE_ID: &str =
    "0xfd47f4a88ed7a1ca7c82e72986ba1637da889d1330351ba8832f311284c4cb4c";

/// The Move module holding every JamiiFund entry point.
pub const DEFAULT_MODULE_NAME: &str = "jamiifund";

/// The shared registry object on testnet.
pub const DEFAULT_REGISTRY_ID: &str =
    "0x4947d5d6d7c6cd338491732b163a55fb29f099ba69b819a99f99e3b76e37cab3";

/// The admin capability object on testnet.
pub const DEFAULT_ADMIN_CAP_ID: &str =
    "0x5c65ed84ec5ad2fcce9560cbe350c1fdfb37c40c9ca07a87646cd2749a2d2b34";

/// The fixed identifiers of the deployed contract.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractConfig {
    /// The package the module is published in.
    pub package_id: ObjectId,
    /// The module name.
    pub module_name: String,
    /// The shared registry object passed to group-level calls.
    pub registry_id: ObjectId,
    /// The admin capability object.
    pub admin_cap_id: ObjectId,
}

impl ContractConfig {
    /// Returns the fully qualified target of an entry point, e.g. `0x..::jamiifund::join_group`.
    #[must_use]
    pub fn target(&self, function: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.module_name, function)
    }

    /// Returns the fully qualified struct type of a contract object, e.g. `0x..::jamiifund::Loan`.
    #[must_use]
    pub fn struct_type(&self, name: &str) -> String {
        format!("{}::{}::{}", self.package_id, self.module_name, name)
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            package_id: DEFAULT_PACKAGE_ID.parse().expect("valid default package id"),
            module_name: DEFAULT_MODULE_NAME.to_string(),
            registry_id: DEFAULT_REGISTRY_ID.parse().expect("valid default registry id"),
            admin_cap_id: DEFAULT_ADMIN_CAP_ID.parse().expect("valid default admin cap id"),
        }
    }
}
