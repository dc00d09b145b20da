//! JamiiFund Types.
//!
//! Read-only records mirrored from the JamiiFund Move package. The client never mutates these
//! directly; they are refreshed by re-querying the chain.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::struct_excessive_bools)]
#![warn(missing_docs)]

/// Implements `FromStr`, `TryFrom<u8>` and `Display` for a tagged status enum with an `ALL` table
/// in on-chain ordinal order and an `as_str` method.
macro_rules! impl_tagged_variant {
    ($type:ty, $kind:literal) => {
        impl ::std::str::FromStr for $type {
            type Err = $crate::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .into_iter()
                    .find(|variant| variant.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| $crate::UnknownVariant::new($kind, s))
            }
        }

        impl TryFrom<u8> for $type {
            type Error = $crate::UnknownVariant;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                Self::ALL
                    .get(usize::from(value))
                    .copied()
                    .ok_or_else(|| $crate::UnknownVariant::new($kind, value))
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

mod address;
mod amount;
mod coin;
mod contract;
mod error;
mod group;
mod loan;
mod proposal;
mod transaction;

pub use address::*;
pub use amount::*;
pub use coin::*;
pub use contract::*;
pub use error::*;
pub use group::*;
pub use loan::*;
pub use proposal::*;
pub use transaction::*;
