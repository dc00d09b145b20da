//! JamiiFund RPC.
//!
//! Read access to a Sui fullnode over JSON-RPC, and the projection of raw contract objects into the
//! records of [`jamii_types`].

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]

mod client;
mod error;
mod fetch;
mod parse;
mod reader;
mod retry;
mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use client::*;
pub use error::*;
pub use fetch::*;
pub use parse::*;
pub use reader::*;
pub use retry::*;
pub use types::*;
