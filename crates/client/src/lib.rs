//! JamiiFund client.
//!
//! Builds contract calls, hands them to a wallet for signing, waits for confirmation, and keeps
//! the cached chain state and local page state that the front-ends render.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_precision_loss)]

mod builder;
mod config;
mod context;
mod executor;
mod session;
mod wallet;

pub mod hooks;
pub mod kyc;
pub mod pages;

pub use builder::*;
pub use config::*;
pub use context::*;
pub use executor::*;
pub use session::*;
pub use wallet::*;
