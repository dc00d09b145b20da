//! JamiiFund Utilities.
//!
//! Miscellaneous utilities shared by the JamiiFund client crates.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::cast_possible_truncation)]
#![warn(missing_docs)]

mod explorer;
mod logger;
mod time;

pub use explorer::*;
pub use logger::*;
pub use time::*;
