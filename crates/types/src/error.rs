use std::fmt::Display;

use thiserror::Error;

/// An error returned when a tagged on-chain field holds a value with no matching variant.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// The kind of field, e.g. `loan status`.
    pub kind: &'static str,
    /// The offending value.
    pub value: String,
}

impl UnknownVariant {
    /// Creates a new [`UnknownVariant`].
    pub fn new(kind: &'static str, value: impl Display) -> Self {
        Self { kind, value: value.to_string() }
    }
}
