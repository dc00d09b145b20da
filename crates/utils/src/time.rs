use std::time::{SystemTime, UNIX_EPOCH};

/// The number of milliseconds in a minute.
pub const MINUTE_MS: u64 = 60 * 1000;

/// The number of milliseconds in a (non-leap) year.
pub const YEAR_MS: u64 = 365 * 24 * 60 * MINUTE_MS;

/// Returns the current Unix timestamp in milliseconds, the unit the contract records times in.
///
/// # Panics
///
/// Panics if the system time is before the Unix epoch (January 1, 1970).
#[must_use]
pub fn time_now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).expect("time went backwards").as_millis() as u64
}
