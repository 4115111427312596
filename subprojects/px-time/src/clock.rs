//! Realtime clock.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Timespec;

/// Returns the current `CLOCK_REALTIME` time.
///
/// A system clock set before the epoch reads as [`Timespec::EPOCH`].
pub fn realtime_now() -> Timespec {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(Timespec::from_duration_since_epoch)
        .unwrap_or(Timespec::EPOCH)
}
