//! Absolute deadline to relative timeout conversion.
//!
//! Kernel waits take a relative timeout in nanoseconds where `0` polls and `u64::MAX` waits
//! forever. POSIX timed waits take an absolute `CLOCK_REALTIME` deadline instead.

use crate::{Timespec, clock};

/// Largest finite timeout. One below the infinite-wait sentinel.
pub const MAX_FINITE_TIMEOUT_NS: u64 = u64::MAX - 1;

/// Returns the relative timeout, in nanoseconds, left until `deadline`.
///
/// Deadlines at or before the current time yield `0`, an immediate poll. The result never equals
/// `u64::MAX`, so a finite deadline is never turned into an infinite wait.
pub fn timeout_ns_until(deadline: &Timespec) -> u64 {
    timeout_ns_between(&clock::realtime_now(), deadline)
}

/// Returns the relative timeout, in nanoseconds, from `now` until `deadline`.
pub fn timeout_ns_between(now: &Timespec, deadline: &Timespec) -> u64 {
    match deadline.duration_since(now) {
        Some(remaining) => u64::try_from(remaining.as_nanos())
            .unwrap_or(MAX_FINITE_TIMEOUT_NS)
            .min(MAX_FINITE_TIMEOUT_NS),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn past_deadline_is_a_poll() {
        let now = Timespec::new(100, 0).unwrap();
        let past = Timespec::new(99, 999_999_999).unwrap();

        assert_eq!(timeout_ns_between(&now, &past), 0);
        assert_eq!(timeout_ns_between(&now, &now), 0);
    }

    #[test]
    fn future_deadline_yields_remaining_nanoseconds() {
        let now = Timespec::new(100, 250_000_000).unwrap();
        let deadline = Timespec::new(101, 0).unwrap();

        assert_eq!(timeout_ns_between(&now, &deadline), 750_000_000);
    }

    #[test]
    fn far_deadline_stays_finite() {
        let now = Timespec::new(i64::MIN, 0).unwrap();
        let deadline = Timespec::new(i64::MAX, 0).unwrap();

        assert_eq!(timeout_ns_between(&now, &deadline), MAX_FINITE_TIMEOUT_NS);
    }
}
