//! Seconds + nanoseconds time values.

use core::time::Duration;

use crate::nsec::{NSEC_PER_SEC, Nanoseconds, OutOfRangeError};

/// A point in time, as seconds and nanoseconds since the Unix epoch
/// (1970-01-01 00:00:00 +0000 UTC).
///
/// Ordering compares seconds first, then nanoseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timespec {
    /// Whole seconds. Negative values are before the epoch.
    pub tv_sec: i64,
    /// Nanoseconds past `tv_sec`.
    pub tv_nsec: Nanoseconds,
}

impl Timespec {
    /// The Unix epoch.
    pub const EPOCH: Self = Timespec {
        tv_sec: 0,
        tv_nsec: Nanoseconds::ZERO,
    };

    /// Builds a [`Timespec`] from raw fields, as found in a C `struct timespec`.
    pub fn new(tv_sec: i64, tv_nsec: i64) -> Result<Self, OutOfRangeError<i64>> {
        Ok(Self {
            tv_sec,
            tv_nsec: Nanoseconds::try_from(tv_nsec)?,
        })
    }

    /// Returns the time `duration` after the epoch, saturating at the largest representable value.
    pub fn from_duration_since_epoch(duration: Duration) -> Self {
        let tv_sec = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
        Self {
            tv_sec,
            tv_nsec: Nanoseconds::try_from(duration.subsec_nanos()).unwrap_or_default(),
        }
    }

    /// Returns `self + duration`, or `None` on overflow.
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let secs = i64::try_from(duration.as_secs()).ok()?;
        let mut tv_sec = self.tv_sec.checked_add(secs)?;
        let mut nsec = i64::from(self.tv_nsec.as_inner()) + i64::from(duration.subsec_nanos());
        if nsec >= NSEC_PER_SEC {
            nsec -= NSEC_PER_SEC;
            tv_sec = tv_sec.checked_add(1)?;
        }
        Timespec::new(tv_sec, nsec).ok()
    }

    /// Returns the duration from `earlier` to `self`, or `None` if `earlier` is later.
    pub fn duration_since(&self, earlier: &Timespec) -> Option<Duration> {
        if self < earlier {
            return None;
        }

        let mut secs = self.tv_sec.abs_diff(earlier.tv_sec);
        let (now_ns, then_ns) = (self.tv_nsec.as_inner(), earlier.tv_nsec.as_inner());
        let nanos = if now_ns >= then_ns {
            now_ns - then_ns
        } else {
            secs -= 1;
            now_ns + NSEC_PER_SEC as u32 - then_ns
        };
        Some(Duration::new(secs, nanos))
    }
}
