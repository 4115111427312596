//! Nanosecond type and constants

use core::fmt;

use static_assertions::const_assert_eq;

/// The number of nanoseconds in a second.
pub const NSEC_PER_SEC: i64 = 1_000_000_000;

/// The minimum valid value for a nanosecond.
pub const NSEC_MIN: i64 = 0;

/// The maximum valid value for a nanosecond.
pub const NSEC_MAX: i64 = NSEC_PER_SEC - 1;

/// A sub-second count of nanoseconds, in the range `0..=999_999_999`.
///
/// Values can only be built through [`TryFrom`], so a `Nanoseconds` is always in range.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Nanoseconds(u32);

// Asserts that the size of the type is the same as the size of the inner type
const_assert_eq!(size_of::<Nanoseconds>(), size_of::<u32>());

impl Nanoseconds {
    /// The zero value for this type.
    pub const ZERO: Self = Nanoseconds(0);

    /// Returns the underlying integer.
    #[inline]
    pub const fn as_inner(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Nanoseconds {
    type Error = OutOfRangeError<i64>;

    /// Try converting from an `i64` to a `Nanoseconds` value.
    ///
    /// If the value is not within the valid range, an [`OutOfRangeError`] is returned.
    #[inline]
    fn try_from(val: i64) -> Result<Self, Self::Error> {
        if (NSEC_MIN..=NSEC_MAX).contains(&val) {
            Ok(Nanoseconds(val as u32))
        } else {
            Err(OutOfRangeError(val))
        }
    }
}

impl TryFrom<u32> for Nanoseconds {
    type Error = OutOfRangeError<u32>;

    #[inline]
    fn try_from(val: u32) -> Result<Self, Self::Error> {
        if val <= NSEC_MAX as u32 {
            Ok(Nanoseconds(val))
        } else {
            Err(OutOfRangeError(val))
        }
    }
}

impl fmt::Display for Nanoseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <u32 as fmt::Display>::fmt(&self.0, f)
    }
}

impl fmt::Debug for Nanoseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <u32 as fmt::Debug>::fmt(&self.0, f)
    }
}

/// An error indicating that a value is out of range
#[derive(Debug, thiserror::Error)]
#[error("value out of range: {0}")]
pub struct OutOfRangeError<T: fmt::Debug>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_full_sub_second_range() {
        assert_eq!(Nanoseconds::try_from(0i64).unwrap(), Nanoseconds::ZERO);
        assert_eq!(
            Nanoseconds::try_from(NSEC_MAX).unwrap().as_inner(),
            999_999_999
        );
    }

    #[test]
    fn rejects_values_outside_a_second() {
        assert!(Nanoseconds::try_from(-1i64).is_err());
        assert!(Nanoseconds::try_from(NSEC_PER_SEC).is_err());
        assert!(Nanoseconds::try_from(1_000_000_000u32).is_err());
    }
}
