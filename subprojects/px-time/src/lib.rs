//! # px-time
//!
//! Wall-clock time values and the conversion of absolute deadlines into the relative,
//! nanosecond timeouts taken by kernel wait calls.

pub mod clock;
pub mod deadline;
mod nsec;
mod timespec;

pub use self::{
    nsec::{NSEC_MAX, NSEC_PER_SEC, Nanoseconds, OutOfRangeError},
    timespec::Timespec,
};
