//! Kernel error modules and descriptions.
//!
//! A result code identifies the _module_ that produced the failure and a _description_ of the
//! failure within that module. The kernel object layer reports every failure under
//! [`Module::Kernel`] with one of the [`KernelError`] descriptions.

use crate::result::{ResultCode, raw};

/// The module that produced a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Module {
    /// The kernel object layer.
    Kernel = 1,
    /// A module value this crate does not know about.
    Unknown = 0x1FF,
}

impl Module {
    /// Converts a raw 9-bit module number into a [`Module`].
    pub const fn from_raw(value: u32) -> Self {
        match value {
            1 => Module::Kernel,
            _ => Module::Unknown,
        }
    }
}

/// Descriptions of the failures reported by the kernel object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum KernelError {
    /// A size or length argument is not acceptable (e.g. an oversized object name).
    InvalidSize = 101,
    /// Kernel bookkeeping memory is exhausted.
    OutOfMemory = 104,
    /// The process handle table is full.
    OutOfHandles = 105,
    /// The handle does not exist, or refers to an object of another type.
    InvalidHandle = 114,
    /// The combination of arguments is inconsistent (e.g. `initial > max`).
    InvalidCombination = 116,
    /// A wait expired before the object became signalled.
    TimedOut = 117,
    /// A counter would leave its allowed range.
    OutOfRange = 119,
    /// No object is registered under the requested name.
    NotFound = 121,
    /// The calling thread lacks the privilege for the requested operation.
    AccessDenied = 134,
}

impl KernelError {
    /// Returns the description value of this error.
    pub const fn description(self) -> u32 {
        self as u32
    }
}

impl PartialEq<u32> for KernelError {
    fn eq(&self, other: &u32) -> bool {
        self.description() == *other
    }
}

impl PartialEq<KernelError> for u32 {
    fn eq(&self, other: &KernelError) -> bool {
        *self == other.description()
    }
}

/// Types that can be used as the description field of a result code.
pub trait IntoDescription {
    /// Returns the raw description value.
    fn into_value(self) -> u32;
}

impl IntoDescription for u32 {
    fn into_value(self) -> u32 {
        self
    }
}

impl IntoDescription for KernelError {
    fn into_value(self) -> u32 {
        self.description()
    }
}

/// Conversion of typed errors back into their raw result code.
pub trait ToRawResultCode {
    /// Returns the raw result code this error was translated from.
    fn to_rc(self) -> ResultCode;
}

impl ToRawResultCode for KernelError {
    fn to_rc(self) -> ResultCode {
        raw::ResultCode::from_parts(Module::Kernel, self).to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Error;

    #[test]
    fn kernel_error_round_trips_through_result_code() {
        let rc = KernelError::TimedOut.to_rc();
        let err = Error::from(raw::ResultCode::from_raw(rc));

        assert_eq!(err.module(), Module::Kernel);
        assert!(KernelError::TimedOut == err.description());
        assert_eq!(format!("{err}"), "2001-0117");
    }

    #[test]
    fn unknown_module_is_preserved_as_unknown() {
        let err = Error::from_parts(Module::Unknown, 7u32);
        assert_eq!(err.module(), Module::Unknown);
        assert_eq!(err.description(), 7);
    }
}
