//! Waiting on and closing kernel objects.

use crate::{
    error::{KernelError as KError, ToRawResultCode},
    handle::Waitable,
    raw,
    result::{Error, ResultCode, raw::Result as RawResult},
};

pub use crate::raw::INFINITE;

/// Waits on a single synchronization object
///
/// Suspends the current thread until the object is acquired or the timeout expires.
///
/// # Arguments
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | IN | _handle_ | Object to wait on. |
/// | IN | _timeout_ns_ | Timeout in nanoseconds. Use [`INFINITE`] for an infinite wait, `0` for an immediate check. |
///
/// # Behavior
/// - A semaphore is acquired by taking one unit of its count; the call returns as soon as the
///   count is positive.
/// - An event is acquired while it is signalled. Acquiring does not clear it.
/// - Otherwise the thread blocks until the object becomes available, returning
///   [`WaitSynchronizationError::TimedOut`] when the timeout expires first.
pub fn wait_synchronization_single<H>(
    handle: &H,
    timeout_ns: u64,
) -> Result<(), WaitSynchronizationError>
where
    H: Waitable,
{
    let rc = raw::wait_synchronization_single(handle.raw_handle(), timeout_ns);
    RawResult::from_raw(rc).map_err(|rc| match rc.description() {
        desc if KError::InvalidHandle == desc => WaitSynchronizationError::InvalidHandle,
        desc if KError::TimedOut == desc => WaitSynchronizationError::TimedOut,
        _ => WaitSynchronizationError::Unknown(Error::from(rc)),
    })
}

/// Error type for [`wait_synchronization_single`]
#[derive(Debug, thiserror::Error)]
pub enum WaitSynchronizationError {
    /// The handle is not open.
    #[error("Invalid handle")]
    InvalidHandle,
    /// The wait operation timed out.
    #[error("Operation timed out")]
    TimedOut,
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for WaitSynchronizationError {
    fn to_rc(self) -> ResultCode {
        match self {
            WaitSynchronizationError::InvalidHandle => KError::InvalidHandle.to_rc(),
            WaitSynchronizationError::TimedOut => KError::TimedOut.to_rc(),
            WaitSynchronizationError::Unknown(err) => err.to_raw(),
        }
    }
}

/// Closes (dereferences) a handle.
///
/// The underlying kernel object is only destroyed once **all** outstanding handles are closed.
/// Closing an already-closed handle is reported as [`CloseHandleError::InvalidHandle`].
pub fn close_handle<H>(handle: H) -> Result<(), CloseHandleError>
where
    H: Waitable,
{
    let rc = raw::close_handle(handle.raw_handle());
    RawResult::from_raw(rc).map_err(|rc| match rc.description() {
        desc if KError::InvalidHandle == desc => CloseHandleError::InvalidHandle,
        _ => CloseHandleError::Unknown(rc.into()),
    })
}

/// Error type for [`close_handle`]
#[derive(Debug, thiserror::Error)]
pub enum CloseHandleError {
    /// The supplied handle is not open.
    #[error("Invalid handle")]
    InvalidHandle,
    /// Any unforeseen kernel error. Contains the original [`Error`] so callers
    /// can inspect the raw result (`Error::to_raw`).
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for CloseHandleError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}
