//! Semaphore kernel objects.
//!
//! Thin wrappers around the semaphore calls of the [Raw API](crate::raw), translating each raw
//! [`ResultCode`] into a dedicated error enum. Waiting on a semaphore goes through
//! [`sync::wait_synchronization_single`](crate::sync::wait_synchronization_single) and closing it
//! through [`sync::close_handle`](crate::sync::close_handle).

use crate::{
    error::{KernelError as KError, ToRawResultCode},
    raw,
    result::{Error, ResultCode, raw::Result as RawResult},
};

define_waitable_handle_type! {
    /// A handle to a semaphore kernel object.
    pub struct Handle
}

/// Whether [`create`] made a new object or opened an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A new semaphore was created with the requested counts.
    Created,
    /// The name already referred to a semaphore; the requested counts were ignored.
    Opened,
}

/// Creates a semaphore, or opens the semaphore already registered under `name`.
///
/// On success returns the new handle and whether the object was created or already existed.
/// When it already existed, `initial_count` and `max_count` are ignored.
pub fn create(
    initial_count: i32,
    max_count: i32,
    name: Option<&str>,
) -> Result<(Handle, Disposition), CreateSemaphoreError> {
    let mut handle = raw::INVALID_HANDLE;
    let mut existed = false;
    let rc = raw::create_semaphore(&mut handle, &mut existed, initial_count, max_count, name);

    let disposition = if existed {
        Disposition::Opened
    } else {
        Disposition::Created
    };
    RawResult::from_raw(rc).map((Handle(handle), disposition), |rc| {
        match rc.description() {
            desc if KError::InvalidCombination == desc => CreateSemaphoreError::InvalidCombination,
            desc if KError::InvalidSize == desc => CreateSemaphoreError::InvalidSize,
            desc if KError::InvalidHandle == desc => CreateSemaphoreError::InvalidHandle,
            desc if KError::AccessDenied == desc => CreateSemaphoreError::AccessDenied,
            desc if KError::OutOfHandles == desc => CreateSemaphoreError::OutOfHandles,
            desc if KError::OutOfMemory == desc => CreateSemaphoreError::OutOfMemory,
            _ => CreateSemaphoreError::Unknown(Error::from(rc)),
        }
    })
}

/// Error type for [`create`]
#[derive(Debug, thiserror::Error)]
pub enum CreateSemaphoreError {
    /// The initial count is negative or above the maximum, or the maximum is not positive.
    #[error("Invalid combination")]
    InvalidCombination,
    /// The name is longer than [`raw::MAX_NAME_LEN`].
    #[error("Invalid size")]
    InvalidSize,
    /// The name is registered to an object that is not a semaphore.
    #[error("Invalid handle")]
    InvalidHandle,
    /// The calling thread may not create objects in the global namespace.
    #[error("Access denied")]
    AccessDenied,
    /// The handle table is full.
    #[error("Out of handles")]
    OutOfHandles,
    /// Kernel bookkeeping memory could not be allocated.
    #[error("Out of memory")]
    OutOfMemory,
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for CreateSemaphoreError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::InvalidCombination => KError::InvalidCombination.to_rc(),
            Self::InvalidSize => KError::InvalidSize.to_rc(),
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::AccessDenied => KError::AccessDenied.to_rc(),
            Self::OutOfHandles => KError::OutOfHandles.to_rc(),
            Self::OutOfMemory => KError::OutOfMemory.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}

/// Opens the semaphore registered under `name`. Never creates one.
pub fn open(name: &str) -> Result<Handle, OpenSemaphoreError> {
    let mut handle = raw::INVALID_HANDLE;
    let rc = raw::open_semaphore(&mut handle, name);
    RawResult::from_raw(rc).map(Handle(handle), |rc| match rc.description() {
        desc if KError::NotFound == desc => OpenSemaphoreError::NotFound,
        desc if KError::InvalidHandle == desc => OpenSemaphoreError::InvalidHandle,
        desc if KError::InvalidSize == desc => OpenSemaphoreError::InvalidSize,
        desc if KError::OutOfHandles == desc => OpenSemaphoreError::OutOfHandles,
        desc if KError::OutOfMemory == desc => OpenSemaphoreError::OutOfMemory,
        _ => OpenSemaphoreError::Unknown(Error::from(rc)),
    })
}

/// Error type for [`open`]
#[derive(Debug, thiserror::Error)]
pub enum OpenSemaphoreError {
    /// No object is registered under the name.
    #[error("Not found")]
    NotFound,
    /// The name is registered to an object that is not a semaphore.
    #[error("Invalid handle")]
    InvalidHandle,
    /// The name is longer than [`raw::MAX_NAME_LEN`].
    #[error("Invalid size")]
    InvalidSize,
    /// The handle table is full.
    #[error("Out of handles")]
    OutOfHandles,
    /// Kernel bookkeeping memory could not be allocated.
    #[error("Out of memory")]
    OutOfMemory,
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for OpenSemaphoreError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::NotFound => KError::NotFound.to_rc(),
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::InvalidSize => KError::InvalidSize.to_rc(),
            Self::OutOfHandles => KError::OutOfHandles.to_rc(),
            Self::OutOfMemory => KError::OutOfMemory.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}

/// Adds `count` to the semaphore and returns the count it had before.
///
/// Fails with [`ReleaseSemaphoreError::OutOfRange`] if the result would exceed the semaphore's
/// maximum; the count is then unchanged.
pub fn release(handle: &Handle, count: i32) -> Result<i32, ReleaseSemaphoreError> {
    let mut previous = 0;
    let rc = raw::release_semaphore(&mut previous, handle.0, count);
    RawResult::from_raw(rc).map(previous, |rc| match rc.description() {
        desc if KError::InvalidHandle == desc => ReleaseSemaphoreError::InvalidHandle,
        desc if KError::OutOfRange == desc => ReleaseSemaphoreError::OutOfRange,
        desc if KError::InvalidCombination == desc => ReleaseSemaphoreError::InvalidCombination,
        _ => ReleaseSemaphoreError::Unknown(Error::from(rc)),
    })
}

/// Error type for [`release`]
#[derive(Debug, thiserror::Error)]
pub enum ReleaseSemaphoreError {
    /// The handle is not an open semaphore handle.
    #[error("Invalid handle")]
    InvalidHandle,
    /// The release would push the count over the maximum.
    #[error("Out of range")]
    OutOfRange,
    /// The release count is not positive.
    #[error("Invalid combination")]
    InvalidCombination,
    /// An unknown error occurred.
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for ReleaseSemaphoreError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::OutOfRange => KError::OutOfRange.to_rc(),
            Self::InvalidCombination => KError::InvalidCombination.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}
