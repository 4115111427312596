//! Manual-reset event kernel objects.

use crate::{
    error::{KernelError as KError, ToRawResultCode},
    raw,
    result::{Error, ResultCode, raw::Result as RawResult},
};

define_waitable_handle_type! {
    /// A handle to an event kernel object.
    pub struct Handle
}

/// Creates an event, or opens the event already registered under `name`.
///
/// On success returns the handle and `true` if the event already existed.
pub fn create(signalled: bool, name: Option<&str>) -> Result<(Handle, bool), CreateEventError> {
    let mut handle = raw::INVALID_HANDLE;
    let mut existed = false;
    let rc = raw::create_event(&mut handle, &mut existed, signalled, name);
    RawResult::from_raw(rc).map((Handle(handle), existed), |rc| match rc.description() {
        desc if KError::InvalidSize == desc => CreateEventError::InvalidSize,
        desc if KError::InvalidHandle == desc => CreateEventError::InvalidHandle,
        desc if KError::AccessDenied == desc => CreateEventError::AccessDenied,
        desc if KError::OutOfHandles == desc => CreateEventError::OutOfHandles,
        _ => CreateEventError::Unknown(Error::from(rc)),
    })
}

/// Error type for [`create`]
#[derive(Debug, thiserror::Error)]
pub enum CreateEventError {
    #[error("Invalid size")]
    InvalidSize,
    /// The name is registered to an object that is not an event.
    #[error("Invalid handle")]
    InvalidHandle,
    #[error("Access denied")]
    AccessDenied,
    #[error("Out of handles")]
    OutOfHandles,
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl ToRawResultCode for CreateEventError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::InvalidSize => KError::InvalidSize.to_rc(),
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::AccessDenied => KError::AccessDenied.to_rc(),
            Self::OutOfHandles => KError::OutOfHandles.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}

/// Sets the event, waking every thread waiting on it.
pub fn signal(handle: &Handle) -> Result<(), EventError> {
    let rc = raw::signal_event(handle.0);
    RawResult::from_raw(rc).map_err(EventError::from_rc)
}

/// Clears the event.
pub fn clear(handle: &Handle) -> Result<(), EventError> {
    let rc = raw::clear_event(handle.0);
    RawResult::from_raw(rc).map_err(EventError::from_rc)
}

/// Error type for [`signal`] and [`clear`]
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The handle is not an open event handle.
    #[error("Invalid handle")]
    InvalidHandle,
    #[error("Unknown error: {0}")]
    Unknown(Error),
}

impl EventError {
    fn from_rc(rc: crate::result::raw::ResultCode) -> Self {
        match rc.description() {
            desc if KError::InvalidHandle == desc => EventError::InvalidHandle,
            _ => EventError::Unknown(Error::from(rc)),
        }
    }
}

impl ToRawResultCode for EventError {
    fn to_rc(self) -> ResultCode {
        match self {
            Self::InvalidHandle => KError::InvalidHandle.to_rc(),
            Self::Unknown(err) => err.to_raw(),
        }
    }
}
