//! POSIX error kinds reported by the semaphore operations.

use core::ffi::c_int;

/// The error kinds a semaphore operation can fail with.
///
/// Each kind corresponds to one `errno` value; see [`Errno::to_raw`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Errno {
    /// An absent reference, an out-of-range value, a malformed name or deadline, or a kernel
    /// failure with no better translation (`EINVAL`).
    #[error("Invalid argument")]
    InvalidArgument,
    /// Memory for the semaphore could not be allocated (`ENOMEM`).
    #[error("Out of memory")]
    OutOfMemory,
    /// The kernel could not create the semaphore object (`ENOSPC`).
    #[error("Out of resources")]
    OutOfResources,
    /// The kernel refused access to the named object (`EACCES`).
    #[error("Permission denied")]
    PermissionDenied,
    /// No semaphore exists under the name and creation was not requested (`ENOENT`).
    #[error("No such semaphore")]
    NotFound,
    /// Exclusive creation was requested but the name already exists (`EEXIST`).
    #[error("Semaphore already exists")]
    AlreadyExists,
    /// The count is zero and the caller asked not to block (`EAGAIN`).
    #[error("Operation would block")]
    WouldBlock,
    /// The deadline passed before the count became positive (`ETIMEDOUT`).
    #[error("Operation timed out")]
    TimedOut,
    /// Posting would push the count past [`SEM_VALUE_MAX`](crate::SEM_VALUE_MAX) (`EOVERFLOW`).
    #[error("Value too large")]
    ValueOverflow,
}

impl Errno {
    /// Returns the `errno` value of this kind.
    pub const fn to_raw(self) -> c_int {
        match self {
            Errno::InvalidArgument => libc::EINVAL,
            Errno::OutOfMemory => libc::ENOMEM,
            Errno::OutOfResources => libc::ENOSPC,
            Errno::PermissionDenied => libc::EACCES,
            Errno::NotFound => libc::ENOENT,
            Errno::AlreadyExists => libc::EEXIST,
            Errno::WouldBlock => libc::EAGAIN,
            Errno::TimedOut => libc::ETIMEDOUT,
            Errno::ValueOverflow => libc::EOVERFLOW,
        }
    }

    /// Returns the kind for an `errno` value, if it is one the semaphore operations report.
    pub const fn from_raw(raw: c_int) -> Option<Self> {
        Some(match raw {
            libc::EINVAL => Errno::InvalidArgument,
            libc::ENOMEM => Errno::OutOfMemory,
            libc::ENOSPC => Errno::OutOfResources,
            libc::EACCES => Errno::PermissionDenied,
            libc::ENOENT => Errno::NotFound,
            libc::EEXIST => Errno::AlreadyExists,
            libc::EAGAIN => Errno::WouldBlock,
            libc::ETIMEDOUT => Errno::TimedOut,
            libc::EOVERFLOW => Errno::ValueOverflow,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_values_map_back_to_their_kind() {
        let kinds = [
            Errno::InvalidArgument,
            Errno::OutOfMemory,
            Errno::OutOfResources,
            Errno::PermissionDenied,
            Errno::NotFound,
            Errno::AlreadyExists,
            Errno::WouldBlock,
            Errno::TimedOut,
            Errno::ValueOverflow,
        ];
        for kind in kinds {
            assert_eq!(Errno::from_raw(kind.to_raw()), Some(kind));
        }
        assert_eq!(Errno::from_raw(0), None);
    }
}
