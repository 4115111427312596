//! Thread-local `errno` slot of the semaphore functions.

use core::{
    cell::Cell,
    ffi::c_int,
    sync::atomic::{AtomicI32, Ordering},
};

use crate::Errno;

thread_local! {
    static ERRNO: Cell<c_int> = const { Cell::new(0) };
}

/// Slot used once the calling thread's slot has been torn down.
static FALLBACK_ERRNO: AtomicI32 = AtomicI32::new(0);

/// Resolves the slot both the setter and [`__px_sem__errno_location`] use.
fn slot() -> *mut c_int {
    ERRNO
        .try_with(Cell::as_ptr)
        .unwrap_or_else(|_| FALLBACK_ERRNO.as_ptr())
}

/// Returns the address of the calling thread's `errno` slot.
///
/// The slot holds the error of the last failed semaphore call made by the thread. Successful
/// calls leave it untouched.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__errno_location() -> *mut c_int {
    slot()
}

/// Stores `err` in the calling thread's `errno` slot and returns `-1`.
pub(crate) fn set_errno(err: Errno) -> c_int {
    match ERRNO.try_with(|errno| errno.set(err.to_raw())) {
        Ok(()) => {}
        Err(_) => FALLBACK_ERRNO.store(err.to_raw(), Ordering::Relaxed),
    }
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_errno_writes_the_slot_the_location_points_to() {
        assert_eq!(set_errno(Errno::TimedOut), -1);
        assert_eq!(unsafe { *__px_sem__errno_location() }, libc::ETIMEDOUT);
        assert_eq!(slot(), unsafe { __px_sem__errno_location() });
    }

    #[test]
    fn each_thread_has_its_own_slot() {
        set_errno(Errno::NotFound);
        std::thread::spawn(|| {
            set_errno(Errno::AlreadyExists);
            assert_eq!(unsafe { *__px_sem__errno_location() }, libc::EEXIST);
        })
        .join()
        .unwrap();
        assert_eq!(unsafe { *__px_sem__errno_location() }, libc::ENOENT);
    }
}
