//! FFI bindings for the `px-sem` crate - Semaphore

use core::{
    ffi::{CStr, c_char, c_int, c_uint},
    mem, ptr,
};

use static_assertions::const_assert_eq;

use super::errno::set_errno;
use crate::{Errno, OpenFlags, Semaphore, unlink};

/// A POSIX semaphore object: a pointer to the semaphore's wrapper, null once destroyed.
#[allow(non_camel_case_types)]
pub type sem_t = *mut Semaphore;

/// The value `sem_open` returns on failure.
pub const SEM_FAILED: *mut sem_t = ptr::null_mut();

const_assert_eq!(size_of::<sem_t>(), size_of::<usize>());

fn ret(res: Result<(), Errno>) -> c_int {
    match res {
        Ok(()) => 0,
        Err(err) => set_errno(err),
    }
}

/// Resolves `sem` to its semaphore.
///
/// # Safety
/// `sem` must be null or point to a readable `sem_t`, which must be null or hold a pointer
/// produced by `sem_init`/`sem_open` and not yet destroyed.
unsafe fn resolve<'a>(sem: *mut sem_t) -> Result<&'a Semaphore, Errno> {
    let inner = unsafe { sem.as_ref() }.ok_or(Errno::InvalidArgument)?;
    unsafe { inner.as_ref() }.ok_or(Errno::InvalidArgument)
}

/// Resolves a C string argument.
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
unsafe fn resolve_name<'a>(name: *const c_char) -> Result<&'a str, Errno> {
    if name.is_null() {
        return Err(Errno::InvalidArgument);
    }
    unsafe { CStr::from_ptr(name) }
        .to_str()
        .map_err(|_| Errno::InvalidArgument)
}

/// Initializes an unnamed semaphore.
///
/// # Arguments
/// * `sem` - Pointer to the `sem_t` to initialize
/// * `pshared` - Non-zero to make the semaphore reachable through the global namespace
/// * `value` - Initial value, at most `SEM_VALUE_MAX`
///
/// # Returns
/// `0`, or `-1` with `errno` set to `EINVAL`, `ENOMEM` or `ENOSPC`.
///
/// # Safety
/// `sem` must be null or point to writable memory for a `sem_t`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_init(sem: *mut sem_t, pshared: c_int, value: c_uint) -> c_int {
    if sem.is_null() {
        return set_errno(Errno::InvalidArgument);
    }

    match Semaphore::init(pshared != 0, value) {
        Ok(semaphore) => {
            unsafe { sem.write(Box::into_raw(Box::new(semaphore))) };
            0
        }
        Err(err) => set_errno(err),
    }
}

/// Decrements the semaphore, blocking until its value is positive.
///
/// # Safety
/// `sem` must be null or point to a `sem_t` initialized by [`__px_sem__sem_init`] or returned by
/// [`__px_sem__sem_open`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_wait(sem: *mut sem_t) -> c_int {
    ret(unsafe { resolve(sem) }.and_then(Semaphore::wait))
}

/// Decrements the semaphore if its value is positive; fails with `EAGAIN` otherwise.
///
/// # Safety
/// Same as [`__px_sem__sem_wait`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_trywait(sem: *mut sem_t) -> c_int {
    ret(unsafe { resolve(sem) }.and_then(Semaphore::try_wait))
}

/// Decrements the semaphore, blocking until its value is positive or the absolute
/// `CLOCK_REALTIME` time `abs_timeout` passes (`ETIMEDOUT`).
///
/// # Safety
/// Same as [`__px_sem__sem_wait`]; `abs_timeout` must be null or point to a readable `timespec`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_timedwait(
    sem: *mut sem_t,
    abs_timeout: *const libc::timespec,
) -> c_int {
    let res = unsafe { resolve(sem) }.and_then(|semaphore| {
        let ts = unsafe { abs_timeout.as_ref() }.ok_or(Errno::InvalidArgument)?;
        let deadline = px_time::Timespec::new(ts.tv_sec as i64, ts.tv_nsec as i64)
            .map_err(|_| Errno::InvalidArgument)?;
        semaphore.timed_wait(&deadline)
    });
    ret(res)
}

/// Increments the semaphore, waking one waiter. Fails with `EOVERFLOW` at `SEM_VALUE_MAX`.
///
/// # Safety
/// Same as [`__px_sem__sem_wait`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_post(sem: *mut sem_t) -> c_int {
    ret(unsafe { resolve(sem) }.and_then(Semaphore::post))
}

/// Stores the semaphore's current value in `sval`.
///
/// # Safety
/// Same as [`__px_sem__sem_wait`]; `sval` must be null or point to a writable `int`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_getvalue(sem: *mut sem_t, sval: *mut c_int) -> c_int {
    let res = unsafe { resolve(sem) }.and_then(|semaphore| {
        let sval = unsafe { sval.as_mut() }.ok_or(Errno::InvalidArgument)?;
        *sval = semaphore.get_value()? as c_int;
        Ok(())
    });
    ret(res)
}

/// Destroys an unnamed semaphore and nulls the `sem_t`.
///
/// Destroying a `sem_t` twice fails with `EINVAL`.
///
/// # Safety
/// Same as [`__px_sem__sem_wait`]. No other thread may use the semaphore during or after the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_destroy(sem: *mut sem_t) -> c_int {
    let Some(slot) = (unsafe { sem.as_mut() }) else {
        return set_errno(Errno::InvalidArgument);
    };
    let inner = mem::replace(slot, ptr::null_mut());
    if inner.is_null() {
        return set_errno(Errno::InvalidArgument);
    }

    let semaphore = unsafe { *Box::from_raw(inner) };
    ret(semaphore.destroy())
}

/// Opens a named semaphore.
///
/// # Arguments
/// * `name` - Semaphore name, 1 to `NAME_MAX` bytes
/// * `oflag` - `O_CREAT` to create the semaphore if missing, plus `O_EXCL` to require that it
///   is missing
/// * `mode` - Ignored
/// * `value` - Initial value when the semaphore is created
///
/// # Returns
/// The semaphore, or `SEM_FAILED` with `errno` set to `EINVAL`, `ENOENT`, `EEXIST`, `EACCES`,
/// `ENOMEM` or `ENOSPC`.
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_open(
    name: *const c_char,
    oflag: c_int,
    _mode: libc::mode_t,
    value: c_uint,
) -> *mut sem_t {
    let res = unsafe { resolve_name(name) }.and_then(|name| {
        Semaphore::open(name, OpenFlags::from_bits_truncate(oflag), value)
    });
    match res {
        Ok(semaphore) => Box::into_raw(Box::new(Box::into_raw(Box::new(semaphore)))),
        Err(err) => {
            set_errno(err);
            SEM_FAILED
        }
    }
}

/// Closes a semaphore returned by [`__px_sem__sem_open`].
///
/// The `sem_t` cell stays allocated with a null semaphore pointer, so closing the same pointer
/// again fails with `EINVAL`.
///
/// # Safety
/// `sem` must be null or a pointer returned by [`__px_sem__sem_open`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_close(sem: *mut sem_t) -> c_int {
    unsafe { __px_sem__sem_destroy(sem) }
}

/// Removes a semaphore name. Always succeeds: names go away with their last handle.
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn __px_sem__sem_unlink(name: *const c_char) -> c_int {
    let name = unsafe { resolve_name(name) }.unwrap_or_default();
    ret(unlink(name))
}
