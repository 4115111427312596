//! # px-sem
//!
//! POSIX counting semaphores on top of the handle-based kernel semaphore objects of
//! [`px_svc`].
//!
//! Every operation validates its arguments, issues exactly one kernel call (two for
//! [`Semaphore::get_value`]) and translates the kernel result code into an [`Errno`]:
//!
//! | POSIX | Rust API | kernel call |
//! | --- | --- | --- |
//! | `sem_init` | [`Semaphore::init`] | `create_semaphore` (unnamed, or address-named when shared) |
//! | `sem_open` | [`Semaphore::open`] | `create_semaphore` / `open_semaphore` |
//! | `sem_wait` | [`Semaphore::wait`] | `wait_synchronization_single(INFINITE)` |
//! | `sem_trywait` | [`Semaphore::try_wait`] | `wait_synchronization_single(0)` |
//! | `sem_timedwait` | [`Semaphore::timed_wait`] | `wait_synchronization_single(remaining)` |
//! | `sem_post` | [`Semaphore::post`] | `release_semaphore(1)` |
//! | `sem_getvalue` | [`Semaphore::get_value`] | poll + `release_semaphore(1)` |
//! | `sem_destroy` / `sem_close` | [`Semaphore::destroy`] / [`Semaphore::close`] | `close_handle` |
//! | `sem_unlink` | [`unlink`] | none |
//!
//! ## C FFI API
//!
//! With the `ffi` feature the same operations are exported with C linkage. Failures return `-1`
//! (or `SEM_FAILED` from `sem_open`) and store the errno value in a thread-local slot. See the
//! `ffi` module.

mod errno;
#[cfg(feature = "ffi")]
pub mod ffi;
mod flags;
mod name;
mod semaphore;

pub use self::{
    errno::Errno,
    flags::OpenFlags,
    name::NAME_MAX,
    semaphore::{SEM_VALUE_MAX, Semaphore, unlink},
};
