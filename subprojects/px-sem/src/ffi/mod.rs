//! FFI bindings for the `px-sem` crate
//!
//! C-ABI counterparts of the POSIX semaphore functions. A `sem_t` holds a pointer to a
//! [`Semaphore`](crate::Semaphore); `sem_init` fills a caller-provided `sem_t`, while `sem_open`
//! returns a `sem_t` allocated by this crate. `sem_close` nulls that `sem_t` and leaves it
//! allocated, so a second close reports `EINVAL`.
//!
//! On failure the functions return `-1` (`SEM_FAILED` for `sem_open`) and store the `errno`
//! value in a thread-local slot, see [`__px_sem__errno_location`].

mod errno;
mod semaphore;

pub use self::{errno::*, semaphore::*};
