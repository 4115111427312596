//! `sem_open` flags.

use core::ffi::c_int;

use bitflags::bitflags;

bitflags! {
    /// Flags of [`Semaphore::open`](crate::Semaphore::open), with the same bit values as the
    /// `oflag` argument of `sem_open`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct OpenFlags: c_int {
        /// Create the semaphore if it does not exist (`O_CREAT`).
        const CREATE = libc::O_CREAT;
        /// With [`CREATE`](Self::CREATE), fail if the semaphore already exists (`O_EXCL`).
        const EXCLUSIVE = libc::O_EXCL;
    }
}
