//! # px-svc
//!
//! Handle-based kernel synchronization objects, exposed the way a supervisor-call crate
//! exposes its syscalls.
//!
//! The crate is split in two levels:
//!
//! - The [Raw API](raw) mirrors the native calling convention: every call returns a raw
//!   [`ResultCode`](result::ResultCode) and writes its results through out-parameters.
//! - The typed modules ([`semaphore`], [`event`], [`sync`]) wrap each raw call and translate the
//!   returned result code into a dedicated error enum.
//!
//! Kernel objects live in a process-wide object manager. Objects can be created unnamed, or
//! registered under a name in the object namespace; every handle opened on the same name refers to
//! the same object, and the name is released together with the last handle.
//!
//! ```text
//! create_semaphore("Global\\jobs", 0, max) ──┐
//!                                            ├──▶ KSemaphore { count, max }
//! create_semaphore("Global\\jobs", 0, max) ──┘
//! ```

#[macro_use]
pub mod handle;

pub mod error;
pub mod event;
mod kernel;
pub mod raw;
pub mod result;
pub mod semaphore;
pub mod sync;
