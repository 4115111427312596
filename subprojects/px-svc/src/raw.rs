//! Raw kernel object API.
//!
//! Every call returns a raw [`ResultCode`]: [`SUCCESS`](crate::result::SUCCESS) or a code built
//! from [`Module::Kernel`](crate::error::Module::Kernel) and a
//! [`KernelError`](crate::error::KernelError) description. Outputs are written through the `&mut`
//! out-parameters and are only meaningful on success.

use crate::{
    error::{KernelError, ToRawResultCode},
    kernel::{self, KEvent, KObject, KSemaphore},
    result::{ResultCode, SUCCESS},
};

//<editor-fold desc="Types and Constants">

/// A raw handle type.
///
/// Alias for `u32`.
pub type Handle = u32;

/// Invalid handle
pub const INVALID_HANDLE: Handle = 0;

/// Timeout value that makes [`wait_synchronization_single`] wait forever.
pub const INFINITE: u64 = u64::MAX;

/// Maximum number of handles the process may hold open at once.
pub const MAX_HANDLES: usize = 0x10000;

/// Maximum length, in bytes, of a kernel object name.
pub const MAX_NAME_LEN: usize = 511;

/// Name prefix of the global object namespace.
///
/// Creating a *new* object whose name carries this prefix requires the create-global privilege
/// of the calling thread (see [`set_create_global_privilege`]).
pub const GLOBAL_NAMESPACE_PREFIX: &str = "Global\\";

//</editor-fold>

fn to_rc<T>(res: Result<T, KernelError>, out: impl FnOnce(T)) -> ResultCode {
    match res {
        Ok(value) => {
            out(value);
            SUCCESS
        }
        Err(err) => err.to_rc(),
    }
}

//<editor-fold desc="Semaphores">

/// Creates a semaphore object, or opens the one already registered under `name`.
///
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | OUT | _handle_ | Handle to the semaphore. |
/// | OUT | _existed_ | Set to `true` when `name` already referred to a semaphore. |
/// | IN | _initial_count_ | Initial count. Ignored when the semaphore already existed. |
/// | IN | _max_count_ | Maximum count. Ignored when the semaphore already existed. |
/// | IN | _name_ | Namespace key. `None` or an empty name creates an unnamed object. |
///
/// Errors: `InvalidCombination` (counts out of order), `InvalidSize` (name too long),
/// `InvalidHandle` (name held by another object type), `AccessDenied`, `OutOfHandles`,
/// `OutOfMemory`.
pub fn create_semaphore(
    handle: &mut Handle,
    existed: &mut bool,
    initial_count: i32,
    max_count: i32,
    name: Option<&str>,
) -> ResultCode {
    let res = kernel::manager().create(name, || {
        KSemaphore::new(initial_count, max_count).map(KObject::Semaphore)
    });
    to_rc(res, |created| {
        *handle = created.handle;
        *existed = created.existed;
    })
}

/// Opens the semaphore registered under `name`, without creating it.
///
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | OUT | _handle_ | Handle to the semaphore. |
/// | IN | _name_ | Namespace key. |
///
/// Errors: `NotFound`, `InvalidHandle` (name held by another object type), `InvalidSize`,
/// `OutOfHandles`, `OutOfMemory`.
pub fn open_semaphore(handle: &mut Handle, name: &str) -> ResultCode {
    let res = kernel::manager().open(name, |obj| matches!(obj, KObject::Semaphore(_)));
    to_rc(res, |h| *handle = h)
}

/// Adds `release_count` to the semaphore's count, waking waiters.
///
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | OUT | _previous_count_ | Count before the release. |
/// | IN | _handle_ | Semaphore handle. |
/// | IN | _release_count_ | Amount to add. Must be positive. |
///
/// Errors: `InvalidHandle`, `InvalidCombination` (non-positive count), `OutOfRange` (the count
/// would exceed the maximum; the count is left unchanged).
pub fn release_semaphore(
    previous_count: &mut i32,
    handle: Handle,
    release_count: i32,
) -> ResultCode {
    let res = kernel::manager()
        .get(handle)
        .and_then(|obj| match &obj.body {
            KObject::Semaphore(sem) => sem.release(release_count),
            _ => Err(KernelError::InvalidHandle),
        });
    to_rc(res, |prev| *previous_count = prev)
}

//</editor-fold>

//<editor-fold desc="Events">

/// Creates a manual-reset event object, or opens the one already registered under `name`.
///
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | OUT | _handle_ | Handle to the event. |
/// | OUT | _existed_ | Set to `true` when `name` already referred to an event. |
/// | IN | _signalled_ | Initial state. Ignored when the event already existed. |
/// | IN | _name_ | Namespace key. `None` or an empty name creates an unnamed object. |
pub fn create_event(
    handle: &mut Handle,
    existed: &mut bool,
    signalled: bool,
    name: Option<&str>,
) -> ResultCode {
    let res = kernel::manager().create(name, || Ok(KObject::Event(KEvent::new(signalled))));
    to_rc(res, |created| {
        *handle = created.handle;
        *existed = created.existed;
    })
}

fn with_event(handle: Handle, op: impl FnOnce(&KEvent)) -> ResultCode {
    let res = kernel::manager()
        .get(handle)
        .and_then(|obj| match &obj.body {
            KObject::Event(event) => {
                op(event);
                Ok(())
            }
            _ => Err(KernelError::InvalidHandle),
        });
    to_rc(res, |()| {})
}

/// Sets an event's signalled status, waking all its waiters.
pub fn signal_event(handle: Handle) -> ResultCode {
    with_event(handle, KEvent::signal)
}

/// Clears an event's signalled status.
pub fn clear_event(handle: Handle) -> ResultCode {
    with_event(handle, KEvent::clear)
}

//</editor-fold>

//<editor-fold desc="Synchronization">

/// Waits on a single synchronization object.
///
/// | Arg | Name | Description |
/// | --- | --- | --- |
/// | IN | _handle_ | Semaphore or event handle. |
/// | IN | _timeout_ | Timeout in nanoseconds. `0` polls, [`INFINITE`] waits forever. |
///
/// A semaphore is acquired by taking one unit of its count. An event is acquired when
/// signalled, and stays signalled.
///
/// Errors: `InvalidHandle`, `TimedOut`.
pub fn wait_synchronization_single(handle: Handle, timeout: u64) -> ResultCode {
    let res = kernel::manager()
        .get(handle)
        .and_then(|obj| obj.body.wait(timeout));
    to_rc(res, |()| {})
}

//</editor-fold>

//<editor-fold desc="Miscellaneous">

/// Closes a handle, decrementing the reference count of the corresponding kernel object.
///
/// A named object leaves the namespace once its last handle is closed.
///
/// Errors: `InvalidHandle`.
pub fn close_handle(handle: Handle) -> ResultCode {
    to_rc(kernel::manager().close(handle), |()| {})
}

/// Grants or revokes the calling thread's privilege to create objects in the global namespace.
///
/// Threads start with the privilege granted.
pub fn set_create_global_privilege(enabled: bool) {
    kernel::set_create_global_privilege(enabled)
}

/// Returns whether the calling thread may create objects in the global namespace.
pub fn has_create_global_privilege() -> bool {
    kernel::has_create_global_privilege()
}

//</editor-fold>
