//! # Semaphore
//!
//! A POSIX counting semaphore backed by a kernel semaphore object. The count lives in the kernel
//! object; this wrapper owns exactly one handle to it and forwards every operation.

use core::{fmt, mem};

use px_svc::{
    semaphore::{self as ksem, CreateSemaphoreError, Disposition, OpenSemaphoreError},
    sync::{self, INFINITE, WaitSynchronizationError},
};
use px_time::{Timespec, deadline};

use crate::{Errno, OpenFlags, name};

/// The largest value a semaphore can hold. The same ceiling applies to every semaphore.
pub const SEM_VALUE_MAX: u32 = i32::MAX as u32;

/// A counting semaphore.
///
/// Dropping a `Semaphore` closes its handle. Use [`destroy`](Self::destroy) or
/// [`close`](Self::close) to observe a failure to do so.
pub struct Semaphore {
    inner: Box<Inner>,
}

/// The wrapper record. Boxed so that its address can serve in a namespace key.
struct Inner {
    handle: ksem::Handle,
    /// Namespace key of a shared unnamed semaphore.
    shared_key: Option<String>,
}

impl Semaphore {
    /// Creates an unnamed semaphore holding `value`.
    ///
    /// With `pshared`, the kernel object is registered in the global namespace under a fresh key
    /// derived from the wrapper's address, so it can be reached through the namespace by other
    /// parties.
    ///
    /// # Errors
    /// - [`Errno::InvalidArgument`] if `value` exceeds [`SEM_VALUE_MAX`].
    /// - [`Errno::OutOfMemory`] if kernel bookkeeping memory is exhausted.
    /// - [`Errno::OutOfResources`] for any other kernel failure, including a shared key that
    ///   another party registered first.
    pub fn init(pshared: bool, value: u32) -> Result<Self, Errno> {
        let value = checked_value(value)?;

        let mut inner = Box::new(Inner {
            handle: ksem::Handle::invalid(),
            shared_key: None,
        });
        let key = pshared.then(|| name::anonymous(&*inner));

        let (handle, disposition) = ksem::create(value, SEM_VALUE_MAX as i32, key.as_deref())
            .map_err(|err| match err {
                CreateSemaphoreError::OutOfMemory => Errno::OutOfMemory,
                err => {
                    log::debug!("sem_init: kernel refused the semaphore: {err}");
                    Errno::OutOfResources
                }
            })?;

        if disposition == Disposition::Opened {
            log::debug!("sem_init: shared key {key:?} is still held by another semaphore");
            close_handle(handle);
            return Err(Errno::OutOfResources);
        }

        inner.handle = handle;
        inner.shared_key = key;
        log::debug!("sem_init: {handle:?} created with value {value}, shared: {pshared}");
        Ok(Self { inner })
    }

    /// Opens the named semaphore `name`, creating it with `value` if `flags` ask for it.
    ///
    /// | semaphore | `CREATE` | `EXCLUSIVE` | result |
    /// | --- | --- | --- | --- |
    /// | missing | yes | any | new semaphore holding `value` |
    /// | missing | no | any | [`Errno::NotFound`] |
    /// | exists | no | any | the existing semaphore, `value` ignored |
    /// | exists | yes | no | the existing semaphore, `value` ignored |
    /// | exists | yes | yes | [`Errno::AlreadyExists`] |
    ///
    /// Every reference opened on the same name shares one count.
    ///
    /// # Errors
    /// Besides the table above: [`Errno::InvalidArgument`] for an empty name, a name longer than
    /// [`NAME_MAX`](crate::NAME_MAX) or a `value` above [`SEM_VALUE_MAX`];
    /// [`Errno::PermissionDenied`] when the kernel refuses access; [`Errno::OutOfMemory`] and
    /// [`Errno::OutOfResources`] for allocation and other kernel failures.
    pub fn open(name: &str, flags: OpenFlags, value: u32) -> Result<Self, Errno> {
        let value = checked_value(value)?;
        let key = name::global(name)?;

        let handle = if flags.contains(OpenFlags::CREATE) {
            let (handle, disposition) = ksem::create(value, SEM_VALUE_MAX as i32, Some(&key))
                .map_err(|err| match err {
                    CreateSemaphoreError::AccessDenied => Errno::PermissionDenied,
                    CreateSemaphoreError::InvalidHandle => Errno::NotFound,
                    CreateSemaphoreError::OutOfMemory => Errno::OutOfMemory,
                    err => {
                        log::debug!("sem_open: kernel refused {key:?}: {err}");
                        Errno::OutOfResources
                    }
                })?;

            if disposition == Disposition::Opened && flags.contains(OpenFlags::EXCLUSIVE) {
                close_handle(handle);
                return Err(Errno::AlreadyExists);
            }
            handle
        } else {
            ksem::open(&key).map_err(|err| match err {
                OpenSemaphoreError::NotFound | OpenSemaphoreError::InvalidHandle => Errno::NotFound,
                OpenSemaphoreError::InvalidSize => Errno::InvalidArgument,
                OpenSemaphoreError::OutOfMemory => Errno::OutOfMemory,
                err => {
                    log::debug!("sem_open: kernel refused {key:?}: {err}");
                    Errno::OutOfResources
                }
            })?
        };

        log::debug!("sem_open: {handle:?} opened on {key:?}");
        Ok(Self {
            inner: Box::new(Inner {
                handle,
                shared_key: None,
            }),
        })
    }

    /// Decrements the count, blocking until it is positive.
    pub fn wait(&self) -> Result<(), Errno> {
        sync::wait_synchronization_single(&self.inner.handle, INFINITE)
            .map_err(|_| Errno::InvalidArgument)
    }

    /// Decrements the count if it is positive, without blocking.
    ///
    /// Fails with [`Errno::WouldBlock`] when the count is zero.
    pub fn try_wait(&self) -> Result<(), Errno> {
        sync::wait_synchronization_single(&self.inner.handle, 0).map_err(|err| match err {
            WaitSynchronizationError::TimedOut => Errno::WouldBlock,
            _ => Errno::InvalidArgument,
        })
    }

    /// Decrements the count, blocking until it is positive or until the absolute `CLOCK_REALTIME`
    /// time `abs_timeout` passes.
    ///
    /// A deadline that has already passed makes a single non-blocking attempt.
    /// Fails with [`Errno::TimedOut`] when the deadline passes first.
    pub fn timed_wait(&self, abs_timeout: &Timespec) -> Result<(), Errno> {
        let timeout_ns = deadline::timeout_ns_until(abs_timeout);
        sync::wait_synchronization_single(&self.inner.handle, timeout_ns).map_err(|err| match err {
            WaitSynchronizationError::TimedOut => Errno::TimedOut,
            _ => Errno::InvalidArgument,
        })
    }

    /// Increments the count by one, waking one waiter if any.
    ///
    /// Fails with [`Errno::ValueOverflow`], leaving the count unchanged, when the count is
    /// already [`SEM_VALUE_MAX`].
    pub fn post(&self) -> Result<(), Errno> {
        ksem::release(&self.inner.handle, 1)
            .map(drop)
            .map_err(|err| match err {
                ksem::ReleaseSemaphoreError::OutOfRange => Errno::ValueOverflow,
                _ => Errno::InvalidArgument,
            })
    }

    /// Returns the count.
    ///
    /// The kernel offers no way to read a semaphore's count, so this takes one unit without
    /// blocking and immediately releases it, which reports the count the semaphore had before.
    /// The two steps are not atomic: concurrent waits and posts may change the count in between,
    /// and a waiter may briefly observe the count one lower. The result is a snapshot that was
    /// valid at some instant during the call.
    ///
    /// # Panics
    /// If the unit taken to read the count cannot be released back. The semaphore's count would stay
    /// one lower than it should for good, which is unrecoverable.
    pub fn get_value(&self) -> Result<u32, Errno> {
        let handle = &self.inner.handle;
        match sync::wait_synchronization_single(handle, 0) {
            Ok(()) => match ksem::release(handle, 1) {
                Ok(previous) => Ok(previous as u32 + 1),
                Err(err) => {
                    log::error!("sem_getvalue: {handle:?} lost a unit, restoring it failed: {err}");
                    panic!("sem_getvalue: failed to restore the count of {handle:?}: {err}");
                }
            },
            Err(WaitSynchronizationError::TimedOut) => Ok(0),
            Err(_) => Err(Errno::InvalidArgument),
        }
    }

    /// Destroys an unnamed semaphore, closing its handle.
    ///
    /// The wrapper is released even when the kernel reports a failure; the failure is returned
    /// as [`Errno::InvalidArgument`].
    pub fn destroy(mut self) -> Result<(), Errno> {
        let handle = mem::replace(&mut self.inner.handle, ksem::Handle::invalid());
        sync::close_handle(handle).map_err(|err| {
            log::warn!("sem_destroy: closing {handle:?} failed: {err}");
            Errno::InvalidArgument
        })?;

        log::debug!("sem_destroy: {handle:?} closed");
        Ok(())
    }

    /// Closes a named semaphore. Same as [`destroy`](Self::destroy): the kernel object goes away
    /// once its last handle is closed.
    pub fn close(self) -> Result<(), Errno> {
        self.destroy()
    }
}

impl Drop for Semaphore {
    fn drop(&mut self) {
        if self.inner.handle.is_valid() {
            close_handle(self.inner.handle);
        }
    }
}

impl fmt::Debug for Semaphore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Semaphore")
            .field("handle", &self.inner.handle)
            .field("shared_key", &self.inner.shared_key)
            .finish()
    }
}

/// Removes a named semaphore's name.
///
/// Always succeeds and does nothing: a kernel object leaves the namespace on its own once its
/// last handle is closed, and live semaphores are unaffected.
pub fn unlink(name: &str) -> Result<(), Errno> {
    log::trace!("sem_unlink: {name:?} is released with its last handle");
    Ok(())
}

fn checked_value(value: u32) -> Result<i32, Errno> {
    if value > SEM_VALUE_MAX {
        return Err(Errno::InvalidArgument);
    }
    Ok(value as i32)
}

fn close_handle(handle: ksem::Handle) {
    if let Err(err) = sync::close_handle(handle) {
        log::warn!("closing {handle:?} failed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_values_above_max() {
        assert_eq!(
            Semaphore::init(false, SEM_VALUE_MAX + 1).unwrap_err(),
            Errno::InvalidArgument
        );
    }

    #[test]
    fn wait_wait_trywait_post_scenario() {
        let sem = Semaphore::init(false, 2).unwrap();

        sem.wait().unwrap();
        sem.wait().unwrap();
        assert_eq!(sem.try_wait(), Err(Errno::WouldBlock));
        sem.post().unwrap();
        assert_eq!(sem.get_value(), Ok(1));

        sem.destroy().unwrap();
    }

    #[test]
    fn post_at_max_overflows_and_keeps_the_count() {
        let sem = Semaphore::init(false, SEM_VALUE_MAX).unwrap();

        assert_eq!(sem.post(), Err(Errno::ValueOverflow));
        assert_eq!(sem.get_value(), Ok(SEM_VALUE_MAX));
    }

    #[test]
    fn get_value_leaves_the_count_in_place() {
        let sem = Semaphore::init(false, 3).unwrap();

        assert_eq!(sem.get_value(), Ok(3));
        assert_eq!(sem.get_value(), Ok(3));
        sem.try_wait().unwrap();
        assert_eq!(sem.get_value(), Ok(2));
    }

    #[test]
    fn shared_init_registers_an_address_key() {
        let sem = Semaphore::init(true, 1).unwrap();
        let key = sem.inner.shared_key.clone().unwrap();

        let peer = ksem::open(&key).unwrap();
        sync::wait_synchronization_single(&peer, 0).unwrap();
        assert_eq!(sem.try_wait(), Err(Errno::WouldBlock));

        sync::close_handle(peer).unwrap();
        sem.destroy().unwrap();
        assert!(ksem::open(&key).is_err());
    }

    #[test]
    fn shared_init_succeeds_while_peers_hold_destroyed_keys() {
        let mut peers = Vec::new();
        for _ in 0..64 {
            let sem = Semaphore::init(true, 0).unwrap();
            let key = sem.inner.shared_key.clone().unwrap();
            peers.push(ksem::open(&key).unwrap());
            sem.destroy().unwrap();
        }

        for peer in peers {
            sync::close_handle(peer).unwrap();
        }
    }

    #[test]
    fn private_init_is_not_in_the_namespace() {
        let sem = Semaphore::init(false, 1).unwrap();
        assert!(sem.inner.shared_key.is_none());

        let key = name::anonymous(&*sem.inner);
        assert!(matches!(
            ksem::open(&key),
            Err(OpenSemaphoreError::NotFound)
        ));
    }

    #[test]
    fn drop_closes_the_handle() {
        let sem = Semaphore::init(false, 0).unwrap();
        let handle = sem.inner.handle;
        drop(sem);

        assert!(matches!(
            ksem::release(&handle, 1),
            Err(ksem::ReleaseSemaphoreError::InvalidHandle)
        ));
    }
}
