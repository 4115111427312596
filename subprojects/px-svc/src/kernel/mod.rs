//! Process-wide kernel object manager.
//!
//! Owns the handle table and the object namespace. Objects are reference counted: every handle
//! holds one reference, and a blocked waiter holds one for the duration of its wait, so closing a
//! handle never invalidates a wait already in progress.

mod event;
mod semaphore;

use std::{
    cell::Cell,
    collections::HashMap,
    sync::{Arc, LazyLock},
    time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex, MutexGuard};

pub(crate) use self::{event::KEvent, semaphore::KSemaphore};
use crate::{
    error::KernelError,
    raw::{GLOBAL_NAMESPACE_PREFIX, Handle, INFINITE, INVALID_HANDLE, MAX_HANDLES, MAX_NAME_LEN},
};

thread_local! {
    static CREATE_GLOBAL_PRIVILEGE: Cell<bool> = const { Cell::new(true) };
}

pub(crate) fn set_create_global_privilege(enabled: bool) {
    CREATE_GLOBAL_PRIVILEGE.with(|p| p.set(enabled));
}

pub(crate) fn has_create_global_privilege() -> bool {
    CREATE_GLOBAL_PRIVILEGE.with(Cell::get)
}

/// The kernel object types.
pub(crate) enum KObject {
    Semaphore(KSemaphore),
    Event(KEvent),
}

impl KObject {
    fn same_kind(&self, other: &KObject) -> bool {
        matches!(
            (self, other),
            (KObject::Semaphore(_), KObject::Semaphore(_)) | (KObject::Event(_), KObject::Event(_))
        )
    }

    pub(crate) fn wait(&self, timeout_ns: u64) -> Result<(), KernelError> {
        match self {
            KObject::Semaphore(sem) => sem.wait(timeout_ns),
            KObject::Event(event) => event.wait(timeout_ns),
        }
    }
}

/// A kernel object together with the namespace key it was registered under.
pub(crate) struct Object {
    name: Option<Box<str>>,
    pub(crate) body: KObject,
}

struct NameEntry {
    object: Arc<Object>,
    handles: usize,
}

struct Table {
    next: Handle,
    handles: HashMap<Handle, Arc<Object>>,
    names: HashMap<Box<str>, NameEntry>,
}

impl Table {
    fn insert(&mut self, object: Arc<Object>) -> Result<Handle, KernelError> {
        if self.handles.len() >= MAX_HANDLES {
            return Err(KernelError::OutOfHandles);
        }
        self.handles
            .try_reserve(1)
            .map_err(|_| KernelError::OutOfMemory)?;

        let mut handle = self.next;
        while handle == INVALID_HANDLE || self.handles.contains_key(&handle) {
            handle = handle.wrapping_add(1);
        }
        self.next = handle.wrapping_add(1);

        self.handles.insert(handle, object);
        Ok(handle)
    }
}

/// Outcome of a create-or-open request.
pub(crate) struct Created {
    pub(crate) handle: Handle,
    pub(crate) existed: bool,
}

pub(crate) struct ObjectManager {
    table: Mutex<Table>,
}

static MANAGER: LazyLock<ObjectManager> = LazyLock::new(|| ObjectManager {
    table: Mutex::new(Table {
        next: 1,
        handles: HashMap::new(),
        names: HashMap::new(),
    }),
});

pub(crate) fn manager() -> &'static ObjectManager {
    &MANAGER
}

impl ObjectManager {
    /// Creates a new object, or opens the object already registered under `name`.
    ///
    /// An empty name is the same as no name. `make` only runs when a new object is needed.
    pub(crate) fn create(
        &self,
        name: Option<&str>,
        make: impl FnOnce() -> Result<KObject, KernelError>,
    ) -> Result<Created, KernelError> {
        let name = name.filter(|n| !n.is_empty());
        if name.is_some_and(|n| n.len() > MAX_NAME_LEN) {
            return Err(KernelError::InvalidSize);
        }

        let body = make()?;
        let mut table = self.table.lock();

        let Some(name) = name else {
            let handle = table.insert(Arc::new(Object { name: None, body }))?;
            return Ok(Created {
                handle,
                existed: false,
            });
        };

        if let Some(entry) = table.names.get(name) {
            if !entry.object.body.same_kind(&body) {
                return Err(KernelError::InvalidHandle);
            }
            let object = Arc::clone(&entry.object);
            let handle = table.insert(object)?;
            if let Some(entry) = table.names.get_mut(name) {
                entry.handles += 1;
            }
            return Ok(Created {
                handle,
                existed: true,
            });
        }

        if name.starts_with(GLOBAL_NAMESPACE_PREFIX) && !has_create_global_privilege() {
            return Err(KernelError::AccessDenied);
        }
        table
            .names
            .try_reserve(1)
            .map_err(|_| KernelError::OutOfMemory)?;

        let key: Box<str> = name.into();
        let object = Arc::new(Object {
            name: Some(key.clone()),
            body,
        });
        let handle = table.insert(Arc::clone(&object))?;
        table.names.insert(key, NameEntry { object, handles: 1 });

        Ok(Created {
            handle,
            existed: false,
        })
    }

    /// Opens a new handle to the object registered under `name`.
    ///
    /// `is_kind` decides whether the registered object has the expected type.
    pub(crate) fn open(
        &self,
        name: &str,
        is_kind: impl FnOnce(&KObject) -> bool,
    ) -> Result<Handle, KernelError> {
        if name.len() > MAX_NAME_LEN {
            return Err(KernelError::InvalidSize);
        }

        let mut table = self.table.lock();
        let object = match table.names.get(name) {
            Some(entry) if is_kind(&entry.object.body) => Arc::clone(&entry.object),
            Some(_) => return Err(KernelError::InvalidHandle),
            None => return Err(KernelError::NotFound),
        };

        let handle = table.insert(object)?;
        if let Some(entry) = table.names.get_mut(name) {
            entry.handles += 1;
        }
        Ok(handle)
    }

    /// Returns a reference to the object behind `handle`.
    pub(crate) fn get(&self, handle: Handle) -> Result<Arc<Object>, KernelError> {
        self.table
            .lock()
            .handles
            .get(&handle)
            .cloned()
            .ok_or(KernelError::InvalidHandle)
    }

    /// Closes `handle`, removing the object's name once its last handle is gone.
    pub(crate) fn close(&self, handle: Handle) -> Result<(), KernelError> {
        let mut table = self.table.lock();
        let object = table
            .handles
            .remove(&handle)
            .ok_or(KernelError::InvalidHandle)?;

        if let Some(name) = &object.name {
            let last = match table.names.get_mut(name) {
                Some(entry) => {
                    entry.handles -= 1;
                    entry.handles == 0
                }
                None => false,
            };
            if last {
                table.names.remove(name);
                log::trace!("kernel object {name:?} released from the namespace");
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn is_registered(&self, name: &str) -> bool {
        self.table.lock().names.contains_key(name)
    }
}

/// Blocks on `cond` while `blocked` holds, for at most `timeout_ns` nanoseconds.
///
/// Returns `true` once `blocked` is false. A timeout of `0` only checks the condition, and
/// [`INFINITE`] never times out.
pub(crate) fn block_while<T>(
    cond: &Condvar,
    guard: &mut MutexGuard<'_, T>,
    timeout_ns: u64,
    mut blocked: impl FnMut(&T) -> bool,
) -> bool {
    if timeout_ns == 0 || !blocked(&**guard) {
        return !blocked(&**guard);
    }

    let deadline = match timeout_ns {
        INFINITE => None,
        ns => Instant::now().checked_add(Duration::from_nanos(ns)),
    };

    while blocked(&**guard) {
        match deadline {
            None => cond.wait(guard),
            Some(deadline) => {
                if cond.wait_until(guard, deadline).timed_out() {
                    return !blocked(&**guard);
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn semaphore() -> Result<KObject, KernelError> {
        KSemaphore::new(0, 4).map(KObject::Semaphore)
    }

    #[test]
    fn name_is_released_with_the_last_handle() {
        let name = "Local\\kernel-test-release";
        let first = manager().create(Some(name), semaphore).unwrap();
        let second = manager().create(Some(name), semaphore).unwrap();
        assert!(!first.existed);
        assert!(second.existed);

        manager().close(first.handle).unwrap();
        assert!(manager().is_registered(name));

        manager().close(second.handle).unwrap();
        assert!(!manager().is_registered(name));
    }

    #[test]
    fn empty_name_creates_an_unnamed_object() {
        let a = manager().create(Some(""), semaphore).unwrap();
        let b = manager().create(Some(""), semaphore).unwrap();

        assert!(!a.existed && !b.existed);
        assert_ne!(a.handle, b.handle);
        assert!(!manager().is_registered(""));

        manager().close(a.handle).unwrap();
        manager().close(b.handle).unwrap();
    }

    #[test]
    fn global_name_requires_privilege_only_to_create() {
        let name = "Global\\kernel-test-privilege";
        let owner = manager().create(Some(name), semaphore).unwrap();

        set_create_global_privilege(false);
        let opened = manager().create(Some(name), semaphore);
        let fresh = manager().create(Some("Global\\kernel-test-privilege-new"), semaphore);
        set_create_global_privilege(true);

        let opened = opened.unwrap();
        assert!(opened.existed);
        assert!(matches!(fresh, Err(KernelError::AccessDenied)));

        manager().close(opened.handle).unwrap();
        manager().close(owner.handle).unwrap();
    }

    #[test]
    fn closing_twice_reports_invalid_handle() {
        let created = manager().create(None, semaphore).unwrap();

        assert_eq!(manager().close(created.handle), Ok(()));
        assert_eq!(
            manager().close(created.handle),
            Err(KernelError::InvalidHandle)
        );
    }

    #[test]
    fn oversized_name_is_rejected() {
        let name = "n".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            manager().create(Some(&name), semaphore),
            Err(KernelError::InvalidSize)
        ));
    }
}
