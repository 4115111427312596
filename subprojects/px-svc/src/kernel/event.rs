//! Manual-reset event kernel object.

use parking_lot::{Condvar, Mutex};

use super::block_while;
use crate::error::KernelError;

/// A flag that stays signalled until explicitly cleared. Waiting does not consume the signal.
pub(crate) struct KEvent {
    signalled: Mutex<bool>,
    changed: Condvar,
}

impl KEvent {
    pub(crate) fn new(signalled: bool) -> Self {
        Self {
            signalled: Mutex::new(signalled),
            changed: Condvar::new(),
        }
    }

    pub(crate) fn wait(&self, timeout_ns: u64) -> Result<(), KernelError> {
        let mut signalled = self.signalled.lock();
        if block_while(&self.changed, &mut signalled, timeout_ns, |s| !*s) {
            Ok(())
        } else {
            Err(KernelError::TimedOut)
        }
    }

    pub(crate) fn signal(&self) {
        *self.signalled.lock() = true;
        self.changed.notify_all();
    }

    pub(crate) fn clear(&self) {
        *self.signalled.lock() = false;
    }
}
