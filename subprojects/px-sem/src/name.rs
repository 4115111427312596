//! Kernel namespace keys for semaphores.
//!
//! Named semaphores and shared unnamed semaphores both live in the kernel's global namespace.
//! A named semaphore's key is the caller's name behind the namespace prefix; a shared unnamed
//! semaphore's key is derived from the address of its wrapper plus a process-wide sequence
//! number, since a peer may still hold the key of a destroyed wrapper whose address gets reused.

use core::sync::atomic::{AtomicU64, Ordering};

use px_svc::raw::GLOBAL_NAMESPACE_PREFIX;

use crate::Errno;

/// Size of the buffer a namespaced key must fit in, terminator included.
const KEY_BUFFER_LEN: usize = 512;

/// Longest accepted semaphore name, in bytes.
pub const NAME_MAX: usize = KEY_BUFFER_LEN - 8;

/// Returns the namespace key of the semaphore called `name`.
///
/// Empty names, names longer than [`NAME_MAX`] and names containing a NUL byte are rejected.
pub(crate) fn global(name: &str) -> Result<String, Errno> {
    if name.is_empty() || name.len() > NAME_MAX || name.contains('\0') {
        return Err(Errno::InvalidArgument);
    }

    let mut key = String::with_capacity(GLOBAL_NAMESPACE_PREFIX.len() + name.len());
    key.push_str(GLOBAL_NAMESPACE_PREFIX);
    key.push_str(name);
    Ok(key)
}

/// Returns a fresh namespace key for a shared unnamed semaphore whose wrapper lives at `wrapper`.
///
/// No two calls return the same key.
pub(crate) fn anonymous<T>(wrapper: &T) -> String {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);

    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{GLOBAL_NAMESPACE_PREFIX}{wrapper:p}-{seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_prefixes_the_name() {
        assert_eq!(global("/jobs").unwrap(), "Global\\/jobs");
    }

    #[test]
    fn global_rejects_empty_oversized_and_nul_names() {
        assert_eq!(global(""), Err(Errno::InvalidArgument));
        assert_eq!(global(&"x".repeat(NAME_MAX + 1)), Err(Errno::InvalidArgument));
        assert_eq!(global("a\0b"), Err(Errno::InvalidArgument));
        assert!(global(&"x".repeat(NAME_MAX)).is_ok());
    }

    #[test]
    fn anonymous_keys_differ_per_wrapper() {
        let (a, b) = (Box::new(0u8), Box::new(0u8));
        assert_ne!(anonymous(&*a), anonymous(&*b));
        assert!(anonymous(&*a).starts_with(GLOBAL_NAMESPACE_PREFIX));
    }

    #[test]
    fn anonymous_keys_differ_for_a_reused_address() {
        let wrapper = Box::new(0u8);
        let first = anonymous(&*wrapper);
        let second = anonymous(&*wrapper);

        assert_ne!(first, second);
        assert!(first.starts_with(&format!("{GLOBAL_NAMESPACE_PREFIX}{:p}-", &*wrapper)));
    }
}
