//! Counting semaphore kernel object.

use parking_lot::{Condvar, Mutex};

use super::block_while;
use crate::error::KernelError;

/// A counter in `0..=max`. Waiting consumes one unit, releasing adds units back.
pub(crate) struct KSemaphore {
    count: Mutex<i32>,
    max: i32,
    available: Condvar,
}

impl KSemaphore {
    pub(crate) fn new(initial: i32, max: i32) -> Result<Self, KernelError> {
        if max <= 0 || initial < 0 || initial > max {
            return Err(KernelError::InvalidCombination);
        }

        Ok(Self {
            count: Mutex::new(initial),
            max,
            available: Condvar::new(),
        })
    }

    /// Takes one unit, waiting up to `timeout_ns` for one to become available.
    pub(crate) fn wait(&self, timeout_ns: u64) -> Result<(), KernelError> {
        let mut count = self.count.lock();
        if !block_while(&self.available, &mut count, timeout_ns, |c| *c == 0) {
            return Err(KernelError::TimedOut);
        }

        *count -= 1;
        Ok(())
    }

    /// Adds `n` units and returns the count before the release.
    ///
    /// Fails without touching the count if the result would exceed the maximum.
    pub(crate) fn release(&self, n: i32) -> Result<i32, KernelError> {
        if n <= 0 {
            return Err(KernelError::InvalidCombination);
        }

        let mut count = self.count.lock();
        let previous = *count;
        match previous.checked_add(n) {
            Some(next) if next <= self.max => *count = next,
            _ => return Err(KernelError::OutOfRange),
        }
        drop(count);

        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::*;
    use crate::raw::INFINITE;

    #[test]
    fn new_rejects_inconsistent_counts() {
        assert!(matches!(
            KSemaphore::new(3, 2),
            Err(KernelError::InvalidCombination)
        ));
        assert!(matches!(
            KSemaphore::new(0, 0),
            Err(KernelError::InvalidCombination)
        ));
        assert!(matches!(
            KSemaphore::new(-1, 2),
            Err(KernelError::InvalidCombination)
        ));
    }

    #[test]
    fn release_past_max_leaves_count_unchanged() {
        let sem = KSemaphore::new(1, 2).unwrap();

        assert_eq!(sem.release(2), Err(KernelError::OutOfRange));
        assert_eq!(sem.release(1), Ok(1));
        assert_eq!(sem.release(1), Err(KernelError::OutOfRange));
    }

    #[test]
    fn poll_on_empty_semaphore_times_out() {
        let sem = KSemaphore::new(0, 1).unwrap();
        assert_eq!(sem.wait(0), Err(KernelError::TimedOut));
    }

    #[test]
    fn bounded_wait_times_out_after_the_timeout() {
        let sem = KSemaphore::new(0, 1).unwrap();
        let start = std::time::Instant::now();

        assert_eq!(sem.wait(20_000_000), Err(KernelError::TimedOut));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn infinite_wait_wakes_on_release() {
        let sem = Arc::new(KSemaphore::new(0, 1).unwrap());
        let waiter = {
            let sem = Arc::clone(&sem);
            thread::spawn(move || sem.wait(INFINITE))
        };

        thread::sleep(Duration::from_millis(10));
        assert_eq!(sem.release(1), Ok(0));
        assert_eq!(waiter.join().unwrap(), Ok(()));
        assert_eq!(sem.wait(0), Err(KernelError::TimedOut));
    }
}
