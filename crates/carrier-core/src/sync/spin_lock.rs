//! Busy-wait mutual exclusion.
//!
//! A single-flag spin lock for short in-memory critical sections where an OS
//! blocking primitive is not wanted. No fairness guarantee and no owner
//! tracking: unlocking a lock the caller does not hold (or unlocking twice)
//! is unchecked misuse, not a reported error. Never hold it across an await
//! point or a network call.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct SpinLock {
    state: AtomicBool,
}

impl SpinLock {
    pub const fn new() -> Self {
        Self {
            state: AtomicBool::new(false),
        }
    }

    fn try_acquire(&self) -> bool {
        self.state
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
    }

    /// Block until the lock is acquired.
    ///
    /// Fast path is a single compare-and-swap. Under contention the retry
    /// loop reads the flag first and only re-attempts the swap once it
    /// observes the lock free, keeping the cache line quiet, and yields to
    /// the scheduler between iterations instead of pure spinning.
    pub fn lock(&self) {
        if self.try_acquire() {
            return;
        }
        loop {
            std::thread::yield_now();
            if !self.state.load(Ordering::Relaxed) && self.try_acquire() {
                return;
            }
        }
    }

    /// Attempt a non-blocking acquisition.
    pub fn try_lock(&self) -> bool {
        self.try_acquire()
    }

    /// Observational snapshot of the lock state. Inherently racy; for
    /// diagnostics and tests only, never for correctness decisions.
    pub fn is_locked(&self) -> bool {
        self.state.load(Ordering::Relaxed)
    }

    pub fn unlock(&self) {
        self.state.store(false, Ordering::Release);
    }
}

impl Default for SpinLock {
    fn default() -> Self {
        Self::new()
    }
}
