//! Sync-cycle counters, shared between the workers and the interactive
//! surface (diagnostics view).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::sync::SpinLock;

/// Point-in-time copy of the counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncStats {
    /// Inbound polling cycles attempted
    pub polls: u64,
    /// Cycles skipped because the transport failed
    pub polls_failed: u64,
    /// Outgoing messages confirmed delivered
    pub deliveries: u64,
    /// Outgoing messages dropped after a failed delivery
    pub deliveries_dropped: u64,
}

/// Thread-safe wrapper for the counters.
///
/// Each record touches two fields (a total and an outcome); the spin lock
/// serializes those updates against snapshots, so a snapshot never shows a
/// cycle's total without its outcome. The critical sections are a handful of
/// relaxed atomic operations, well inside the lock's short-section contract.
#[derive(Debug, Clone, Default)]
pub struct SharedSyncStats {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    lock: SpinLock,
    polls: AtomicU64,
    polls_failed: AtomicU64,
    deliveries: AtomicU64,
    deliveries_dropped: AtomicU64,
}

impl SharedSyncStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_poll(&self, success: bool) {
        self.inner.lock.lock();
        self.inner.polls.fetch_add(1, Ordering::Relaxed);
        if !success {
            self.inner.polls_failed.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.lock.unlock();
    }

    pub fn record_delivery(&self, delivered: bool) {
        self.inner.lock.lock();
        if delivered {
            self.inner.deliveries.fetch_add(1, Ordering::Relaxed);
        } else {
            self.inner.deliveries_dropped.fetch_add(1, Ordering::Relaxed);
        }
        self.inner.lock.unlock();
    }

    pub fn snapshot(&self) -> SyncStats {
        self.inner.lock.lock();
        let stats = SyncStats {
            polls: self.inner.polls.load(Ordering::Relaxed),
            polls_failed: self.inner.polls_failed.load(Ordering::Relaxed),
            deliveries: self.inner.deliveries.load(Ordering::Relaxed),
            deliveries_dropped: self.inner.deliveries_dropped.load(Ordering::Relaxed),
        };
        self.inner.lock.unlock();
        stats
    }
}
