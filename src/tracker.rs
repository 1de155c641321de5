//! In-flight request accounting.
//!
//! The original design patched the global fetch binding; here the tracker is
//! an owned value wired in once, and callers either run work through
//! [`RequestTracker::track`] or hold a [`RequestGuard`] across an async
//! boundary. Every increment is paired with exactly one decrement because the
//! decrement lives in `Drop`, on success, failure, and unwind alike.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared counter of tracked requests that have started but not yet settled.
///
/// Cheap to clone; clones share the same counter.
#[derive(Clone, Default)]
pub struct RequestTracker {
    active: Arc<AtomicUsize>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of requests currently in flight.
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// True if there are no in-flight requests.
    pub fn is_idle(&self) -> bool {
        self.active() == 0
    }

    /// Begin tracking one request. The count drops when the guard does.
    pub fn begin(&self) -> RequestGuard {
        self.active.fetch_add(1, Ordering::AcqRel);
        RequestGuard {
            active: Arc::clone(&self.active),
        }
    }

    /// Run a fallible call under tracking.
    ///
    /// The call's `Result` is returned unchanged, errors included; tracking
    /// must never alter what the caller observes.
    pub fn track<T, E, F>(&self, call: F) -> Result<T, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let _guard = self.begin();
        call()
    }
}

/// RAII handle for one in-flight request.
pub struct RequestGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        let prev = self.active.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "request guard dropped with zero active count");
    }
}
