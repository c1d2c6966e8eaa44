use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use streamstore_common::StreamStoreError;

const OPEN: u8 = 0;
const CLOSING: u8 = 1;
const CLOSED: u8 = 2;

/// `{Open, Closing, Closed}` state machine. Every public `EventStore`
/// operation enters through `enter()`, which both rejects use after close
/// and tracks in-flight operations so `close()` can wait for them instead
/// of cancelling them outright.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AtomicU8,
    in_flight: AtomicUsize,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(OPEN),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn ensure_open(&self) -> Result<(), StreamStoreError> {
        match self.state.load(Ordering::Acquire) {
            OPEN => Ok(()),
            _ => Err(StreamStoreError::ObjectDisposed),
        }
    }

    /// Checks the lifecycle is open and registers the call as in-flight for
    /// the lifetime of the returned guard.
    pub fn enter(&self) -> Result<OperationGuard<'_>, StreamStoreError> {
        self.ensure_open()?;
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        Ok(OperationGuard { lifecycle: self })
    }

    /// Idempotent: a second call observes the already-closing/closed state
    /// and returns immediately.
    pub fn begin_close(&self) -> bool {
        self.state
            .compare_exchange(OPEN, CLOSING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn finish_close(&self) {
        self.state.store(CLOSED, Ordering::Release);
    }
}

/// Held for the duration of one public `EventStore` call.
pub struct OperationGuard<'a> {
    lifecycle: &'a Lifecycle,
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.lifecycle.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
