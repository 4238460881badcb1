//! Common types for series tests.
//!
//! This module contains:
//! - `TraceContext`: the shared scenario state, recording events into a log
//! - `TraceError`: error type for step, observer and finalizer bodies
//! - `TraceLog`: test-side handle to the log plus a context-build counter

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Errors produced by trace bodies.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum TraceError {
    /// A step body failed.
    #[error("step exploded")]
    Step,

    /// An observer body failed.
    #[error("observer exploded")]
    Observer,

    /// A finalizer body failed.
    #[error("finalizer exploded")]
    Finalizer,
}

/// Scenario state shared by every body of a series under test.
///
/// Events land in a log owned jointly with the test, so assertions survive
/// the state being dropped with the harness.
pub struct TraceContext {
    log: Arc<Mutex<Vec<String>>>,
}

impl TraceContext {
    /// Record an event.
    pub fn record(&mut self, event: impl Into<String>) {
        self.log.lock().push(event.into());
    }
}

/// Test-side view of the trace log.
pub struct TraceLog {
    entries: Arc<Mutex<Vec<String>>>,
    builds: Arc<AtomicUsize>,
}

impl TraceLog {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Scenario-state factory for a series, counting how often it runs.
    pub fn factory(&self) -> impl FnOnce() -> TraceContext + Send + 'static {
        let log = Arc::clone(&self.entries);
        let builds = Arc::clone(&self.builds);
        move || {
            builds.fetch_add(1, Ordering::SeqCst);
            TraceContext { log }
        }
    }

    /// Snapshot of the recorded events.
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }

    /// How many times the scenario state was constructed.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}
