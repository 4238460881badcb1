//! Shared scenario state and the series failure flag.
//!
//! Every step, fail observer and finalizer of one series runs against the
//! same lazily-built scenario state. `SharedContext` is the single source of
//! truth for that state and for "has any step failed yet".

use std::sync::Arc;

use parking_lot::Mutex;

/// Factory producing the scenario state on first use.
type StateFactory<Ctx> = Box<dyn FnOnce() -> Ctx + Send>;

struct ContextCell<Ctx> {
    factory: Option<StateFactory<Ctx>>,
    state: Option<Ctx>,
    failed: bool,
}

impl<Ctx> ContextCell<Ctx> {
    fn with_state<T>(&mut self, work: impl FnOnce(&mut Ctx) -> T) -> T {
        if let Some(factory) = self.factory.take() {
            self.state = Some(factory());
        }
        match self.state.as_mut() {
            Some(state) => work(state),
            // `new` always installs a factory and only the branch above
            // consumes it, filling `state` in the same breath.
            None => unreachable!("scenario state factory consumed without producing state"),
        }
    }
}

/// Handle to the single execution context of one series.
///
/// Cloning the handle is cheap and every clone refers to the same cell, so
/// units registered at declaration time all observe one scenario state and
/// one failure flag at invocation time. The scenario state is constructed at
/// most once, on the first [`run_step`](Self::run_step) or
/// [`run`](Self::run).
///
/// The mutex exists because many boxed closures hold handles to one cell,
/// not for cross-thread contention; the runtime is assumed to deliver the
/// units of one series sequentially.
pub struct SharedContext<Ctx> {
    inner: Arc<Mutex<ContextCell<Ctx>>>,
}

impl<Ctx> Clone for SharedContext<Ctx> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<Ctx> std::fmt::Debug for SharedContext<Ctx> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self.inner.lock();
        f.debug_struct("SharedContext")
            .field("built", &cell.state.is_some())
            .field("failed", &cell.failed)
            .finish()
    }
}

impl<Ctx> SharedContext<Ctx> {
    /// Create a context whose scenario state will be built by `factory` on
    /// first use.
    pub fn new(factory: impl FnOnce() -> Ctx + Send + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContextCell {
                factory: Some(Box::new(factory)),
                state: None,
                failed: false,
            })),
        }
    }

    /// Run a step body against the scenario state.
    ///
    /// An error flips the series to failed and is returned unchanged.
    pub fn run_step<E>(
        &self,
        work: impl FnOnce(&mut Ctx) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut cell = self.inner.lock();
        let result = cell.with_state(work);
        if result.is_err() {
            cell.failed = true;
        }
        result
    }

    /// Run an observer or finalizer body against the scenario state.
    ///
    /// Errors propagate but never touch the failure flag: observer and
    /// finalizer failures are not part of the series's pass/fail state.
    pub fn run<E>(&self, work: impl FnOnce(&mut Ctx) -> Result<(), E>) -> Result<(), E> {
        self.inner.lock().with_state(work)
    }

    /// Whether any step of this series has failed so far.
    pub fn previous_failed(&self) -> bool {
        self.inner.lock().failed
    }
}
