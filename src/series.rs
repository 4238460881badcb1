//! Series declaration: steps, fail observers and finalizers.
//!
//! [`stepwise`] opens a group on the external runtime and hands the author a
//! [`SeriesBuilder`]. Each `step` call registers one unit of work wrapped
//! with the skip-on-prior-failure policy; `on_fail` and `after` attach
//! observers and finalizers to the same shared context.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::context::SharedContext;
use crate::runtime::{ExecutionOrder, GroupOptions, Runtime, SeriesId, UnitOutcome};

/// Reason reported for steps that were not attempted because an earlier step
/// of the series failed.
pub const SKIPPED_AFTER_FAILURE: &str = "previous step failed";

type ObserverFn<Ctx, E> = Box<dyn FnMut(&mut Ctx) -> Result<(), E> + Send>;

/// Translates declarative calls into registered units of work.
///
/// One builder exists per [`stepwise`] block. Steps are registered with the
/// runtime immediately, but their bodies only run when the runtime later
/// invokes them; by then the shared context knows whether an earlier step
/// failed. The observer list is shared with every registered step, so
/// observers declared after a step still run when that step fails.
pub struct SeriesBuilder<'r, R, Ctx, Err> {
    runtime: &'r mut R,
    context: SharedContext<Ctx>,
    observers: Arc<Mutex<Vec<ObserverFn<Ctx, Err>>>>,
}

impl<'r, R, Ctx, Err> SeriesBuilder<'r, R, Ctx, Err>
where
    R: Runtime<Err>,
    Ctx: Send + 'static,
    Err: Send + 'static,
{
    fn new(runtime: &'r mut R, factory: impl FnOnce() -> Ctx + Send + 'static) -> Self {
        Self {
            runtime,
            context: SharedContext::new(factory),
            observers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Declare the next step of the series.
    ///
    /// The registered unit checks the failure flag at invocation time:
    /// - if an earlier step failed, the body never runs and the unit reports
    ///   [`UnitOutcome::Pending`] with [`SKIPPED_AFTER_FAILURE`], which still
    ///   counts as unsuccessful;
    /// - otherwise the body runs against the shared scenario state. On error
    ///   every registered fail observer runs, in declaration order, before
    ///   the step's own error is reported. An observer error takes the step
    ///   error's place and stops the fan-out.
    pub fn step<F>(&mut self, name: impl Into<String>, body: F)
    where
        F: FnMut(&mut Ctx) -> Result<(), Err> + Send + 'static,
    {
        let name = name.into();
        let context = self.context.clone();
        let observers = Arc::clone(&self.observers);
        let mut body = body;

        #[cfg(feature = "tracing")]
        let step_name = name.clone();

        self.runtime.register_unit(
            &name,
            Box::new(move || {
                if context.previous_failed() {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(step = %step_name, "step.skipped");

                    return UnitOutcome::Pending {
                        reason: SKIPPED_AFTER_FAILURE.to_string(),
                    };
                }

                match context.run_step(&mut body) {
                    Ok(()) => UnitOutcome::Passed,
                    Err(err) => {
                        let mut observers = observers.lock();
                        for observer in observers.iter_mut() {
                            if let Err(observer_err) = context.run(|state| observer(state)) {
                                return UnitOutcome::Failed(observer_err);
                            }
                        }
                        UnitOutcome::Failed(err)
                    }
                }
            }),
        );
    }

    /// Declare a fail observer.
    ///
    /// Observers run once per failing step, after that step's body returned
    /// an error and before the error is reported. They never run if no step
    /// fails. Multiple observers run in declaration order.
    pub fn on_fail<F>(&mut self, body: F)
    where
        F: FnMut(&mut Ctx) -> Result<(), Err> + Send + 'static,
    {
        self.observers.lock().push(Box::new(body));
    }

    /// Declare a finalizer that runs after all steps of the series were
    /// attempted, whether they passed, failed or were skipped.
    ///
    /// Every call registers an independent finalizer; all of them run, in
    /// declaration order. Finalizer errors propagate to the runtime but do
    /// not touch the series failure flag.
    pub fn after<F>(&mut self, body: F)
    where
        F: FnMut(&mut Ctx) -> Result<(), Err> + Send + 'static,
    {
        let context = self.context.clone();
        let mut body = body;
        self.runtime
            .register_finalizer(Box::new(move || context.run(&mut body)));
    }

    /// Access the underlying runtime for declarations the series does not
    /// intercept (fixtures, annotations, nested configuration).
    pub fn runtime(&mut self) -> &mut R {
        self.runtime
    }
}

/// Open a series with default options and evaluate the author's declarative
/// block once.
///
/// `factory` builds the scenario state shared by every step, observer and
/// finalizer body; it runs lazily, on the first body that touches the state.
///
/// # Example
///
/// ```
/// use stepwise::{stepwise, Harness};
///
/// #[derive(Default)]
/// struct Session {
///     token: Option<String>,
/// }
///
/// let mut harness = Harness::<String>::new();
/// stepwise(&mut harness, "sign in", Session::default, |s| {
///     s.step("register", |ctx| {
///         ctx.token = Some("secret".into());
///         Ok(())
///     });
///     s.step("use token", |ctx| {
///         ctx.token.as_deref().map(|_| ()).ok_or("no token".to_string())
///     });
/// });
/// assert!(harness.run().is_success());
/// ```
pub fn stepwise<R, Ctx, Err, New, F>(
    runtime: &mut R,
    name: impl Into<String>,
    factory: New,
    build: F,
) -> SeriesId
where
    R: Runtime<Err>,
    Ctx: Send + 'static,
    Err: Send + 'static,
    New: FnOnce() -> Ctx + Send + 'static,
    F: FnOnce(&mut SeriesBuilder<'_, R, Ctx, Err>),
{
    stepwise_with(runtime, name, GroupOptions::default(), factory, build)
}

/// Open a series with author-supplied [`GroupOptions`].
///
/// The options are forwarded to the runtime with `execution_order` forced to
/// [`ExecutionOrder::Declared`]; a series out of declaration order would be
/// meaningless.
pub fn stepwise_with<R, Ctx, Err, New, F>(
    runtime: &mut R,
    name: impl Into<String>,
    mut options: GroupOptions,
    factory: New,
    build: F,
) -> SeriesId
where
    R: Runtime<Err>,
    Ctx: Send + 'static,
    Err: Send + 'static,
    New: FnOnce() -> Ctx + Send + 'static,
    F: FnOnce(&mut SeriesBuilder<'_, R, Ctx, Err>),
{
    options.execution_order = ExecutionOrder::Declared;
    let name = name.into();
    let id = runtime.open_group(&name, options);

    let mut series = SeriesBuilder::new(runtime, factory);
    build(&mut series);
    id
}
