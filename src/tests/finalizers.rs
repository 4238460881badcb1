//! Finalizer execution on every exit path.

use crate::{stepwise, Harness};

use super::common::{TraceError, TraceLog};

/// The finalizer runs after all steps, including a failing one.
#[test]
fn finalizer_runs_after_failure() {
    let log = TraceLog::new();
    let mut harness = Harness::<TraceError>::new();

    stepwise(&mut harness, "check after", log.factory(), |s| {
        s.step("first", |ctx| {
            ctx.record("first");
            Ok(())
        });
        s.step("fail", |ctx| {
            ctx.record("failed");
            Err(TraceError::Step)
        });
        s.after(|ctx| {
            ctx.record("after");
            Ok(())
        });
    });

    harness.run();
    assert_eq!(log.entries(), ["first", "failed", "after"]);
}

/// The finalizer also runs when everything passed.
#[test]
fn finalizer_runs_on_success() {
    let log = TraceLog::new();
    let mut harness = Harness::<TraceError>::new();

    stepwise(&mut harness, "after on success", log.factory(), |s| {
        s.step("only", |ctx| {
            ctx.record("only");
            Ok(())
        });
        s.after(|ctx| {
            ctx.record("after");
            Ok(())
        });
    });

    assert!(harness.run().is_success());
    assert_eq!(log.entries(), ["only", "after"]);
}

/// Later `after` registrations do not replace earlier ones; all finalizers
/// run, in declaration order.
#[test]
fn multiple_finalizers_all_run() {
    let log = TraceLog::new();
    let mut harness = Harness::<TraceError>::new();

    stepwise(&mut harness, "many afters", log.factory(), |s| {
        s.after(|ctx| {
            ctx.record("after-1");
            Ok(())
        });
        s.step("only", |ctx| {
            ctx.record("only");
            Ok(())
        });
        s.after(|ctx| {
            ctx.record("after-2");
            Ok(())
        });
    });

    harness.run();
    assert_eq!(log.entries(), ["only", "after-1", "after-2"]);
}

/// A finalizer error is reported against the run without disturbing the
/// series failure flag or the step outcomes.
#[test]
fn finalizer_error_is_reported() {
    let log = TraceLog::new();
    let mut harness = Harness::<TraceError>::new();

    stepwise(&mut harness, "after fails", log.factory(), |s| {
        s.step("only", |ctx| {
            ctx.record("only");
            Ok(())
        });
        s.after(|_ctx| Err(TraceError::Finalizer));
    });

    let report = harness.run();
    assert_eq!(report.passed_count(), 1);
    assert_eq!(report.finalizer_failures(), [TraceError::Finalizer]);
    assert!(!report.is_success());
}

/// Steps, observers and finalizers all see one scenario-state instance.
#[test]
fn finalizer_shares_the_context() {
    let log = TraceLog::new();
    let mut harness = Harness::<TraceError>::new();

    stepwise(&mut harness, "one context", log.factory(), |s| {
        s.step("fail", |ctx| {
            ctx.record("failed");
            Err(TraceError::Step)
        });
        s.on_fail(|ctx| {
            ctx.record("observer");
            Ok(())
        });
        s.after(|ctx| {
            ctx.record("after");
            Ok(())
        });
    });

    harness.run();
    assert_eq!(log.entries(), ["failed", "observer", "after"]);
    assert_eq!(log.builds(), 1);
}
