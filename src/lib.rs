#![deny(missing_docs)]

//! Stepwise — named, ordered series of dependent test steps sharing one
//! execution context.
//!
//! # Design Goals
//!
//! A series fails fast but reports honestly:
//!
//! - **One shared context**: every step, fail observer and finalizer body
//!   runs against the same lazily-built scenario state
//! - **Skip, don't hide**: after the first failing step, later steps are
//!   reported pending ("previous step failed") instead of running or
//!   silently passing, and pending still counts as unsuccessful
//! - **Observers and finalizers**: fail observers run once per failing
//!   step, in declaration order, before the error propagates; finalizers
//!   always run after the last step attempt
//!
//! # Core Concepts
//!
//! - [`stepwise`]: opens a series and evaluates the author's declarative
//!   block against a [`SeriesBuilder`]
//! - [`SharedContext`]: lazy scenario state plus the series failure flag
//! - [`Runtime`]: the declaration surface of the surrounding test framework
//! - [`Harness`]: the in-process sequential [`Runtime`] shipped with the
//!   crate
//!
//! # Example
//!
//! ```
//! use stepwise::{stepwise, Harness};
//!
//! #[derive(Default)]
//! struct Session {
//!     registered: bool,
//!     token: Option<String>,
//! }
//!
//! let mut harness = Harness::<String>::new();
//! stepwise(&mut harness, "user registration and sign in", Session::default, |s| {
//!     s.step("register", |ctx| {
//!         ctx.registered = true;
//!         Ok(())
//!     });
//!     s.step("sign in", |ctx| {
//!         if !ctx.registered {
//!             return Err("not registered".to_string());
//!         }
//!         ctx.token = Some("token".into());
//!         Ok(())
//!     });
//!     s.after(|ctx| {
//!         ctx.token = None;
//!         Ok(())
//!     });
//! });
//!
//! let report = harness.run();
//! assert!(report.is_success());
//! ```

// Modules
pub mod context;
pub mod harness;
mod macros;
pub mod runtime;
pub mod series;

// Re-exports for convenience
pub use context::SharedContext;
pub use harness::{Harness, RunFailure, RunReport, RunSummary, UnitReport, UnitSummary};
pub use runtime::{
    ExecutionOrder, FinalizerFn, GroupOptions, OutcomeKind, Runtime, SeriesId, UnitFn, UnitOutcome,
};
pub use series::{stepwise, stepwise_with, SeriesBuilder, SKIPPED_AFTER_FAILURE};

#[cfg(test)]
mod tests;
