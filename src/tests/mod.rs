//! Tests for series execution semantics.
//!
//! ## Test Organization
//!
//! - `common`: Shared trace context, error type and log helpers
//! - `ordering`: Declaration-order execution and lazy context construction
//! - `failure`: Fail-fast skipping and pending reporting
//! - `observers`: Fail-observer fan-out
//! - `finalizers`: Finalizer execution on every exit path
//! - `dsl`: `stepwise!` macro sugar and runtime pass-through
//!
//! ## Test Domain
//!
//! All tests use a trace domain: the scenario state appends event names to
//! a log whose handle outlives the run, so assertions can inspect exactly
//! which bodies executed and in what order.

mod common;

mod finalizers;
