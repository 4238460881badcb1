//! In-process sequential runtime for running series without an external
//! framework.
//!
//! `Harness` collects the groups, units and finalizers a series registers,
//! then [`Harness::run`] invokes everything in registration order and
//! returns a [`RunReport`]. It is the reference implementation of
//! [`Runtime`] and the collaborator used throughout the crate's tests.

use serde::{Deserialize, Serialize};

use crate::runtime::{
    FinalizerFn, GroupOptions, OutcomeKind, Runtime, SeriesId, UnitFn, UnitOutcome,
};

struct Unit<E> {
    name: String,
    work: UnitFn<E>,
}

struct Group<E> {
    id: SeriesId,
    name: String,
    options: GroupOptions,
    units: Vec<Unit<E>>,
    finalizers: Vec<FinalizerFn<E>>,
}

impl<E> Group<E> {
    fn new(name: &str, options: GroupOptions) -> Self {
        Self {
            id: SeriesId::new(),
            name: name.to_string(),
            options,
            units: Vec::new(),
            finalizers: Vec::new(),
        }
    }
}

/// Sequential, single-process implementation of [`Runtime`].
///
/// Units run strictly in registration order, one at a time, which satisfies
/// the delivery contract a series relies on. [`crate::ExecutionOrder::Random`]
/// is accepted but the harness still runs declared order; shuffling is a
/// concern of richer runtimes.
pub struct Harness<E> {
    groups: Vec<Group<E>>,
}

impl<E> Default for Harness<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Harness<E> {
    /// Create an empty harness.
    pub fn new() -> Self {
        Self { groups: Vec::new() }
    }

    /// Number of registered groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Metadata recorded for the group with the given ID.
    pub fn metadata(&self, id: SeriesId) -> Option<&[(String, String)]> {
        self.groups
            .iter()
            .find(|group| group.id == id)
            .map(|group| group.options.metadata.as_slice())
    }

    /// Execution order recorded for the group with the given ID.
    pub fn execution_order(&self, id: SeriesId) -> Option<crate::ExecutionOrder> {
        self.groups
            .iter()
            .find(|group| group.id == id)
            .map(|group| group.options.execution_order)
    }

    /// Attach a metadata annotation to the current group.
    ///
    /// This is a declaration the series does not intercept; authors reach it
    /// through [`crate::SeriesBuilder::runtime`].
    pub fn annotate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.current_group()
            .options
            .metadata
            .push((key.into(), value.into()));
    }

    // Units registered before any open_group land in an implicit unnamed
    // root group.
    fn current_group(&mut self) -> &mut Group<E> {
        if self.groups.is_empty() {
            self.groups.push(Group::new("", GroupOptions::default()));
        }
        let last = self.groups.len() - 1;
        &mut self.groups[last]
    }

    /// Invoke every registered unit, then every finalizer, group by group in
    /// registration order, and report the outcomes.
    pub fn run(mut self) -> RunReport<E> {
        let mut units = Vec::new();
        let mut finalizer_failures = Vec::new();

        for group in &mut self.groups {
            #[cfg(feature = "tracing")]
            tracing::info!(series = %group.id, name = %group.name, "series.start");

            for unit in &mut group.units {
                #[cfg(feature = "tracing")]
                tracing::info!(series = %group.id, unit = %unit.name, "unit.start");

                let outcome = (unit.work)();

                #[cfg(feature = "tracing")]
                tracing::info!(
                    series = %group.id,
                    unit = %unit.name,
                    kind = ?outcome.kind(),
                    "unit.end"
                );

                units.push(UnitReport {
                    series_id: group.id,
                    series: group.name.clone(),
                    unit: unit.name.clone(),
                    outcome,
                });
            }

            for finalizer in &mut group.finalizers {
                if let Err(err) = finalizer() {
                    #[cfg(feature = "tracing")]
                    tracing::error!(series = %group.id, "finalizer.failed");

                    finalizer_failures.push(err);
                }
            }
        }

        RunReport {
            units,
            finalizer_failures,
        }
    }
}

impl<E> Runtime<E> for Harness<E> {
    fn open_group(&mut self, name: &str, options: GroupOptions) -> SeriesId {
        let group = Group::new(name, options);
        let id = group.id;
        self.groups.push(group);
        id
    }

    fn register_unit(&mut self, name: &str, unit: UnitFn<E>) {
        let name = name.to_string();
        self.current_group().units.push(Unit { name, work: unit });
    }

    fn register_finalizer(&mut self, finalizer: FinalizerFn<E>) {
        self.current_group().finalizers.push(finalizer);
    }
}

// ============================================================================
// Reports
// ============================================================================

/// Outcome of one unit, with the series and unit names it was registered
/// under.
#[derive(Debug)]
pub struct UnitReport<E> {
    /// ID of the series the unit belonged to.
    pub series_id: SeriesId,
    /// Name of the series the unit belonged to.
    pub series: String,
    /// Name the unit was registered under.
    pub unit: String,
    /// What happened when the unit was invoked.
    pub outcome: UnitOutcome<E>,
}

/// Everything a [`Harness::run`] observed.
#[derive(Debug)]
pub struct RunReport<E> {
    units: Vec<UnitReport<E>>,
    finalizer_failures: Vec<E>,
}

impl<E> RunReport<E> {
    /// Per-unit reports, in execution order.
    pub fn units(&self) -> &[UnitReport<E>] {
        &self.units
    }

    /// Errors raised by finalizers, in execution order.
    pub fn finalizer_failures(&self) -> &[E] {
        &self.finalizer_failures
    }

    /// Number of units that passed.
    pub fn passed_count(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.is_passed()).count()
    }

    /// Number of units that failed.
    pub fn failed_count(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.is_failed()).count()
    }

    /// Number of units reported pending.
    pub fn pending_count(&self) -> usize {
        self.units.iter().filter(|u| u.outcome.is_pending()).count()
    }

    /// `true` when every unit passed and no finalizer failed. Pending units
    /// count against success.
    pub fn is_success(&self) -> bool {
        self.finalizer_failures.is_empty() && self.units.iter().all(|u| u.outcome.is_success())
    }

    /// Collapse the report into a suite-level verdict.
    pub fn into_result(self) -> Result<(), RunFailure> {
        if self.is_success() {
            return Ok(());
        }
        Err(RunFailure {
            total: self.units.len(),
            failed: self.failed_count(),
            pending: self.pending_count(),
            finalizer_failures: self.finalizer_failures.len(),
        })
    }
}

impl<E: std::fmt::Display> RunReport<E> {
    /// Serializable digest of the run, with error and pending messages
    /// rendered as strings.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total: self.units.len(),
            passed: self.passed_count(),
            failed: self.failed_count(),
            pending: self.pending_count(),
            finalizer_failures: self.finalizer_failures.len(),
            units: self
                .units
                .iter()
                .map(|u| UnitSummary {
                    series: u.series.clone(),
                    unit: u.unit.clone(),
                    kind: u.outcome.kind(),
                    message: match &u.outcome {
                        UnitOutcome::Passed => None,
                        UnitOutcome::Failed(err) => Some(err.to_string()),
                        UnitOutcome::Pending { reason } => Some(reason.clone()),
                    },
                })
                .collect(),
        }
    }
}

/// Aggregate failure verdict for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{failed} failed, {pending} pending of {total} units; {finalizer_failures} finalizer failure(s)")]
pub struct RunFailure {
    /// Total units attempted or skipped.
    pub total: usize,
    /// Units that failed.
    pub failed: usize,
    /// Units reported pending.
    pub pending: usize,
    /// Finalizers that raised.
    pub finalizer_failures: usize,
}

/// Serializable digest of one unit's outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    /// Series name.
    pub series: String,
    /// Unit name.
    pub unit: String,
    /// Outcome digest.
    pub kind: OutcomeKind,
    /// Error or pending-reason message, if any.
    pub message: Option<String>,
}

/// Serializable digest of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Total units.
    pub total: usize,
    /// Passed units.
    pub passed: usize,
    /// Failed units.
    pub failed: usize,
    /// Pending units.
    pub pending: usize,
    /// Finalizers that raised.
    pub finalizer_failures: usize,
    /// Per-unit digests, in execution order.
    pub units: Vec<UnitSummary>,
}
