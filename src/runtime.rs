//! The capability interface a series is registered against.
//!
//! `Runtime` is the declaration surface of the surrounding test-execution
//! framework: it accepts a named group of units, individual named units of
//! work, and once-per-group finalizers. The engine only talks to this trait;
//! [`crate::Harness`] is the in-process implementation shipped with the crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an opened series (group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesId(pub Uuid);

impl SeriesId {
    /// Create a new random series ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SeriesId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SeriesId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order in which a runtime executes the units of one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecutionOrder {
    /// Units run in declaration order. Required by step series.
    #[default]
    Declared,
    /// The runtime may shuffle units. Never used by step series; present so
    /// ordinary groups can keep whatever the surrounding framework does.
    Random,
}

/// Configuration for a group registered with a [`Runtime`].
///
/// [`crate::stepwise_with`] forces `execution_order` to
/// [`ExecutionOrder::Declared`] regardless of what the author passed, since a
/// series is meaningless out of order. `metadata` is carried through
/// untouched for the runtime's own reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupOptions {
    /// Execution order for the group's units.
    pub execution_order: ExecutionOrder,
    /// Free-form key/value annotations forwarded to the runtime.
    pub metadata: Vec<(String, String)>,
}

impl GroupOptions {
    /// Options with declared execution order and no metadata.
    pub fn declared() -> Self {
        Self::default()
    }

    /// Add a metadata annotation.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }
}

/// Outcome of invoking one registered unit of work.
///
/// `Pending` is the "not attempted because a previous step failed" state: it
/// renders distinctly from a genuine failure but still counts as unsuccessful
/// for aggregate results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome<E> {
    /// The unit completed normally.
    Passed,
    /// The unit's body returned an error; the error propagates unchanged.
    Failed(E),
    /// The unit was not attempted.
    Pending {
        /// Why the unit was not attempted.
        reason: String,
    },
}

impl<E> UnitOutcome<E> {
    /// Returns `true` if the unit passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Returns `true` if the unit failed with an error.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` if the unit was skipped as pending.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// Returns `true` only for [`UnitOutcome::Passed`]. Pending units count
    /// as unsuccessful.
    pub fn is_success(&self) -> bool {
        self.is_passed()
    }

    /// The serializable digest of this outcome.
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Passed => OutcomeKind::Passed,
            Self::Failed(_) => OutcomeKind::Failed,
            Self::Pending { .. } => OutcomeKind::Pending,
        }
    }
}

/// Digest of a [`UnitOutcome`] without the error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// The unit completed normally.
    Passed,
    /// The unit failed.
    Failed,
    /// The unit was not attempted.
    Pending,
}

/// A registered unit of work. Invoked at most once by the runtime.
pub type UnitFn<E> = Box<dyn FnMut() -> UnitOutcome<E> + Send>;

/// A registered finalizer. Invoked at most once, after all units of the
/// group have been attempted.
pub type FinalizerFn<E> = Box<dyn FnMut() -> Result<(), E> + Send>;

/// Declaration surface of the external test-execution runtime.
///
/// The engine registers everything up front; the runtime later drives the
/// invocations. Implementations must preserve registration order within a
/// group whose options say [`ExecutionOrder::Declared`] and must never run
/// two units of the same group concurrently.
pub trait Runtime<E> {
    /// Open a new group of units under `name`.
    ///
    /// Units and finalizers registered after this call belong to the new
    /// group until the next `open_group`.
    fn open_group(&mut self, name: &str, options: GroupOptions) -> SeriesId;

    /// Register one named unit of work in the current group.
    fn register_unit(&mut self, name: &str, unit: UnitFn<E>);

    /// Register a finalizer for the current group.
    ///
    /// Every registration is independent; all finalizers run, in
    /// registration order, after the group's last unit was attempted.
    fn register_finalizer(&mut self, finalizer: FinalizerFn<E>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_id_display() {
        let id = SeriesId::new();
        assert!(!format!("{}", id).is_empty());
    }

    #[test]
    fn group_options_default_is_declared() {
        let options = GroupOptions::default();
        assert_eq!(options.execution_order, ExecutionOrder::Declared);
        assert!(options.metadata.is_empty());
    }

    #[test]
    fn group_options_metadata_builder() {
        let options = GroupOptions::declared().with_metadata("suite", "smoke");
        assert_eq!(options.metadata, vec![("suite".into(), "smoke".into())]);
    }

    #[test]
    fn outcome_predicates() {
        let passed: UnitOutcome<String> = UnitOutcome::Passed;
        assert!(passed.is_passed() && passed.is_success());

        let failed: UnitOutcome<String> = UnitOutcome::Failed("boom".into());
        assert!(failed.is_failed() && !failed.is_success());

        let pending: UnitOutcome<String> = UnitOutcome::Pending {
            reason: "previous step failed".into(),
        };
        assert!(pending.is_pending());
        assert!(!pending.is_success());
        assert_eq!(pending.kind(), OutcomeKind::Pending);
    }
}
