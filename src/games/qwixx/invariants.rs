//! First-class invariants for Qwixx rows.
//!
//! Invariants are logical properties that must hold after every crossing.
//! They are checked in debug builds and can be tested independently.

use super::row::Row;
use super::types::{CROSSINGS_BEFORE_LOCK, RIGHTMOST_INDEX};
use tracing::warn;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Returns every violated invariant, or `Ok(())` if all hold.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: a crossed rightmost cell means the row is locked.
pub struct LockCellLocksRow;

impl Invariant<Row> for LockCellLocksRow {
    fn holds(row: &Row) -> bool {
        !row.cells()[RIGHTMOST_INDEX] || row.is_locked()
    }

    fn description() -> &'static str {
        "Crossing the rightmost cell locks the row"
    }
}

/// Invariant: a crossed rightmost cell was preceded by at least five other crossings.
pub struct LockQuotaMet;

impl Invariant<Row> for LockQuotaMet {
    fn holds(row: &Row) -> bool {
        !row.cells()[RIGHTMOST_INDEX] || row.crossed_count() > CROSSINGS_BEFORE_LOCK
    }

    fn description() -> &'static str {
        "The rightmost cell needs five other crossed cells"
    }
}

/// All row invariants as a composable set.
pub type RowInvariants = (LockCellLocksRow, LockQuotaMet);

/// Asserts that all row invariants hold (panics on violation in debug builds).
pub fn assert_invariants(row: &Row) {
    if let Err(violations) = RowInvariants::check_all(row) {
        for v in &violations {
            warn!(invariant = %v.description, "Row invariant violated");
        }
        debug_assert!(violations.is_empty(), "row invariants violated");
    }
}
