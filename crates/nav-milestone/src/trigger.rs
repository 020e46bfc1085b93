//! Boolean trigger statements evaluated over progress snapshots.
//!
//! Statements are stateless data — they carry no latch and are re-evaluated
//! fresh each cycle.  One-shot behavior belongs to the milestone wrapping the
//! statement, not to the statement itself.

use nav_progress::RouteProgress;

/// A named numeric property read off a `(previous, current)` snapshot pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriggerProperty {
    /// Full distance of the current step, metres.
    StepDistanceTotalMeters,
    /// Metres left on the current step.
    StepDistanceRemainingMeters,
    /// Metres already covered on the current step.
    StepDistanceTraveledMeters,
    StepIndex,
    LegIndex,
    /// `1.0` when the cursor moved between the two snapshots, else `0.0`.
    NewStep,
}

impl TriggerProperty {
    fn value(self, previous: &RouteProgress, current: &RouteProgress) -> f64 {
        match self {
            Self::StepDistanceTotalMeters => current.current_step().distance,
            Self::StepDistanceRemainingMeters => current.step_distance_remaining,
            Self::StepDistanceTraveledMeters => current.step_distance_traveled(),
            Self::StepIndex => current.step_index as f64,
            Self::LegIndex => current.leg_index as f64,
            Self::NewStep => {
                let moved = previous.step_index != current.step_index
                    || previous.leg_index != current.leg_index;
                if moved { 1.0 } else { 0.0 }
            }
        }
    }
}

/// A boolean expression over [`TriggerProperty`] values: comparisons composed
/// with `all` / `any`.
#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Gt(TriggerProperty, f64),
    Gte(TriggerProperty, f64),
    Lt(TriggerProperty, f64),
    Lte(TriggerProperty, f64),
    /// Equality within a small epsilon (properties are f64).
    Eq(TriggerProperty, f64),
    /// True when every sub-statement is true.  Empty `all` is true.
    All(Vec<Statement>),
    /// True when at least one sub-statement is true.  Empty `any` is false.
    Any(Vec<Statement>),
}

impl Statement {
    /// Evaluate against a snapshot pair.
    pub fn is_occurring(&self, previous: &RouteProgress, current: &RouteProgress) -> bool {
        match self {
            Self::Gt(p, rhs) => p.value(previous, current) > *rhs,
            Self::Gte(p, rhs) => p.value(previous, current) >= *rhs,
            Self::Lt(p, rhs) => p.value(previous, current) < *rhs,
            Self::Lte(p, rhs) => p.value(previous, current) <= *rhs,
            Self::Eq(p, rhs) => (p.value(previous, current) - rhs).abs() < 1e-6,
            Self::All(inner) => inner.iter().all(|s| s.is_occurring(previous, current)),
            Self::Any(inner) => inner.iter().any(|s| s.is_occurring(previous, current)),
        }
    }
}
