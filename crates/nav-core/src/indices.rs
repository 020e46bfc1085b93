//! The `(leg_index, step_index)` cursor into a route.

use crate::{NavError, NavResult, Route};

/// Immutable position within a route: which leg, which step.
///
/// Indices are monotonically non-decreasing while the same route is active
/// and reset to [`NavigationIndices::FIRST`] the instant the active route
/// changes.  Advancing past the final step of the final leg is a no-op — the
/// cursor holds its last valid value (terminal state) and arrival is checked
/// separately via route-level distance remaining.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationIndices {
    pub leg_index: usize,
    pub step_index: usize,
}

impl NavigationIndices {
    /// The start of any route: first step of the first leg.
    pub const FIRST: NavigationIndices = NavigationIndices {
        leg_index: 0,
        step_index: 0,
    };

    /// Validated constructor: both indices must be in bounds for `route`.
    pub fn new(leg_index: usize, step_index: usize, route: &Route) -> NavResult<Self> {
        let in_bounds = route
            .leg(leg_index)
            .is_some_and(|leg| step_index < leg.steps.len());
        if !in_bounds {
            return Err(NavError::IndexOutOfBounds {
                leg_index,
                step_index,
            });
        }
        Ok(Self {
            leg_index,
            step_index,
        })
    }

    /// The next cursor position: next step, rolling over into the next leg,
    /// or `self` unchanged at the end of the route.
    pub fn advance(self, route: &Route) -> Self {
        let steps_in_leg = route
            .leg(self.leg_index)
            .map_or(0, |leg| leg.steps.len());

        if self.step_index + 1 < steps_in_leg {
            return Self {
                leg_index: self.leg_index,
                step_index: self.step_index + 1,
            };
        }
        if self.leg_index + 1 < route.legs.len() {
            return Self {
                leg_index: self.leg_index + 1,
                step_index: 0,
            };
        }
        self // terminal: route complete
    }
}

impl std::fmt::Display for NavigationIndices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "leg {} step {}", self.leg_index, self.step_index)
    }
}
