//! The immutable per-fix progress snapshot.

use std::sync::Arc;

use nav_core::{GeoPoint, Intersection, Leg, Route, Step};

/// Everything known about the traveler's position on the route after one
/// processing cycle.
///
/// Rebuilt from scratch on every fix and replaced atomically by the
/// [`RouteProcessor`][crate::RouteProcessor]; consumers (milestones, UI)
/// receive shared references and never mutate one.  The decoded point lists
/// and intersection data are behind `Arc` so snapshots stay cheap to clone
/// even for long steps.
#[derive(Clone, Debug)]
pub struct RouteProgress {
    /// The route this snapshot was measured against.
    pub route: Arc<Route>,
    pub leg_index: usize,
    pub step_index: usize,

    /// Metres left on the whole route.
    pub distance_remaining: f64,
    /// Metres left on the current leg.
    pub leg_distance_remaining: f64,
    /// Metres left on the current step.
    pub step_distance_remaining: f64,

    /// Decoded geometry of the current step.
    pub current_step_points: Arc<Vec<GeoPoint>>,
    /// Decoded geometry of the upcoming step; empty when the current step is
    /// the last of its leg.
    pub upcoming_step_points: Arc<Vec<GeoPoint>>,

    /// Decision points along the current step (plus the first intersection of
    /// the upcoming step, which bounds it).
    pub intersections: Arc<Vec<Intersection>>,
    /// Parallel to `intersections`: cumulative metres along the current step
    /// to each intersection.
    pub intersection_distances: Arc<Vec<f64>>,
}

impl RouteProgress {
    pub fn current_leg(&self) -> &Leg {
        &self.route.legs[self.leg_index]
    }

    pub fn current_step(&self) -> &Step {
        &self.current_leg().steps[self.step_index]
    }

    /// The step after the current one within the same leg, if any.
    pub fn upcoming_step(&self) -> Option<&Step> {
        self.current_leg().steps.get(self.step_index + 1)
    }

    /// Metres already covered on the current step.
    pub fn step_distance_traveled(&self) -> f64 {
        (self.current_step().distance - self.step_distance_remaining).max(0.0)
    }

    /// `true` when `route` is structurally different from the route this
    /// snapshot was built against (the reroute test).
    pub fn is_new_route(&self, route: &Route) -> bool {
        *self.route != *route
    }
}
