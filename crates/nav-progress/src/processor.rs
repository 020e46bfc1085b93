//! The per-fix route processor: index advancement and snapshot assembly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};

use nav_core::geometry::{
    bearing_matches, decode_polyline, distance_along, distance_remaining_along, snap_to_points,
};
use nav_core::{
    Fix, GeoPoint, Intersection, NavResult, NavigationIndices, NavigationOptions, Route, Step,
};

use crate::{NoopProcessorObserver, ProcessorObserver, RouteProgress};

// ── Off-route advance handle ──────────────────────────────────────────────────

/// Cloneable handle an off-route detector uses to request an index advance.
///
/// This is the single cross-thread touch point of the engine: the detector
/// runs on its own schedule and may call [`request_advance`] concurrently
/// with fix processing.  The request is a one-way signal consumed exactly
/// once, at the start of the next processing cycle.
///
/// [`request_advance`]: OffRouteAdvanceHandle::request_advance
#[derive(Clone)]
pub struct OffRouteAdvanceHandle(Arc<AtomicBool>);

impl OffRouteAdvanceHandle {
    /// Signal that the traveler has moved onto the next step without the
    /// normal completion conditions firing (e.g. after an off-route recovery).
    pub fn request_advance(&self) {
        self.0.store(true, Ordering::Release);
    }
}

// ── RouteProcessor ────────────────────────────────────────────────────────────

/// State machine tracking a traveler along one active route.
///
/// Feed it one [`Fix`] at a time via [`process_fix`]; it maintains the
/// `(leg, step)` cursor, decodes step geometry as the cursor moves, and
/// publishes a fresh [`RouteProgress`] snapshot per fix.
///
/// # Concurrency
///
/// Fixes must be delivered serially — all internal state except the pending
/// advance flag is owned by the processing thread.  The flag is the one
/// input another thread may touch, via [`advance_handle`].
///
/// [`process_fix`]: RouteProcessor::process_fix
/// [`advance_handle`]: RouteProcessor::advance_handle
pub struct RouteProcessor {
    route: Option<Arc<Route>>,
    indices: NavigationIndices,

    current_step_points: Arc<Vec<GeoPoint>>,
    upcoming_step_points: Arc<Vec<GeoPoint>>,
    intersections: Arc<Vec<Intersection>>,
    intersection_distances: Arc<Vec<f64>>,

    progress: Option<RouteProgress>,
    pending_advance: Arc<AtomicBool>,
    observer: Box<dyn ProcessorObserver>,
}

impl Default for RouteProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteProcessor {
    pub fn new() -> Self {
        Self::with_observer(Box::new(NoopProcessorObserver))
    }

    /// Create a processor that notifies `observer` on maneuver changes
    /// (typically the off-route detector clearing its deviation cache).
    pub fn with_observer(observer: Box<dyn ProcessorObserver>) -> Self {
        Self {
            route: None,
            indices: NavigationIndices::FIRST,
            current_step_points: Arc::new(Vec::new()),
            upcoming_step_points: Arc::new(Vec::new()),
            intersections: Arc::new(Vec::new()),
            intersection_distances: Arc::new(Vec::new()),
            progress: None,
            pending_advance: Arc::new(AtomicBool::new(false)),
            observer,
        }
    }

    /// Handle for the off-route detector's advance signal.
    pub fn advance_handle(&self) -> OffRouteAdvanceHandle {
        OffRouteAdvanceHandle(Arc::clone(&self.pending_advance))
    }

    /// The most recently published snapshot, if any fix has been processed.
    pub fn last_progress(&self) -> Option<&RouteProgress> {
        self.progress.as_ref()
    }

    /// Process one position fix against `route` and publish a new snapshot.
    ///
    /// Handles, in order: reroute detection (full reset), a pending
    /// off-route advance, the maneuver-completion test (normal and forced
    /// advance), and snapshot assembly.  Only structurally unusable routes
    /// produce an error; geometry problems degrade per the
    /// [`nav_core::geometry`] failure policy.
    pub fn process_fix(
        &mut self,
        route: &Arc<Route>,
        options: &NavigationOptions,
        fix: Fix,
    ) -> NavResult<RouteProgress> {
        route.validate()?;

        self.check_new_route(route);

        // Consume the off-route detector's one-shot advance request.  A
        // reroute above clears it instead: the request was made against a
        // route that is no longer active.
        if self.pending_advance.swap(false, Ordering::AcqRel) {
            debug!("advancing indices on off-route signal");
            self.advance_indices(route);
        }

        let mut step_distance_remaining = self.step_distance_remaining(fix.location);

        let within_radius = step_distance_remaining < options.maneuver_zone_radius;
        let bearing_ok = bearing_matches(
            fix.bearing,
            self.current_step(route).maneuver.bearing_after,
            options.max_turn_completion_offset,
        );
        // The traveler is geometrically past the step end but the heading
        // never matched the expected turn; advance anyway so guidance does
        // not stall.
        let forced = step_distance_remaining == 0.0 && !bearing_ok;

        if (bearing_ok && within_radius) || forced {
            self.advance_indices(route);
            step_distance_remaining = self.step_distance_remaining(fix.location);
        }

        let progress = self.assemble_progress(route, step_distance_remaining);
        self.progress = Some(progress.clone());
        Ok(progress)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Reset everything when `route` is not the route currently held
    /// (structural comparison — see [`nav_core::route`]).
    fn check_new_route(&mut self, route: &Arc<Route>) {
        let is_new = match &self.route {
            Some(held) => **held != **route,
            None => true,
        };
        if !is_new {
            return;
        }

        info!(
            "new active route ({} legs, {:.0} m) — resetting progress",
            route.legs.len(),
            route.distance
        );
        self.route = Some(Arc::clone(route));
        self.indices = NavigationIndices::FIRST;
        self.pending_advance.store(false, Ordering::Release);
        self.load_step_data(route);

        // Initial snapshot: the traveler is taken to be at the very start,
        // so the first step's full distance remains.
        let first_step_distance = route.legs[0].steps[0].distance;
        let progress = self.assemble_progress(route, first_step_distance);
        self.progress = Some(progress);
    }

    /// Move the cursor one step forward and rebuild all per-step state.
    fn advance_indices(&mut self, route: &Arc<Route>) {
        self.indices = self.indices.advance(route);
        debug!("maneuver complete, now at {}", self.indices);
        self.load_step_data(route);
    }

    /// Decode geometry and rebuild intersection data for the current cursor.
    ///
    /// The upcoming step is always `step_index + 1` within the current leg;
    /// past the leg end the upcoming point list is empty.
    fn load_step_data(&mut self, route: &Arc<Route>) {
        let leg = &route.legs[self.indices.leg_index];
        let current = &leg.steps[self.indices.step_index];
        let upcoming = leg.steps.get(self.indices.step_index + 1);

        self.current_step_points = Arc::new(decode_polyline(&current.geometry));
        self.upcoming_step_points = Arc::new(
            upcoming.map_or_else(Vec::new, |step| decode_polyline(&step.geometry)),
        );

        self.intersections = Arc::new(intersections_list(current, upcoming));
        self.intersection_distances = Arc::new(distances_to_intersections(
            &self.current_step_points,
            &self.intersections,
        ));

        // New maneuver geometry invalidates the detector's old deviation
        // heuristics.
        self.observer.on_maneuver_change();
    }

    /// Metres left on the current step for a fix at `location`.
    ///
    /// The raw fix is snapped onto the step geometry first; an empty point
    /// list (decode failure) yields zero remaining, which the completion test
    /// turns into a forced advance.
    fn step_distance_remaining(&self, location: GeoPoint) -> f64 {
        let snapped = snap_to_points(location, &self.current_step_points);
        distance_remaining_along(snapped, &self.current_step_points)
    }

    fn current_step<'a>(&self, route: &'a Route) -> &'a Step {
        &route.legs[self.indices.leg_index].steps[self.indices.step_index]
    }

    fn assemble_progress(&self, route: &Arc<Route>, step_distance_remaining: f64) -> RouteProgress {
        let leg_index = self.indices.leg_index;
        let step_index = self.indices.step_index;
        let leg_remaining =
            leg_distance_remaining(step_distance_remaining, leg_index, step_index, route);
        let route_remaining = route_distance_remaining(leg_remaining, leg_index, route);

        RouteProgress {
            route: Arc::clone(route),
            leg_index,
            step_index,
            distance_remaining: route_remaining,
            leg_distance_remaining: leg_remaining,
            step_distance_remaining,
            current_step_points: Arc::clone(&self.current_step_points),
            upcoming_step_points: Arc::clone(&self.upcoming_step_points),
            intersections: Arc::clone(&self.intersections),
            intersection_distances: Arc::clone(&self.intersection_distances),
        }
    }
}

// ── Distance helpers ──────────────────────────────────────────────────────────

/// Current step remainder plus the full distance of every later step in the
/// leg.
fn leg_distance_remaining(
    step_distance_remaining: f64,
    leg_index: usize,
    step_index: usize,
    route: &Route,
) -> f64 {
    let steps = &route.legs[leg_index].steps;
    let later: f64 = steps[step_index + 1..].iter().map(|s| s.distance).sum();
    step_distance_remaining + later
}

/// Current leg remainder plus the full distance of every later leg.
fn route_distance_remaining(leg_distance_remaining: f64, leg_index: usize, route: &Route) -> f64 {
    let later: f64 = route.legs[leg_index + 1..].iter().map(|l| l.distance).sum();
    leg_distance_remaining + later
}

// ── Intersection helpers ──────────────────────────────────────────────────────

/// All intersections of the current step, bounded by the first intersection
/// of the upcoming step (the decision point at the maneuver itself).
fn intersections_list(current: &Step, upcoming: Option<&Step>) -> Vec<Intersection> {
    let mut list = current.intersections.clone();
    if let Some(first) = upcoming.and_then(|step| step.intersections.first()) {
        list.push(first.clone());
    }
    list
}

/// Cumulative metres along `points` to each intersection, parallel to
/// `intersections`.
fn distances_to_intersections(points: &[GeoPoint], intersections: &[Intersection]) -> Vec<f64> {
    intersections
        .iter()
        .map(|i| distance_along(points, i.location))
        .collect()
}
