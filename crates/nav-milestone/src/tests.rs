//! Unit tests for nav-milestone.

use std::sync::Arc;

use nav_core::{GeoPoint, Leg, Route, Step, StepManeuver, VoiceInstruction};
use nav_progress::RouteProgress;

use crate::{
    Announcement, BasicMilestone, Milestone, MilestoneEngine, Statement, StepMilestone,
    TriggerProperty, VoiceInstructionMilestone,
};

// ── Fixtures ──────────────────────────────────────────────────────────────────

fn instruction(distance: f64, text: &str) -> VoiceInstruction {
    VoiceInstruction {
        distance_along_geometry: distance,
        announcement: text.to_string(),
        ssml_announcement: format!("<speak>{text}</speak>"),
    }
}

/// A 300 m step carrying two instructions: "B" is due at 200 m remaining,
/// "A" at 40 m.
fn step_with_instructions(lon_start: f64) -> Step {
    let line: geo_types::LineString<f64> =
        [(lon_start, 0.0), (lon_start + 0.0027, 0.0)].into_iter().collect();
    Step {
        geometry: polyline::encode_coordinates(line, 6).unwrap(),
        distance: 300.0,
        maneuver: StepManeuver {
            location: GeoPoint::new(0.0, lon_start + 0.0027),
            bearing_after: 90.0,
        },
        voice_instructions: vec![instruction(40.0, "A"), instruction(200.0, "B")],
        intersections: Vec::new(),
    }
}

/// Single leg, two steps, both with instruction queues.
fn voice_route() -> Arc<Route> {
    let steps = vec![step_with_instructions(0.0), step_with_instructions(0.0027)];
    Arc::new(Route {
        distance: steps.iter().map(|s| s.distance).sum(),
        legs: vec![Leg {
            distance: steps.iter().map(|s| s.distance).sum(),
            steps,
        }],
    })
}

/// A structurally different route (content change ⇒ reroute).
fn other_route() -> Arc<Route> {
    let mut route = (*voice_route()).clone();
    route.legs[0].steps[0].distance = 299.0;
    Arc::new(route)
}

/// Hand-built snapshot; milestone evaluation only reads indices, distances,
/// and the route reference.
fn snapshot(route: &Arc<Route>, step_index: usize, step_remaining: f64) -> RouteProgress {
    RouteProgress {
        route: Arc::clone(route),
        leg_index: 0,
        step_index,
        distance_remaining: step_remaining,
        leg_distance_remaining: step_remaining,
        step_distance_remaining: step_remaining,
        current_step_points: Arc::new(Vec::new()),
        upcoming_step_points: Arc::new(Vec::new()),
        intersections: Arc::new(Vec::new()),
        intersection_distances: Arc::new(Vec::new()),
    }
}

// ── Trigger statements ────────────────────────────────────────────────────────

#[cfg(test)]
mod trigger {
    use super::*;

    #[test]
    fn comparisons() {
        let route = voice_route();
        let prev = snapshot(&route, 0, 250.0);
        let cur = snapshot(&route, 0, 150.0);

        use Statement::*;
        use TriggerProperty::*;
        assert!(Gt(StepDistanceTotalMeters, 100.0).is_occurring(&prev, &cur));
        assert!(Lt(StepDistanceRemainingMeters, 200.0).is_occurring(&prev, &cur));
        assert!(!Lte(StepDistanceRemainingMeters, 100.0).is_occurring(&prev, &cur));
        assert!(Gte(StepDistanceTraveledMeters, 150.0).is_occurring(&prev, &cur));
        assert!(Eq(StepIndex, 0.0).is_occurring(&prev, &cur));
    }

    #[test]
    fn combinators() {
        let route = voice_route();
        let prev = snapshot(&route, 0, 250.0);
        let cur = snapshot(&route, 0, 150.0);

        use Statement::*;
        use TriggerProperty::*;
        let holds = Gt(StepDistanceTotalMeters, 100.0);
        let fails = Lt(StepDistanceTotalMeters, 100.0);

        assert!(All(vec![holds.clone(), Gte(StepIndex, 0.0)]).is_occurring(&prev, &cur));
        assert!(!All(vec![holds.clone(), fails.clone()]).is_occurring(&prev, &cur));
        assert!(Any(vec![fails.clone(), holds.clone()]).is_occurring(&prev, &cur));
        assert!(!Any(vec![fails]).is_occurring(&prev, &cur));
        assert!(All(vec![]).is_occurring(&prev, &cur));
        assert!(!Any(vec![]).is_occurring(&prev, &cur));
    }

    #[test]
    fn new_step_property() {
        let route = voice_route();
        let at_step0 = snapshot(&route, 0, 50.0);
        let at_step1 = snapshot(&route, 1, 300.0);

        let moved = Statement::Eq(TriggerProperty::NewStep, 1.0);
        assert!(moved.is_occurring(&at_step0, &at_step1));
        assert!(!moved.is_occurring(&at_step0, &at_step0));
    }
}

// ── Trigger-based milestones ──────────────────────────────────────────────────

#[cfg(test)]
mod milestones {
    use super::*;

    #[test]
    fn basic_fires_exactly_once_while_statement_holds() {
        let route = voice_route();
        let prev = snapshot(&route, 0, 250.0);
        let cur = snapshot(&route, 0, 150.0);

        let mut m = BasicMilestone::new(
            7,
            Statement::Lt(TriggerProperty::StepDistanceRemainingMeters, 200.0),
        );
        assert_eq!(m.identifier(), 7);
        assert!(m.is_occurring(&prev, &cur));
        // Statement still holds on later cycles; the latch keeps it quiet.
        assert!(!m.is_occurring(&cur, &snapshot(&route, 0, 100.0)));
    }

    #[test]
    fn basic_rearms_on_new_route() {
        let route = voice_route();
        let cur = snapshot(&route, 0, 150.0);
        let mut m = BasicMilestone::new(
            7,
            Statement::Lt(TriggerProperty::StepDistanceRemainingMeters, 200.0),
        );
        assert!(m.is_occurring(&snapshot(&route, 0, 250.0), &cur));

        let rerouted = other_route();
        m.on_new_route(&snapshot(&rerouted, 0, 299.0));
        assert!(m.is_occurring(
            &snapshot(&rerouted, 0, 299.0),
            &snapshot(&rerouted, 0, 150.0)
        ));
    }

    #[test]
    fn step_milestone_fires_on_cursor_move_only() {
        let route = voice_route();
        let at_step0 = snapshot(&route, 0, 20.0);
        let at_step1 = snapshot(&route, 1, 300.0);

        let mut m = StepMilestone::new(3);
        assert!(!m.is_occurring(&at_step0, &at_step0));
        assert!(m.is_occurring(&at_step0, &at_step1));
        assert!(!m.is_occurring(&at_step1, &at_step1));
    }

    #[test]
    fn step_milestone_gate() {
        let route = voice_route();
        let at_step0 = snapshot(&route, 0, 20.0);
        let at_step1 = snapshot(&route, 1, 300.0);

        let mut gated = StepMilestone::with_gate(
            4,
            Statement::Gt(TriggerProperty::StepDistanceTotalMeters, 500.0),
        );
        // Cursor moved but the gate (step longer than 500 m) fails.
        assert!(!gated.is_occurring(&at_step0, &at_step1));
    }

    #[test]
    fn step_milestone_ignores_reroute_reset() {
        let route = voice_route();
        let rerouted = other_route();

        let mut m = StepMilestone::new(3);
        // Cursor "moved" from (0,1) to (0,0), but only because the route
        // changed — no step was completed.
        assert!(!m.is_occurring(
            &snapshot(&route, 1, 20.0),
            &snapshot(&rerouted, 0, 300.0)
        ));
    }

    #[test]
    fn notification_carries_identifier_and_indices() {
        let route = voice_route();
        let cur = snapshot(&route, 1, 120.0);
        let m = StepMilestone::new(3);
        let n = m.build_notification(&cur);
        assert_eq!(n.identifier, 3);
        assert_eq!((n.leg_index, n.step_index), (0, 1));
        assert!(n.announcement.is_none());
    }
}

// ── Voice instruction milestone ───────────────────────────────────────────────

#[cfg(test)]
mod voice {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::InstructionCache;

    /// Records every `cache_instructions` call's `is_first` flag.
    struct RecordingCache(Rc<RefCell<Vec<bool>>>);

    impl InstructionCache for RecordingCache {
        fn cache_instructions(&mut self, _progress: &RouteProgress, is_first: bool) {
            self.0.borrow_mut().push(is_first);
        }
    }

    #[test]
    fn approaching_step_fires_b_then_a_exactly_once() {
        let route = voice_route();
        let mut m = VoiceInstructionMilestone::new(1);

        // 250 m remaining: nothing due yet.
        let s250 = snapshot(&route, 0, 250.0);
        assert!(!m.is_occurring(&s250, &s250));

        // 190 m remaining: first drop to ≤ 200 fires "B".
        let s190 = snapshot(&route, 0, 190.0);
        assert!(m.is_occurring(&s250, &s190));
        let announcement = m.announcement().unwrap();
        assert_eq!(announcement.text, "B");
        assert_eq!(announcement.ssml, "<speak>B</speak>");

        // 35 m remaining: "A" fires; "B" is gone from the queue.
        let s35 = snapshot(&route, 0, 35.0);
        assert!(m.is_occurring(&s190, &s35));
        assert_eq!(m.announcement().unwrap().text, "A");

        // Queue exhausted: total firings = 2.
        assert!(m.pending().is_empty());
        assert!(!m.is_occurring(&s35, &snapshot(&route, 0, 1.0)));
    }

    #[test]
    fn at_most_one_instruction_per_cycle() {
        let route = voice_route();
        let mut m = VoiceInstructionMilestone::new(1);

        // Jumping straight to 35 m makes both instructions due; only the
        // first match ("A", at queue position 0) fires this cycle.
        let s35 = snapshot(&route, 0, 35.0);
        assert!(m.is_occurring(&s35, &s35));
        assert_eq!(m.announcement().unwrap().text, "A");
        assert_eq!(m.pending().len(), 1);

        // The survivor fires next cycle.
        assert!(m.is_occurring(&s35, &s35));
        assert_eq!(m.announcement().unwrap().text, "B");
        assert!(m.pending().is_empty());
    }

    #[test]
    fn queue_reloads_on_step_change() {
        let route = voice_route();
        let mut m = VoiceInstructionMilestone::new(1);

        let s35 = snapshot(&route, 0, 35.0);
        assert!(m.is_occurring(&s35, &s35)); // drains "A" on step 0

        // Cursor moves to step 1: fresh queue from that step's instructions.
        let next = snapshot(&route, 1, 300.0);
        assert!(!m.is_occurring(&s35, &next)); // nothing due at 300 m
        assert_eq!(m.pending().len(), 2);
    }

    #[test]
    fn reroute_clears_queue_and_recaches() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut m = VoiceInstructionMilestone::with_cache(
            1,
            Box::new(RecordingCache(Rc::clone(&calls))),
        );

        let route = voice_route();
        let s190 = snapshot(&route, 0, 190.0);
        assert!(m.is_occurring(&s190, &s190)); // fires "B"
        assert_eq!(*calls.borrow(), vec![true, false]); // route warm-up + fire

        // New route: queue rebuilt from the new step, so "B" is due again.
        let rerouted = other_route();
        let fresh = snapshot(&rerouted, 0, 190.0);
        assert!(m.is_occurring(&s190, &fresh));
        assert_eq!(m.announcement().unwrap().text, "B");
        assert_eq!(*calls.borrow(), vec![true, false, true, false]);
    }
}

// ── Milestone engine ──────────────────────────────────────────────────────────

#[cfg(test)]
mod engine {
    use super::*;

    fn remaining_below(identifier: u32, threshold: f64) -> Box<BasicMilestone> {
        Box::new(BasicMilestone::new(
            identifier,
            Statement::Lt(TriggerProperty::StepDistanceRemainingMeters, threshold),
        ))
    }

    #[test]
    fn fires_in_registration_order() {
        let mut engine = MilestoneEngine::new();
        engine.register(remaining_below(20, 200.0));
        engine.register(remaining_below(10, 200.0));
        assert_eq!(engine.len(), 2);

        let route = voice_route();
        let fired = engine.check_milestones(
            &snapshot(&route, 0, 250.0),
            &snapshot(&route, 0, 150.0),
        );
        let ids: Vec<u32> = fired.iter().map(|n| n.identifier).collect();
        assert_eq!(ids, vec![20, 10]);
    }

    #[test]
    fn duplicate_identifier_ignored() {
        let mut engine = MilestoneEngine::new();
        engine.register(remaining_below(10, 200.0));
        engine.register(remaining_below(10, 100.0));
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn one_shot_until_new_route() {
        let mut engine = MilestoneEngine::new();
        engine.register(remaining_below(10, 200.0));

        let route = voice_route();
        let prev = snapshot(&route, 0, 250.0);
        let cur = snapshot(&route, 0, 150.0);

        assert_eq!(engine.check_milestones(&prev, &cur).len(), 1);
        assert!(engine.was_occurring(10));

        // Still below the threshold: no re-fire.
        let later = snapshot(&route, 0, 100.0);
        assert!(engine.check_milestones(&cur, &later).is_empty());
        assert!(!engine.was_occurring(10));

        // Reroute re-arms everything.
        let rerouted = other_route();
        let fresh = snapshot(&rerouted, 0, 150.0);
        assert_eq!(engine.check_milestones(&later, &fresh).len(), 1);
    }

    #[test]
    fn voice_milestone_notification_has_announcement() {
        let mut engine = MilestoneEngine::new();
        engine.register(Box::new(VoiceInstructionMilestone::new(1)));

        let route = voice_route();
        let fired = engine.check_milestones(
            &snapshot(&route, 0, 250.0),
            &snapshot(&route, 0, 190.0),
        );
        assert_eq!(fired.len(), 1);
        assert_eq!(
            fired[0].announcement,
            Some(Announcement {
                text: "B".to_string(),
                ssml: "<speak>B</speak>".to_string(),
            })
        );
    }

    #[test]
    fn consecutive_voice_firings_both_delivered() {
        let mut engine = MilestoneEngine::new();
        engine.register(Box::new(VoiceInstructionMilestone::new(1)));

        let route = voice_route();
        let s250 = snapshot(&route, 0, 250.0);
        let s190 = snapshot(&route, 0, 190.0);
        let s35 = snapshot(&route, 0, 35.0);

        // Two back-to-back occurring cycles must both notify — the voice
        // queue, not an engine latch, provides the exactly-once guarantee.
        assert_eq!(engine.check_milestones(&s250, &s190).len(), 1);
        let second = engine.check_milestones(&s190, &s35);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].announcement.as_ref().unwrap().text, "A");
    }
}
