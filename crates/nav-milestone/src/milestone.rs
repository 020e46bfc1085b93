//! The `Milestone` trait and its trigger-driven variants.

use nav_progress::RouteProgress;

use crate::Statement;

/// The spoken payload of a voice milestone firing.
#[derive(Clone, Debug, PartialEq)]
pub struct Announcement {
    /// Plain text for a text-to-speech engine.
    pub text: String,
    /// The same announcement with SSML markup.
    pub ssml: String,
}

/// Fire-and-forget payload handed to the delivery sink when a milestone
/// fires.  The engine neither retries nor suppresses based on what the sink
/// does with it.
#[derive(Clone, Debug, PartialEq)]
pub struct MilestoneNotification {
    pub identifier: u32,
    pub leg_index: usize,
    pub step_index: usize,
    /// Present only for voice milestones.
    pub announcement: Option<Announcement>,
}

/// A one-shot condition-triggered navigation event.
///
/// Implementations own whatever state their one-shot guarantee needs (a
/// fired latch, an instruction queue); the engine only asks two questions
/// per cycle — "are you occurring?" and, if so, "what is your notification?"
pub trait Milestone {
    fn identifier(&self) -> u32;

    /// Evaluate against the previous and current snapshot.  Returning `true`
    /// fires the milestone this cycle.
    fn is_occurring(&mut self, previous: &RouteProgress, current: &RouteProgress) -> bool;

    /// Reset hook: the active route changed, all armed state is void.
    fn on_new_route(&mut self, _progress: &RouteProgress) {}

    /// The spoken payload for the most recent firing, if this variant speaks.
    fn announcement(&self) -> Option<Announcement> {
        None
    }

    fn build_notification(&self, current: &RouteProgress) -> MilestoneNotification {
        MilestoneNotification {
            identifier: self.identifier(),
            leg_index: current.leg_index,
            step_index: current.step_index,
            announcement: self.announcement(),
        }
    }
}

// ── BasicMilestone ────────────────────────────────────────────────────────────

/// A milestone wrapping a bare [`Statement`].
///
/// Fires the first cycle its statement holds, then stays quiet until a new
/// route resets it — the statement itself is stateless and may keep holding
/// on later cycles.
pub struct BasicMilestone {
    identifier: u32,
    trigger: Statement,
    fired: bool,
}

impl BasicMilestone {
    pub fn new(identifier: u32, trigger: Statement) -> Self {
        Self {
            identifier,
            trigger,
            fired: false,
        }
    }
}

impl Milestone for BasicMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&mut self, previous: &RouteProgress, current: &RouteProgress) -> bool {
        if self.fired {
            return false;
        }
        if self.trigger.is_occurring(previous, current) {
            self.fired = true;
            return true;
        }
        false
    }

    fn on_new_route(&mut self, _progress: &RouteProgress) {
        self.fired = false;
    }
}

// ── StepMilestone ─────────────────────────────────────────────────────────────

/// Fires every time the cursor moves to a new step, optionally gated by an
/// extra statement (e.g. "only for steps longer than 100 m").
///
/// Self-limiting: the cursor moves at most once per cycle, so no latch is
/// needed beyond the step transition itself.
pub struct StepMilestone {
    identifier: u32,
    gate: Option<Statement>,
}

impl StepMilestone {
    pub fn new(identifier: u32) -> Self {
        Self {
            identifier,
            gate: None,
        }
    }

    pub fn with_gate(identifier: u32, gate: Statement) -> Self {
        Self {
            identifier,
            gate: Some(gate),
        }
    }
}

impl Milestone for StepMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&mut self, previous: &RouteProgress, current: &RouteProgress) -> bool {
        // A reroute resets the cursor; that is not a completed step.
        if previous.is_new_route(&current.route) {
            return false;
        }
        let moved = previous.step_index != current.step_index
            || previous.leg_index != current.leg_index;
        if !moved {
            return false;
        }
        self.gate
            .as_ref()
            .is_none_or(|gate| gate.is_occurring(previous, current))
    }
}
