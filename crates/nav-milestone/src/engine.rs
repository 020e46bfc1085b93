//! Milestone registration and per-cycle evaluation.

use std::sync::Arc;

use log::{debug, warn};
use rustc_hash::FxHashMap;

use nav_core::Route;
use nav_progress::RouteProgress;

use crate::{Milestone, MilestoneNotification};

/// Evaluates every registered milestone against each new snapshot pair and
/// collects the notifications of those that fire.
///
/// Firing order follows registration order.  Notifications are
/// fire-and-forget: the engine hands them to the caller and never retries or
/// suppresses based on delivery outcome.
#[derive(Default)]
pub struct MilestoneEngine {
    milestones: Vec<Box<dyn Milestone>>,
    /// Last evaluation result per milestone identifier.
    last_occurring: FxHashMap<u32, bool>,
    /// Route the previous cycle ran against; a structural change resets all
    /// milestone state before evaluation.
    last_route: Option<Arc<Route>>,
}

impl MilestoneEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a milestone.  Identifiers must be unique; a duplicate is
    /// ignored with a warning.
    pub fn register(&mut self, milestone: Box<dyn Milestone>) {
        let id = milestone.identifier();
        if self.last_occurring.contains_key(&id) {
            warn!("milestone identifier {id} already registered, ignoring");
            return;
        }
        self.last_occurring.insert(id, false);
        self.milestones.push(milestone);
    }

    pub fn len(&self) -> usize {
        self.milestones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.milestones.is_empty()
    }

    /// Whether `identifier` was occurring on the most recent cycle.
    pub fn was_occurring(&self, identifier: u32) -> bool {
        self.last_occurring.get(&identifier).copied().unwrap_or(false)
    }

    /// Evaluate all milestones against `(previous, current)` and return the
    /// notifications of those that fire this cycle, in registration order.
    pub fn check_milestones(
        &mut self,
        previous: &RouteProgress,
        current: &RouteProgress,
    ) -> Vec<MilestoneNotification> {
        self.reset_on_new_route(current);

        let mut fired = Vec::new();
        for milestone in &mut self.milestones {
            let id = milestone.identifier();
            let occurring = milestone.is_occurring(previous, current);
            if occurring {
                debug!("milestone {id} fired at {} m remaining", current.step_distance_remaining);
                fired.push(milestone.build_notification(current));
            }
            self.last_occurring.insert(id, occurring);
        }
        fired
    }

    /// A new active route cancels all armed milestone state instantaneously.
    fn reset_on_new_route(&mut self, current: &RouteProgress) {
        let changed = match &self.last_route {
            Some(route) => current.is_new_route(route),
            None => true,
        };
        if !changed {
            return;
        }

        self.last_route = Some(Arc::clone(&current.route));
        for milestone in &mut self.milestones {
            milestone.on_new_route(current);
        }
        for state in self.last_occurring.values_mut() {
            *state = false;
        }
    }
}
