//! The voice-instruction milestone and its per-step announcement queue.

use std::sync::Arc;

use log::debug;

use nav_core::{Route, Step, VoiceInstruction};
use nav_progress::RouteProgress;

use crate::{Announcement, Milestone};

/// Collaborator that pre-fetches announcement audio.
///
/// Fire-and-forget: the milestone never looks at the outcome, and a failing
/// cache must not disturb progress tracking.
pub trait InstructionCache {
    /// `is_first` is `true` on the first snapshot of a newly active route,
    /// letting the cache warm the whole route up front.
    fn cache_instructions(&mut self, progress: &RouteProgress, is_first: bool);
}

/// An [`InstructionCache`] that does nothing (no audio prefetching).
pub struct NoopInstructionCache;

impl InstructionCache for NoopInstructionCache {
    fn cache_instructions(&mut self, _progress: &RouteProgress, _is_first: bool) {}
}

/// Milestone that pops time-ordered spoken instructions as the step
/// remainder shrinks past each instruction's trigger distance.
///
/// Owns one queue per active trip — the queue is reloaded from the step on
/// every step change and cleared outright on reroute, so an instruction can
/// never fire twice for the same step occurrence.
pub struct VoiceInstructionMilestone {
    identifier: u32,
    current_route: Option<Arc<Route>>,
    current_step: Option<Step>,
    queue: Vec<VoiceInstruction>,
    queue_loaded: bool,
    announcement: Option<Announcement>,
    cache: Box<dyn InstructionCache>,
}

impl VoiceInstructionMilestone {
    pub fn new(identifier: u32) -> Self {
        Self::with_cache(identifier, Box::new(NoopInstructionCache))
    }

    pub fn with_cache(identifier: u32, cache: Box<dyn InstructionCache>) -> Self {
        Self {
            identifier,
            current_route: None,
            current_step: None,
            queue: Vec::new(),
            queue_loaded: false,
            announcement: None,
            cache,
        }
    }

    /// Instructions still queued for the current step.
    pub fn pending(&self) -> &[VoiceInstruction] {
        &self.queue
    }

    /// Route changed: all queued announcements belong to dead geometry.
    fn handle_new_route(&mut self, current: &RouteProgress) {
        self.queue.clear();
        self.queue_loaded = false;
        self.current_route = Some(Arc::clone(&current.route));
        self.cache.cache_instructions(current, true);
    }

    /// Reload the queue when the step changed or nothing was ever loaded.
    fn reload_queue_if_needed(&mut self, current: &RouteProgress) {
        let step = current.current_step();
        let step_changed = self.current_step.as_ref() != Some(step);
        if step_changed || !self.queue_loaded {
            self.queue = step.voice_instructions.clone();
            self.queue_loaded = true;
            self.current_step = Some(step.clone());
        }
    }

    fn is_new_route(&self, current: &RouteProgress) -> bool {
        match &self.current_route {
            Some(route) => current.is_new_route(route),
            None => true,
        }
    }
}

impl Milestone for VoiceInstructionMilestone {
    fn identifier(&self) -> u32 {
        self.identifier
    }

    fn is_occurring(&mut self, _previous: &RouteProgress, current: &RouteProgress) -> bool {
        if self.is_new_route(current) {
            self.handle_new_route(current);
        }
        self.reload_queue_if_needed(current);

        // An instruction is due once the step remainder has shrunk to at or
        // below the distance it was authored for.  Scan in order and remove
        // by index so the rest of the queue is untouched; at most one
        // instruction fires per cycle.
        let due = self
            .queue
            .iter()
            .position(|v| v.distance_along_geometry >= current.step_distance_remaining);

        match due {
            Some(index) => {
                let instruction = self.queue.remove(index);
                debug!(
                    "voicing instruction at {:.0} m remaining: {}",
                    current.step_distance_remaining, instruction.announcement
                );
                self.announcement = Some(Announcement {
                    text: instruction.announcement,
                    ssml: instruction.ssml_announcement,
                });
                self.cache.cache_instructions(current, false);
                true
            }
            None => false,
        }
    }

    fn on_new_route(&mut self, progress: &RouteProgress) {
        self.handle_new_route(progress);
    }

    fn announcement(&self) -> Option<Announcement> {
        self.announcement.clone()
    }
}
