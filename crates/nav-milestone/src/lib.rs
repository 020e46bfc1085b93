//! `nav-milestone` — one-shot navigation events evaluated over progress
//! snapshots.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`trigger`]   | `TriggerProperty`, `Statement` — stateless boolean triggers  |
//! | [`milestone`] | `Milestone` trait, `BasicMilestone`, `StepMilestone`         |
//! | [`voice`]     | `VoiceInstructionMilestone`, `InstructionCache`              |
//! | [`engine`]    | `MilestoneEngine` — registration + per-cycle evaluation      |
//!
//! # One-shot model
//!
//! Every milestone fires at most once per arming: trigger milestones latch
//! after their first firing, the step milestone is gated on the cursor
//! actually moving, and the voice milestone removes each instruction from
//! its queue as it is spoken.  A new active route resets everything — the
//! only cancellation semantic the engine has.

pub mod engine;
pub mod milestone;
pub mod trigger;
pub mod voice;

#[cfg(test)]
mod tests;

pub use engine::MilestoneEngine;
pub use milestone::{
    Announcement, BasicMilestone, Milestone, MilestoneNotification, StepMilestone,
};
pub use trigger::{Statement, TriggerProperty};
pub use voice::{InstructionCache, NoopInstructionCache, VoiceInstructionMilestone};
