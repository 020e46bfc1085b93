//! `nav-progress` — route-progress snapshots and the per-fix processor.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`progress`]  | `RouteProgress` — immutable per-fix snapshot                  |
//! | [`processor`] | `RouteProcessor` + `OffRouteAdvanceHandle`                    |
//! | [`observer`]  | `ProcessorObserver` — maneuver-change hook for detectors      |
//!
//! # Processing model
//!
//! One [`RouteProcessor`] tracks one active route:
//!
//! 1. Every fix first runs the reroute check: a structurally different route
//!    resets the cursor to the first step and rebuilds all decoded state.
//! 2. A pending off-route advance (requested through
//!    [`OffRouteAdvanceHandle`], possibly from another thread) is consumed.
//! 3. The maneuver-completion test runs: the step completes when the heading
//!    matches the maneuver's exit bearing *and* the traveler is inside the
//!    maneuver zone, or unconditionally once the step remainder hits zero
//!    with a non-matching heading (forced advance).
//! 4. A fresh [`RouteProgress`] is assembled and published.
//!
//! Milestone evaluation over consecutive snapshots lives in `nav-milestone`.

pub mod observer;
pub mod processor;
pub mod progress;


pub use observer::{NoopProcessorObserver, ProcessorObserver};
pub use processor::{OffRouteAdvanceHandle, RouteProcessor};
pub use progress::RouteProgress;
