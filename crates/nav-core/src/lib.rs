//! `nav-core` — foundational types for the turn-by-turn guidance engine.
//!
//! This crate is a dependency of every other `nav-*` crate.  It intentionally
//! has no `nav-*` dependencies and minimal external ones (`polyline`, `log`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`geo`]      | `GeoPoint`, haversine distance, forward azimuth           |
//! | [`geometry`] | Polyline decode, snapping, along-line distances, bearings |
//! | [`route`]    | `Route` / `Leg` / `Step` / `VoiceInstruction` / `Fix`     |
//! | [`indices`]  | `NavigationIndices` — the `(leg, step)` cursor            |
//! | [`options`]  | `NavigationOptions`                                       |
//! | [`error`]    | `NavError`, `NavResult`                                   |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod geo;
pub mod geometry;
pub mod indices;
pub mod options;
pub mod route;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NavError, NavResult};
pub use geo::GeoPoint;
pub use indices::NavigationIndices;
pub use options::NavigationOptions;
pub use route::{Fix, Intersection, Leg, Route, Step, StepManeuver, VoiceInstruction};
