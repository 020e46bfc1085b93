//! The route data model consumed by the progress engine.
//!
//! Routes are **already-deserialized input** — this crate owns no wire format.
//! All types derive `PartialEq` because *structural equality is the reroute
//! detector*: two fetches of "the same" route compare equal only when
//! content-identical, and the processor resets the instant the active route
//! stops comparing equal to the held one.

use crate::{GeoPoint, NavError, NavResult};

/// A full directions route: ordered legs plus total distance in metres.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub legs: Vec<Leg>,
    pub distance: f64,
}

impl Route {
    /// Reject structurally unusable routes before any processing starts.
    ///
    /// A route with zero legs, or any leg with zero steps, cannot degrade
    /// gracefully the way bad geometry can — it is surfaced as an error so
    /// the navigation session can halt instead of emitting a corrupt
    /// snapshot.
    pub fn validate(&self) -> NavResult<()> {
        if self.legs.is_empty() {
            return Err(NavError::EmptyRoute);
        }
        for (leg_index, leg) in self.legs.iter().enumerate() {
            if leg.steps.is_empty() {
                return Err(NavError::EmptyLeg { leg_index });
            }
        }
        Ok(())
    }

    #[inline]
    pub fn leg(&self, leg_index: usize) -> Option<&Leg> {
        self.legs.get(leg_index)
    }

    /// Convenience lookup for a step by `(leg_index, step_index)`.
    #[inline]
    pub fn step(&self, leg_index: usize, step_index: usize) -> Option<&Step> {
        self.legs.get(leg_index)?.steps.get(step_index)
    }
}

/// A portion of a route between two waypoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub steps: Vec<Step>,
    pub distance: f64,
}

impl Leg {
    #[inline]
    pub fn step(&self, step_index: usize) -> Option<&Step> {
        self.steps.get(step_index)
    }
}

/// A single maneuver-to-maneuver segment with its own encoded geometry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Encoded polyline (precision 6); decode via
    /// [`crate::geometry::decode_polyline`].
    pub geometry: String,
    pub distance: f64,
    pub maneuver: StepManeuver,
    /// Announcements for this step, ordered by increasing
    /// `distance_along_geometry`.
    pub voice_instructions: Vec<VoiceInstruction>,
    pub intersections: Vec<Intersection>,
}

/// The maneuver that *ends* a step: where it happens and the heading the
/// traveler should hold immediately after completing it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepManeuver {
    pub location: GeoPoint,
    /// Degrees clockwise from true north.
    pub bearing_after: f64,
}

/// One spoken announcement, authored as "speak this when
/// `distance_along_geometry` metres of the step remain ahead of you".
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoiceInstruction {
    pub distance_along_geometry: f64,
    /// Plain text, suitable for a text-to-speech engine.
    pub announcement: String,
    /// Markup-annotated text (SSML) for voice APIs that support it.
    pub ssml_announcement: String,
}

/// A point along a step where roads diverge — reported as an upcoming
/// decision point, never used for advancement decisions.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection {
    pub location: GeoPoint,
}

/// A single position fix from the device location source.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    pub location: GeoPoint,
    /// Heading in degrees clockwise from true north.
    pub bearing: f64,
}

impl Fix {
    #[inline]
    pub fn new(lat: f64, lon: f64, bearing: f64) -> Self {
        Self {
            location: GeoPoint::new(lat, lon),
            bearing,
        }
    }
}
