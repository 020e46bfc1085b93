//! Engine configuration.

/// Tunables for the maneuver-completion test.
///
/// Typically constructed once per navigation session and passed by reference
/// into every processing cycle.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationOptions {
    /// Proximity threshold in metres: a step only completes once the
    /// remaining step distance has dropped below this radius.
    pub maneuver_zone_radius: f64,

    /// Bearing tolerance in degrees for the turn-completion check.
    pub max_turn_completion_offset: f64,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            maneuver_zone_radius: 40.0,
            max_turn_completion_offset: 30.0,
        }
    }
}
