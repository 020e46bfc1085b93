//! Polyline decoding, point snapping, and along-line distance computation.
//!
//! # Failure policy
//!
//! Malformed step geometry decodes to an **empty** point list rather than an
//! error.  Downstream distance computations then report zero remaining, which
//! forces a step advance — guidance keeps moving instead of stalling on bad
//! data.  Structural route errors (no legs, no steps) are the opposite: they
//! are rejected up front in [`crate::Route::validate`].

use log::warn;

use crate::GeoPoint;

/// Coordinate precision of encoded step geometries (directions API precision 6).
pub const POLYLINE_PRECISION: u32 = 6;

/// Decode an encoded polyline into an ordered point list.
///
/// Returns an empty `Vec` on malformed input (see module-level failure
/// policy).  Pure and deterministic: the same input always yields the same
/// points.
pub fn decode_polyline(encoded: &str) -> Vec<GeoPoint> {
    match polyline::decode_polyline(encoded, POLYLINE_PRECISION) {
        // geo-types stores (x, y) = (lon, lat).
        Ok(line) => line.0.into_iter().map(|c| GeoPoint::new(c.y, c.x)).collect(),
        Err(err) => {
            warn!("failed to decode step geometry, degrading to empty: {err}");
            Vec::new()
        }
    }
}

/// Project `fix` onto the nearest segment of `points`.
///
/// An empty `points` slice returns `fix` unchanged; a single point snaps to
/// that point.
pub fn snap_to_points(fix: GeoPoint, points: &[GeoPoint]) -> GeoPoint {
    match nearest_on_line(fix, points) {
        Some((_, snapped)) => snapped,
        None => fix,
    }
}

/// Metres from `point`'s projection on `points` to the end of `points`.
///
/// Returns `0.0` when the line has fewer than two points.
pub fn distance_remaining_along(point: GeoPoint, points: &[GeoPoint]) -> f64 {
    let Some((seg, snapped)) = nearest_on_line(point, points) else {
        return 0.0;
    };
    if points.len() < 2 {
        return 0.0;
    }

    let mut remaining = snapped.distance_m(points[seg + 1]);
    for pair in points[seg + 1..].windows(2) {
        remaining += pair[0].distance_m(pair[1]);
    }
    remaining
}

/// Cumulative metres from the start of `points` to `target`'s projection.
pub fn distance_along(points: &[GeoPoint], target: GeoPoint) -> f64 {
    let Some((seg, snapped)) = nearest_on_line(target, points) else {
        return 0.0;
    };
    if points.len() < 2 {
        return 0.0;
    }

    let mut traveled = 0.0;
    for pair in points[..=seg].windows(2) {
        traveled += pair[0].distance_m(pair[1]);
    }
    traveled + points[seg].distance_m(snapped)
}

/// `true` when `bearing` is within `tolerance` degrees of `expected`,
/// accounting for wrap-around at 0/360.
pub fn bearing_matches(bearing: f64, expected: f64, tolerance: f64) -> bool {
    angular_difference(bearing, expected) <= tolerance
}

/// Absolute angular difference between two bearings, in `[0, 180]`.
fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Nearest point on the line to `target`: `(segment_index, snapped_point)`.
///
/// `None` for an empty line; a one-point line snaps to that point with
/// segment index 0.
fn nearest_on_line(target: GeoPoint, points: &[GeoPoint]) -> Option<(usize, GeoPoint)> {
    match points {
        [] => None,
        [only] => Some((0, *only)),
        _ => {
            let mut best = (0, points[0]);
            let mut best_dist = f64::MAX;
            for (i, pair) in points.windows(2).enumerate() {
                let candidate = project_onto_segment(target, pair[0], pair[1]);
                let dist = target.distance_m(candidate);
                if dist < best_dist {
                    best = (i, candidate);
                    best_dist = dist;
                }
            }
            Some(best)
        }
    }
}

/// Project `p` onto the segment `a`→`b`, clamped to the segment ends.
///
/// Uses a local equirectangular plane centred on `a`.  Segments are tens to
/// hundreds of metres, where the planar approximation error is negligible.
fn project_onto_segment(p: GeoPoint, a: GeoPoint, b: GeoPoint) -> GeoPoint {
    let cos_lat = a.lat.to_radians().cos();

    // Planar coordinates in degrees, longitude scaled by cos(lat).
    let (px, py) = ((p.lon - a.lon) * cos_lat, p.lat - a.lat);
    let (bx, by) = ((b.lon - a.lon) * cos_lat, b.lat - a.lat);

    let seg_len_sq = bx * bx + by * by;
    if seg_len_sq == 0.0 {
        return a; // degenerate segment
    }

    let t = ((px * bx + py * by) / seg_len_sq).clamp(0.0, 1.0);
    GeoPoint::new(a.lat + t * by, a.lon + t * bx / cos_lat)
}
