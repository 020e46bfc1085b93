//! guided-trip — smallest runnable demo of the guidance pipeline.
//!
//! Builds a synthetic two-leg route along the equator, then replays a stream
//! of position fixes driving east through it.  Every fix runs the full
//! cycle: route processor → fresh progress snapshot → milestone engine →
//! printed notifications (spoken instructions and step completions).
//!
//! Run with `RUST_LOG=debug` to watch the processor's internal transitions.

use std::sync::Arc;

use anyhow::Result;

use nav_core::{
    Fix, GeoPoint, Leg, NavigationOptions, Route, Step, StepManeuver, VoiceInstruction,
};
use nav_milestone::{MilestoneEngine, StepMilestone, VoiceInstructionMilestone};
use nav_progress::{RouteProcessor, RouteProgress};

// ── Constants ─────────────────────────────────────────────────────────────────

const VOICE_MILESTONE_ID: u32 = 1;
const STEP_MILESTONE_ID: u32 = 2;

/// Degrees of longitude per step at the equator (~333 m).
const STEP_SPAN_DEG: f64 = 0.003;
/// Fix spacing (~22 m).
const FIX_SPACING_DEG: f64 = 0.0002;

// ── Route fixture ─────────────────────────────────────────────────────────────

fn encode(points: &[(f64, f64)]) -> String {
    let line: geo_types::LineString<f64> =
        points.iter().map(|&(lat, lon)| (lon, lat)).collect();
    polyline::encode_coordinates(line, 6).expect("fixture coordinates encode")
}

fn east_step(lon_start: f64, name: &str) -> Step {
    let lon_end = lon_start + STEP_SPAN_DEG;
    let distance = GeoPoint::new(0.0, lon_start).distance_m(GeoPoint::new(0.0, lon_end));
    Step {
        geometry: encode(&[(0.0, lon_start), (0.0, lon_end)]),
        distance,
        maneuver: StepManeuver {
            location: GeoPoint::new(0.0, lon_end),
            bearing_after: 90.0,
        },
        voice_instructions: vec![
            VoiceInstruction {
                distance_along_geometry: 60.0,
                announcement: format!("Turn onto {name} now"),
                ssml_announcement: format!("<speak>Turn onto {name} now</speak>"),
            },
            VoiceInstruction {
                distance_along_geometry: 200.0,
                announcement: format!("In 200 meters, turn onto {name}"),
                ssml_announcement: format!("<speak>In 200 meters, turn onto {name}</speak>"),
            },
        ],
        intersections: Vec::new(),
    }
}

/// Two legs, two steps each, end to end along the equator.
fn build_route() -> Arc<Route> {
    let names = [["Oak Street", "Pine Avenue"], ["Elm Drive", "Main Street"]];
    let mut legs = Vec::new();
    let mut lon = 0.0;
    for leg_names in names {
        let steps: Vec<Step> = leg_names
            .iter()
            .enumerate()
            .map(|(i, name)| east_step(lon + i as f64 * STEP_SPAN_DEG, name))
            .collect();
        lon += leg_names.len() as f64 * STEP_SPAN_DEG;
        legs.push(Leg {
            distance: steps.iter().map(|s| s.distance).sum(),
            steps,
        });
    }
    Arc::new(Route {
        distance: legs.iter().map(|l| l.distance).sum(),
        legs,
    })
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let route = build_route();
    route.validate()?;
    let options = NavigationOptions::default();

    println!("=== guided-trip — turn-by-turn guidance demo ===");
    println!(
        "Route: {} legs, {} steps, {:.0} m",
        route.legs.len(),
        route.legs.iter().map(|l| l.steps.len()).sum::<usize>(),
        route.distance
    );
    println!();

    let mut processor = RouteProcessor::new();
    let mut engine = MilestoneEngine::new();
    engine.register(Box::new(VoiceInstructionMilestone::new(VOICE_MILESTONE_ID)));
    engine.register(Box::new(StepMilestone::new(STEP_MILESTONE_ID)));

    let total_span = STEP_SPAN_DEG * 4.0;
    let fix_count = (total_span / FIX_SPACING_DEG) as usize + 1;

    let mut previous: Option<RouteProgress> = None;
    for i in 0..fix_count {
        let fix = Fix::new(0.0, i as f64 * FIX_SPACING_DEG, 90.0);
        let progress = processor.process_fix(&route, &options, fix)?;

        if let Some(prev) = &previous {
            for notification in engine.check_milestones(prev, &progress) {
                match (notification.identifier, &notification.announcement) {
                    (VOICE_MILESTONE_ID, Some(announcement)) => {
                        println!(
                            "[{:>5.0} m remaining]  say: {}",
                            progress.step_distance_remaining, announcement.text
                        );
                    }
                    _ => {
                        println!(
                            "[{:>5.0} m remaining]  step complete → leg {} step {}",
                            progress.step_distance_remaining,
                            notification.leg_index,
                            notification.step_index
                        );
                    }
                }
            }
        }
        previous = Some(progress);
    }

    let last = processor.last_progress().expect("fixes were processed");
    println!();
    println!(
        "Arrived: {:.0} m remaining on leg {} step {}",
        last.distance_remaining, last.leg_index, last.step_index
    );
    Ok(())
}
