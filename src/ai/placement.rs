//! Automatic unit deployment for AI opponents
//!
//! Random mode scatters units with bounded retries. Strategic mode
//! places high-value units first near the center, keeps the rest off
//! the outer ring, and drops each mine into the quadrant holding the
//! fewest. Every path falls back to an exhaustive scan so a legal spot
//! is never missed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::{Position, Rotation};
use crate::grid::placement::place_unit;
use crate::grid::Field;
use crate::units::UnitKind;

const RANDOM_ATTEMPTS: u32 = 100;
const TARGETED_ATTEMPTS: u32 = 50;
/// Priority at and above which a unit is placed near the center
const CENTER_PRIORITY: u32 = 70;
const CENTER_JITTER: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementMode {
    Random,
    Strategic,
}

/// Deploy `units` onto `field`. Units that cannot fit anywhere are
/// skipped with a warning.
pub fn place_units<R: Rng>(
    field: &mut Field,
    units: &[UnitKind],
    mode: PlacementMode,
    rng: &mut R,
) {
    match mode {
        PlacementMode::Random => {
            for &kind in units {
                place_one_random(field, kind, rng);
            }
        }
        PlacementMode::Strategic => place_strategic(field, units, rng),
    }
}

/// Strategic placement priority. Bigger and more valuable units go
/// down first while the board is still open.
pub fn placement_priority(kind: UnitKind) -> u32 {
    match kind {
        UnitKind::GiantAirship => 100,
        UnitKind::AircraftCarrier => 90,
        UnitKind::Ferrari => 80,
        UnitKind::PassengerPlane => 70,
        UnitKind::Mine => 10,
        _ => 50,
    }
}

fn place_strategic<R: Rng>(field: &mut Field, units: &[UnitKind], rng: &mut R) {
    let mut ordered: Vec<UnitKind> = units.to_vec();
    ordered.sort_by_key(|&kind| std::cmp::Reverse(placement_priority(kind)));

    for kind in ordered {
        let placed = if kind.is_mine() {
            place_in_quadrant(field, kind, least_mined_quadrant(field), rng)
        } else if placement_priority(kind) >= CENTER_PRIORITY {
            place_near_center(field, kind, rng)
        } else {
            place_off_edge(field, kind, rng)
        };
        if !placed {
            place_one_random(field, kind, rng);
        }
    }
}

fn try_place<R: Rng>(
    field: &mut Field,
    kind: UnitKind,
    attempts: u32,
    mut candidate: impl FnMut(&mut R) -> Position,
    rng: &mut R,
) -> bool {
    for _ in 0..attempts {
        let anchor = candidate(rng);
        let rotation = Rotation::ALL[rng.gen_range(0..4)];
        if place_unit(field, kind, anchor, rotation).is_ok() {
            return true;
        }
    }
    false
}

fn place_one_random<R: Rng>(field: &mut Field, kind: UnitKind, rng: &mut R) {
    let size = field.size;
    let random_pos = move |rng: &mut R| {
        Position::new(rng.gen_range(0..size.width), rng.gen_range(0..size.height))
    };
    if try_place(field, kind, RANDOM_ATTEMPTS, random_pos, rng) {
        return;
    }
    if !place_anywhere(field, kind) {
        warn!(kind = ?kind, "no legal placement found, unit skipped");
    }
}

fn place_near_center<R: Rng>(field: &mut Field, kind: UnitKind, rng: &mut R) -> bool {
    let center = field.size.center();
    let jittered = move |rng: &mut R| {
        Position::new(
            center.x + rng.gen_range(-CENTER_JITTER..=CENTER_JITTER),
            center.y + rng.gen_range(-CENTER_JITTER..=CENTER_JITTER),
        )
    };
    try_place(field, kind, TARGETED_ATTEMPTS, jittered, rng)
}

/// Anywhere except the outer ring
fn place_off_edge<R: Rng>(field: &mut Field, kind: UnitKind, rng: &mut R) -> bool {
    let size = field.size;
    if size.width <= 2 || size.height <= 2 {
        return false;
    }
    let inner = move |rng: &mut R| {
        Position::new(
            rng.gen_range(1..size.width - 1),
            rng.gen_range(1..size.height - 1),
        )
    };
    try_place(field, kind, TARGETED_ATTEMPTS, inner, rng)
}

/// The quadrant currently holding the fewest mines. Counts come from
/// the board itself, so random fallback placements are accounted for.
fn least_mined_quadrant(field: &Field) -> usize {
    let (half_w, half_h) = (field.size.width / 2, field.size.height / 2);
    let mut counts = [0usize; 4];
    for unit in field.placed_units.iter().filter(|u| u.kind.is_mine()) {
        let q = match (unit.position.x >= half_w, unit.position.y >= half_h) {
            (false, false) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (true, true) => 3,
        };
        counts[q] += 1;
    }
    counts
        .iter()
        .enumerate()
        .min_by_key(|&(_, &count)| count)
        .map(|(q, _)| q)
        .unwrap_or(0)
}

fn place_in_quadrant<R: Rng>(
    field: &mut Field,
    kind: UnitKind,
    quadrant: usize,
    rng: &mut R,
) -> bool {
    let size = field.size;
    let (half_w, half_h) = (size.width / 2, size.height / 2);
    let (x0, x1, y0, y1) = match quadrant {
        0 => (0, half_w, 0, half_h),
        1 => (half_w, size.width, 0, half_h),
        2 => (0, half_w, half_h, size.height),
        _ => (half_w, size.width, half_h, size.height),
    };
    let in_quadrant =
        move |rng: &mut R| Position::new(rng.gen_range(x0..x1), rng.gen_range(y0..y1));
    try_place(field, kind, TARGETED_ATTEMPTS, in_quadrant, rng)
}

/// Exhaustive fallback: first legal anchor and rotation in scan order
fn place_anywhere(field: &mut Field, kind: UnitKind) -> bool {
    for y in 0..field.size.height {
        for x in 0..field.size.width {
            for rotation in Rotation::ALL {
                if place_unit(field, kind, Position::new(x, y), rotation).is_ok() {
                    return true;
                }
            }
        }
    }
    false
}
