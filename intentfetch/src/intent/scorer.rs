//! Ray-cast target scoring.
//!
//! Each eligible target is tested against a ray from the pointer along the
//! smoothed velocity:
//!
//! ```text
//!                      perp
//!   pointer ●─────────────┬──────────►  ray (unit direction)
//!            \  along     │
//!             \           │
//!              \ dist     ● target center
//! ```
//!
//! 1. Targets behind the pointer (`along < 0`) are skipped.
//! 2. Targets whose center lies outside an acceptance radius around the ray
//!    are a hard miss. The radius starts at half the target's larger side
//!    plus a margin and shrinks with distance, so far targets need tighter
//!    aim.
//! 3. Survivors score `along + perp * perp_weight`; lower is better. Absolute
//!    perpendicular offset is penalized rather than angle, so a close target
//!    far off-axis loses to a well-aimed target further away.
//!
//! Only the single best candidate is returned (winner-take-all). NaN never
//! wins: every comparison against NaN resolves to "not better".

use super::motion::Heading;
use super::target::Target;

/// Margin added to half the target's larger side.
pub const RADIUS_MARGIN: f64 = 30.0;

/// Constant added after distance scaling, so the radius never collapses.
pub const RADIUS_FLOOR: f64 = 20.0;

/// Distance over which the radius shrinks to its minimum factor.
pub const RADIUS_FALLOFF_DISTANCE: f64 = 1000.0;

/// Lower bound on the distance scaling factor.
pub const MIN_DISTANCE_FACTOR: f64 = 0.2;

/// A target that survived the geometric tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub target: &'a Target,
    /// Projection of the pointer→center vector onto the ray.
    pub along: f64,
    /// Distance of the center from the ray.
    pub perp: f64,
    /// Straight-line distance from pointer to center.
    pub distance: f64,
    /// `along + perp * perp_weight`.
    pub score: f64,
}

/// Why a target was not a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Miss {
    /// Center lies behind the pointer.
    Behind,
    /// Center lies outside the acceptance radius.
    OffAxis { perp: f64, radius: f64 },
}

/// Acceptance radius for a target of the given size at the given distance.
///
/// `(max(width, height) / 2 + 30) * max(0.2, 1 - distance / 1000) + 20`
pub fn acceptance_radius(width: f64, height: f64, distance: f64) -> f64 {
    let base = width.max(height) / 2.0 + RADIUS_MARGIN;
    let factor = MIN_DISTANCE_FACTOR.max(1.0 - distance / RADIUS_FALLOFF_DISTANCE);
    base * factor + RADIUS_FLOOR
}

/// Test one target against the heading.
pub fn evaluate<'a>(
    heading: &Heading,
    target: &'a Target,
    perp_weight: f64,
) -> Result<Candidate<'a>, Miss> {
    let to_center = target.rect.center() - heading.origin;
    let distance = to_center.length();

    let along = to_center.dot(heading.direction);
    if along < 0.0 {
        return Err(Miss::Behind);
    }

    let perp = (to_center - heading.direction.scale(along)).length();
    let radius = acceptance_radius(target.rect.width(), target.rect.height(), distance);
    if perp > radius {
        return Err(Miss::OffAxis { perp, radius });
    }

    Ok(Candidate {
        target,
        along,
        perp,
        distance,
        score: along + perp * perp_weight,
    })
}

/// Pick the lowest-scoring candidate among `targets`.
///
/// Ties keep the earlier target. Returns `None` when nothing survives.
pub fn select_winner<'a>(
    heading: &Heading,
    targets: &'a [Target],
    perp_weight: f64,
) -> Option<Candidate<'a>> {
    let mut best: Option<Candidate<'a>> = None;

    for target in targets {
        match evaluate(heading, target, perp_weight) {
            Ok(candidate) => {
                let is_better = match &best {
                    Some(current) => candidate.score < current.score,
                    None => candidate.score < f64::INFINITY,
                };
                if is_better {
                    best = Some(candidate);
                }
            }
            Err(miss) => {
                tracing::trace!(id = %target.id, ?miss, "Target missed");
            }
        }
    }

    best
}
