//! Rotation geometry.
//!
//! Frame: a positive angle is a clockwise rotation of the ring. The pointer
//! is fixed at the top. Segment `k` occupies wheel angles
//! `[k·slice, (k+1)·slice)`, centred at `k·slice + slice/2`. After the ring
//! has rotated by `θ`, the pointer reads wheel angle `(−θ) mod 360`.
//!
//! RULE: the landing angle only depends on the chosen segment and the
//! jitter, never on where the ring started. The resting angle of the
//! previous spin is the base, full turns are added in the ring's direction,
//! and the remainder aligns the pointer onto the segment.

use crate::{
    ring::{Ring, SpinDirection},
    rng::RandomSource,
};
use serde::{Deserialize, Serialize};

/// Persistent rotation of one ring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RingRotation {
    /// Resting angle; the base of the next spin.
    pub cumulative_degrees: f64,
    /// Angle the most recent spin animates to.
    pub target_degrees: f64,
}

/// Rotation of both rings. Owned by the caller, threaded into every spin.
/// Only reset at process start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationState {
    pub outer: RingRotation,
    pub inner: RingRotation,
}

/// A computed rotation for one ring: where it starts, where it stops, and
/// how it got there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationTarget {
    pub from_degrees: f64,
    pub target_degrees: f64,
    pub full_turns: u32,
    pub jitter_degrees: f64,
}

/// Reduce an angle into [0, 360).
pub fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Wheel angle under the top pointer after rotating by `rotation_degrees`.
pub fn pointer_angle(rotation_degrees: f64) -> f64 {
    normalize_degrees(-rotation_degrees)
}

/// Index of the segment under the pointer for a ring of `segment_count`.
/// `None` for an empty ring.
pub fn segment_under_pointer(rotation_degrees: f64, segment_count: usize) -> Option<usize> {
    let last = segment_count.checked_sub(1)?;
    let slice = 360.0 / segment_count as f64;
    let index = (pointer_angle(rotation_degrees) / slice) as usize;
    Some(index.min(last))
}

/// Centre of segment `index` in wheel degrees.
pub fn segment_center(index: usize, segment_count: usize) -> f64 {
    let slice = 360.0 / segment_count as f64;
    index as f64 * slice + slice / 2.0
}

/// Compute the rotation that lands `ring` on segment `index`.
///
/// `full_turns` is drawn from the ring's turn range; `jitter` is uniform in
/// `[-bound, bound)` where `bound = jitter_fraction · slice/2`.
pub fn rotation_target<R: RandomSource + ?Sized>(
    ring: &Ring,
    index: usize,
    from_degrees: f64,
    rng: &mut R,
) -> RotationTarget {
    let motion = ring.motion();
    let slice = ring.slice_degrees();
    let full_turns = rng.next_u32_inclusive(motion.min_turns, motion.max_turns);
    let bound = motion.jitter_fraction * slice / 2.0;
    let jitter_degrees = (rng.next_uniform_fraction() * 2.0 - 1.0) * bound;

    // Rotation (mod 360) that puts centre + jitter offset under the pointer.
    let aligned = normalize_degrees(-(segment_center(index, ring.len())) + jitter_degrees);
    let turns = full_turns as f64 * 360.0;
    let target_degrees = match motion.direction {
        SpinDirection::Clockwise => {
            from_degrees + turns + normalize_degrees(aligned - from_degrees)
        }
        SpinDirection::CounterClockwise => {
            from_degrees - turns - normalize_degrees(from_degrees - aligned)
        }
    };

    RotationTarget {
        from_degrees,
        target_degrees,
        full_turns,
        jitter_degrees,
    }
}

/// Compute the target from the ring's resting angle and persist it.
pub fn advance_rotation<R: RandomSource + ?Sized>(
    ring: &Ring,
    index: usize,
    rotation: &mut RingRotation,
    rng: &mut R,
) -> RotationTarget {
    let target = rotation_target(ring, index, rotation.cumulative_degrees, rng);
    rotation.target_degrees = target.target_degrees;
    rotation.cumulative_degrees = target.target_degrees;
    target
}
