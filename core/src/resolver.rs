//! Spin resolution: two independent draws, rotation targets, settlement.
//!
//! RANDOM DRAW ORDER (fixed, seeded runs depend on it):
//!   1. outer segment
//!   2. inner segment
//!   3. outer full turns, outer jitter
//!   4. inner full turns, inner jitter
//!
//! The resolver holds no spin-in-progress state. Callers must not start a
//! second spin on the same RotationState while one is still animating;
//! SpinTable enforces this.

use crate::{
    geometry::{advance_rotation, RotationState, RotationTarget},
    rng::RandomSource,
    ring::{Ring, Segment},
    selector::select_index,
    settlement::{settle, Settlement},
    types::Cents,
};
use serde::Serialize;

/// The segment each ring landed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinOutcome {
    pub outer: Segment,
    pub inner: Segment,
}

impl SpinOutcome {
    /// Build an outcome from already-drawn indices.
    /// Returns `None` if either index is out of range for its ring.
    pub fn from_indices(
        outer_ring: &Ring,
        inner_ring: &Ring,
        outer_index: usize,
        inner_index: usize,
    ) -> Option<Self> {
        Some(Self {
            outer: outer_ring.segment(outer_index)?.clone(),
            inner: inner_ring.segment(inner_index)?.clone(),
        })
    }
}

/// Everything the presentation layer and the wallet need from one spin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpinResult {
    pub stake: Cents,
    pub outcome: SpinOutcome,
    pub settlement: Settlement,
    pub outer_rotation: RotationTarget,
    pub inner_rotation: RotationTarget,
}

impl SpinResult {
    pub fn outer_label(&self) -> String {
        self.outcome.outer.label()
    }

    pub fn inner_label(&self) -> String {
        self.outcome.inner.label()
    }
}

/// Resolve one spin. Assumes a positive, affordable stake.
pub fn resolve_spin<R: RandomSource + ?Sized>(
    stake: Cents,
    outer_ring: &Ring,
    inner_ring: &Ring,
    rotation: &mut RotationState,
    rng: &mut R,
) -> SpinResult {
    let outer_index = select_index(outer_ring.weights(), rng);
    let inner_index = select_index(inner_ring.weights(), rng);
    resolve_drawn(stake, outer_ring, inner_ring, outer_index, inner_index, rotation, rng)
}

/// Resolve a spin whose segment draws are already known. Only geometry
/// consumes randomness here; the settlement is fixed by the indices.
///
/// Indices must come from `select_index` over the same rings; an
/// out-of-range index is clamped to the last segment.
pub fn resolve_drawn<R: RandomSource + ?Sized>(
    stake: Cents,
    outer_ring: &Ring,
    inner_ring: &Ring,
    outer_index: usize,
    inner_index: usize,
    rotation: &mut RotationState,
    rng: &mut R,
) -> SpinResult {
    let outer_index = outer_index.min(outer_ring.len() - 1);
    let inner_index = inner_index.min(inner_ring.len() - 1);
    let outcome = SpinOutcome {
        outer: outer_ring.segments()[outer_index].clone(),
        inner: inner_ring.segments()[inner_index].clone(),
    };
    let settlement = settle(stake, &outcome);

    let outer_rotation = advance_rotation(outer_ring, outer_index, &mut rotation.outer, rng);
    let inner_rotation = advance_rotation(inner_ring, inner_index, &mut rotation.inner, rng);

    log::debug!(
        "spin resolved: outer={} inner={} stake={stake} delta={} outer_target={:.2} inner_target={:.2}",
        outcome.outer.label(),
        outcome.inner.label(),
        settlement.delta,
        outer_rotation.target_degrees,
        inner_rotation.target_degrees,
    );

    SpinResult {
        stake,
        outcome,
        settlement,
        outer_rotation,
        inner_rotation,
    }
}
