//! Frequency checks and run tallies.

use crate::{resolver::SpinResult, ring::Ring, types::Cents};
use serde::Serialize;

/// Pearson's chi-square statistic of `observed` counts against the
/// distribution implied by `weights`. Cells with zero expectation are skipped.
pub fn chi_square(observed: &[u64], weights: &[f64]) -> f64 {
    let n: u64 = observed.iter().sum();
    let total: f64 = weights.iter().sum();
    if n == 0 || total <= 0.0 {
        return 0.0;
    }
    observed
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w > 0.0)
        .map(|(o, w)| {
            let expected = n as f64 * w / total;
            let diff = *o as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Upper critical value of chi-square at p = 0.001 for 1..=10 degrees of freedom.
pub fn chi_square_critical_p001(dof: usize) -> Option<f64> {
    const TABLE: [f64; 10] = [
        10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.124, 27.877, 29.588,
    ];
    dof.checked_sub(1).and_then(|i| TABLE.get(i)).copied()
}

/// Per-ring hit counts plus money totals over a run of spins.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpinTally {
    pub spins: u64,
    pub outer_hits: Vec<u64>,
    pub inner_hits: Vec<u64>,
    pub total_staked: Cents,
    /// Sum of reported (unclamped) deltas.
    pub total_delta: Cents,
    pub wins: u64,
    pub losses: u64,
}

impl SpinTally {
    pub fn new(outer: &Ring, inner: &Ring) -> Self {
        Self {
            outer_hits: vec![0; outer.len()],
            inner_hits: vec![0; inner.len()],
            ..Self::default()
        }
    }

    pub fn record(&mut self, result: &SpinResult) {
        self.spins += 1;
        if let Some(c) = self.outer_hits.get_mut(result.outcome.outer.index) {
            *c += 1;
        }
        if let Some(c) = self.inner_hits.get_mut(result.outcome.inner.index) {
            *c += 1;
        }
        self.total_staked += result.stake;
        self.total_delta += result.settlement.delta;
        if result.settlement.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }

    /// Return to player: (stakes + deltas) / stakes.
    pub fn rtp(&self) -> f64 {
        if self.total_staked == 0 {
            return 0.0;
        }
        (self.total_staked + self.total_delta) as f64 / self.total_staked as f64
    }
}

/// Expected reported delta per unit of stake, from the ring weights alone.
pub fn expected_delta_per_stake(outer: &Ring, inner: &Ring) -> f64 {
    let outer_total: f64 = outer.weights().iter().sum();
    let inner_total: f64 = inner.weights().iter().sum();
    let mut ev = 0.0;
    for o in outer.segments() {
        for i in inner.segments() {
            let p = (o.weight / outer_total) * (i.weight / inner_total);
            let value = if o.multiplier.is_zero() {
                -i.multiplier.as_f64()
            } else {
                o.multiplier.as_f64() * i.multiplier.as_f64()
            };
            ev += p * value;
        }
    }
    ev
}
