//! Settlement arithmetic: loss amplification, wins, purity.

use luxspin_core::{
    geometry::RotationState,
    resolver::{resolve_drawn, SpinOutcome},
    ring::{Multiplier, Ring},
    rng::SeededSource,
    settlement::{settle, settle_multipliers, SettlementKind},
    wallet::{apply_settlement, MemoryWallet},
};

fn outcome(outer_label: &str, inner_label: &str) -> SpinOutcome {
    let outer = Ring::outer();
    let inner = Ring::inner();
    let oi = outer.labels().iter().position(|l| l == outer_label).unwrap();
    let ii = inner.labels().iter().position(|l| l == inner_label).unwrap();
    SpinOutcome::from_indices(&outer, &inner, oi, ii).unwrap()
}

#[test]
fn zero_outer_with_4x_inner_loses_four_stakes() {
    let s = settle(100, &outcome("0x", "4x"));
    assert_eq!(s.kind, SettlementKind::Loss);
    assert_eq!(s.delta, -400);
}

#[test]
fn zero_outer_with_1x_inner_loses_the_stake() {
    let s = settle(50, &outcome("0x", "1x"));
    assert_eq!(s.delta, -50);
}

#[test]
fn win_multiplies_both_rings() {
    assert_eq!(settle(100, &outcome("5x", "3x")).delta, 1_500);
    assert_eq!(settle(50, &outcome("50x", "2x")).delta, 5_000);
    assert!(settle(50, &outcome("2x", "1x")).is_win());
}

#[test]
fn every_loss_is_at_least_the_stake() {
    let inner = Ring::inner();
    for seg in inner.segments() {
        let s = settle_multipliers(75, Multiplier::ZERO, seg.multiplier);
        assert!(s.delta <= -75, "{} loss {} smaller than stake", seg.label(), s.delta);
    }
}

#[test]
fn identical_draws_settle_identically() {
    let outer = Ring::outer();
    let inner = Ring::inner();
    for (oi, ii) in [(0, 3), (2, 2), (6, 1)] {
        let mut rot_a = RotationState::default();
        let mut rot_b = RotationState::default();
        // Different geometry streams must not change the settlement.
        let mut rng_a = SeededSource::new(1, 0);
        let mut rng_b = SeededSource::new(2, 0);
        let a = resolve_drawn(100, &outer, &inner, oi, ii, &mut rot_a, &mut rng_a);
        let b = resolve_drawn(100, &outer, &inner, oi, ii, &mut rot_b, &mut rng_b);
        assert_eq!(a.settlement, b.settlement);
        assert_eq!(a.outcome, b.outcome);
    }
}

#[test]
fn amplified_loss_is_reported_unclamped_but_balance_floors() {
    let s = settle(100, &outcome("0x", "4x"));
    let mut wallet = MemoryWallet::new(250);
    let applied = apply_settlement(&mut wallet, &s).unwrap();
    assert_eq!(s.delta, -400);
    assert_eq!(applied, -250);
    assert_eq!(wallet.balance(), 0);
}
