//! Landing geometry: every target lands inside its segment, and the wheel
//! always moves forward by at least the minimum number of full turns.

use luxspin_core::{
    geometry::{pointer_angle, rotation_target, segment_center, segment_under_pointer, RotationState},
    resolver::resolve_spin,
    ring::Ring,
    rng::{RandomSource, SeededSource},
};

const EPS: f64 = 1e-6;

fn assert_lands_inside(ring: &Ring, rng: &mut SeededSource) {
    let slice = ring.slice_degrees();
    let bound = ring.motion().jitter_fraction * slice / 2.0;
    for k in 0..ring.len() {
        for _ in 0..100 {
            let from = (rng.next_uniform_fraction() - 0.5) * 20_000.0;
            let t = rotation_target(ring, k, from, rng);
            let landing = pointer_angle(t.target_degrees);
            let lo = k as f64 * slice;
            let hi = lo + slice;
            assert!(
                landing > lo + EPS && landing < hi - EPS,
                "{} segment {k}: landing {landing:.6} outside ({lo}, {hi})",
                ring.name()
            );
            assert_eq!(segment_under_pointer(t.target_degrees, ring.len()), Some(k));
            assert!(
                (landing - segment_center(k, ring.len())).abs() <= bound + EPS,
                "jitter exceeded bound"
            );
            assert!(t.jitter_degrees.abs() <= bound);
        }
    }
}

#[test]
fn outer_targets_land_strictly_inside_segment() {
    let mut rng = SeededSource::new(0x5EED, 0);
    assert_lands_inside(&Ring::outer(), &mut rng);
}

#[test]
fn inner_targets_land_strictly_inside_segment() {
    let mut rng = SeededSource::new(0x5EED, 1);
    assert_lands_inside(&Ring::inner(), &mut rng);
}

#[test]
fn turn_counts_stay_in_configured_range() {
    let outer = Ring::outer();
    let inner = Ring::inner();
    let mut rng = SeededSource::new(77, 0);
    for _ in 0..500 {
        let t = rotation_target(&outer, 3, 0.0, &mut rng);
        assert!((6..=9).contains(&t.full_turns));
        let t = rotation_target(&inner, 1, 0.0, &mut rng);
        assert!((7..=10).contains(&t.full_turns));
    }
}

#[test]
fn consecutive_spins_advance_in_ring_direction() {
    let outer = Ring::outer();
    let inner = Ring::inner();
    let mut rotation = RotationState::default();
    let mut rng = SeededSource::new(31337, 0);

    for _ in 0..200 {
        let before = rotation;
        let result = resolve_spin(100, &outer, &inner, &mut rotation, &mut rng);

        let outer_step = result.outer_rotation.target_degrees - before.outer.cumulative_degrees;
        assert!(outer_step >= 6.0 * 360.0 - EPS, "outer step {outer_step}");
        assert!(outer_step < 10.0 * 360.0, "outer step {outer_step}");

        // Inner spins the other way.
        let inner_step = before.inner.cumulative_degrees - result.inner_rotation.target_degrees;
        assert!(inner_step >= 7.0 * 360.0 - EPS, "inner step {inner_step}");
        assert!(inner_step < 11.0 * 360.0, "inner step {inner_step}");

        assert_eq!(result.outer_rotation.from_degrees, before.outer.cumulative_degrees);
        assert_eq!(rotation.outer.cumulative_degrees, result.outer_rotation.target_degrees);
        assert_eq!(rotation.inner.target_degrees, result.inner_rotation.target_degrees);

        assert_eq!(
            segment_under_pointer(rotation.outer.cumulative_degrees, outer.len()),
            Some(result.outcome.outer.index)
        );
        assert_eq!(
            segment_under_pointer(rotation.inner.cumulative_degrees, inner.len()),
            Some(result.outcome.inner.index)
        );
    }
}
