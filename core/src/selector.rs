//! Weighted outcome selection.

use crate::rng::RandomSource;

/// Pick an index with probability `weights[i] / sum(weights)`.
///
/// Draws `r` uniformly from `[0, total)` and returns the first index whose
/// running sum exceeds `r`. If rounding leaves `r` past every running sum,
/// the last index is returned.
///
/// Callers must pass a non-empty table with a positive total; `Ring`
/// guarantees this for its own weights.
pub fn select_index<R: RandomSource + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    debug_assert!(!weights.is_empty(), "select_index called with an empty table");
    let total: f64 = weights.iter().sum();
    let roll = rng.next_uniform_fraction() * total;
    let mut cumulative = 0.0;
    for (i, weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return i;
        }
    }
    weights.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of fractions.
    struct Scripted(Vec<f64>);

    impl RandomSource for Scripted {
        fn next_uniform_fraction(&mut self) -> f64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn walks_cumulative_boundaries() {
        let weights = [72.0, 15.0, 7.0, 3.5, 1.5, 0.8, 0.2];
        let mut rng = Scripted(vec![0.0, 0.7199, 0.7201, 0.88, 0.9999]);
        assert_eq!(select_index(&weights, &mut rng), 0);
        assert_eq!(select_index(&weights, &mut rng), 0);
        assert_eq!(select_index(&weights, &mut rng), 1);
        assert_eq!(select_index(&weights, &mut rng), 2);
        assert_eq!(select_index(&weights, &mut rng), 6);
    }

    #[test]
    fn zero_weight_segments_are_never_chosen() {
        let weights = [0.0, 1.0, 0.0];
        let mut rng = Scripted(vec![0.0, 0.5, 0.9999]);
        for _ in 0..3 {
            assert_eq!(select_index(&weights, &mut rng), 1);
        }
    }

    #[test]
    fn overshoot_falls_back_to_last_index() {
        // A source returning exactly 1.0 is out of contract, but the pick
        // must still stay in range.
        let weights = [1.0, 1.0];
        let mut rng = Scripted(vec![1.0]);
        assert_eq!(select_index(&weights, &mut rng), 1);
    }
}
