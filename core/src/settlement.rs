//! Settlement arithmetic.
//!
//! RULE: settlement is pure. Same stake and same outcome, same delta.
//!   - Outer 0x: the inner ring becomes a loss multiplier,
//!     delta = −(stake × inner). A 4x inner costs four stakes.
//!   - Otherwise: delta = +(stake × outer × inner).
//!
//! The reported delta is never clamped. Only the balance it is applied to
//! is floored at zero (see wallet.rs).

use crate::{
    resolver::SpinOutcome,
    ring::Multiplier,
    types::Cents,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub kind: SettlementKind,
    /// Signed balance change in cents.
    pub delta: Cents,
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        self.kind == SettlementKind::Win
    }
}

/// `amount × m₁ × m₂ × …` with multipliers in hundredths, rounded half away
/// from zero to the cent.
fn scale(amount: Cents, multipliers: &[Multiplier]) -> Cents {
    let mut num = amount as i128;
    let mut den: i128 = 1;
    for m in multipliers {
        num *= m.hundredths() as i128;
        den *= 100;
    }
    let half = den / 2;
    let rounded = if num >= 0 { (num + half) / den } else { (num - half) / den };
    rounded.clamp(Cents::MIN as i128, Cents::MAX as i128) as Cents
}

/// Settle a stake against an outer/inner multiplier pair.
pub fn settle_multipliers(stake: Cents, outer: Multiplier, inner: Multiplier) -> Settlement {
    if outer.is_zero() {
        Settlement {
            kind: SettlementKind::Loss,
            delta: -scale(stake, &[inner]),
        }
    } else {
        Settlement {
            kind: SettlementKind::Win,
            delta: scale(stake, &[outer, inner]),
        }
    }
}

/// Settle a stake against a resolved outcome.
pub fn settle(stake: Cents, outcome: &SpinOutcome) -> Settlement {
    settle_multipliers(stake, outcome.outer.multiplier, outcome.inner.multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_multipliers_round_to_the_cent() {
        // 0.33 × 2.5 = 0.825 → 0.83
        let s = settle_multipliers(33, Multiplier::whole(1), Multiplier::from_hundredths(250));
        assert_eq!(s.delta, 83);
        let s = settle_multipliers(33, Multiplier::ZERO, Multiplier::from_hundredths(250));
        assert_eq!(s.delta, -83);
    }
}
