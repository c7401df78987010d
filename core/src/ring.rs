//! Rings and segments.
//!
//! A ring is an immutable, validated list of weighted segments plus the
//! motion parameters used when it spins. Validation happens once, here;
//! nothing at spin time re-checks the odds table.

use crate::error::{WheelError, WheelResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative multiplier stored in hundredths: `2x` is 200, `2.5x` is 250.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ZERO: Multiplier = Multiplier(0);

    pub const fn whole(n: u32) -> Self {
        Self(n * 100)
    }

    pub const fn from_hundredths(h: u32) -> Self {
        Self(h)
    }

    pub fn hundredths(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Parse a label such as `0x`, `15x`, `2.5x` or `1.25x`.
    pub fn parse_label(label: &str) -> WheelResult<Self> {
        let invalid = || WheelError::InvalidLabel { label: label.to_string() };
        let body = label.trim().strip_suffix(|c: char| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let (whole, frac) = match body.split_once('.') {
            Some((w, f)) => (w, f),
            None => (body, ""),
        };
        if whole.is_empty() || frac.len() > 2 {
            return Err(invalid());
        }
        if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u32 = whole.parse().map_err(|_| invalid())?;
        let frac: u32 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u32>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{whole}x")
        } else if frac % 10 == 0 {
            write!(f, "{whole}.{}x", frac / 10)
        } else {
            write!(f, "{whole}.{frac:02}x")
        }
    }
}

/// One wedge of a ring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub multiplier: Multiplier,
    pub weight: f64,
}

impl Segment {
    pub fn label(&self) -> String {
        self.multiplier.to_string()
    }
}

/// Which way a ring turns. Clockwise rotation is a positive angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpinDirection {
    Clockwise,
    CounterClockwise,
}

impl SpinDirection {
    pub fn sign(&self) -> f64 {
        match self {
            Self::Clockwise => 1.0,
            Self::CounterClockwise => -1.0,
        }
    }
}

/// How a ring moves during a spin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingMotion {
    pub direction: SpinDirection,
    pub min_turns: u32,
    pub max_turns: u32,
    /// Bound on |jitter| as a fraction of half a slice width. Must be < 1.
    pub jitter_fraction: f64,
}

impl RingMotion {
    pub const DEFAULT_JITTER_FRACTION: f64 = 0.3;

    fn validate(&self, ring: &str) -> WheelResult<()> {
        let invalid = |reason: &str| WheelError::InvalidMotion {
            ring: ring.to_string(),
            reason: reason.to_string(),
        };
        if self.min_turns == 0 {
            return Err(invalid("min_turns must be at least 1"));
        }
        if self.max_turns < self.min_turns {
            return Err(invalid("max_turns must not be below min_turns"));
        }
        if !self.jitter_fraction.is_finite() || !(0.0..1.0).contains(&self.jitter_fraction) {
            return Err(invalid("jitter_fraction must be in [0, 1)"));
        }
        Ok(())
    }
}

/// An immutable, validated ring.
#[derive(Debug, Clone, Serialize)]
pub struct Ring {
    name: String,
    segments: Vec<Segment>,
    weights: Vec<f64>,
    motion: RingMotion,
}

/// Canonical outer ring: multiplier label and weight (percent).
pub const OUTER_ODDS: [(u32, f64); 7] = [
    (0, 72.0),
    (2, 15.0),
    (5, 7.0),
    (10, 3.5),
    (15, 1.5),
    (20, 0.8),
    (50, 0.2),
];

/// Canonical inner ring.
pub const INNER_ODDS: [(u32, f64); 4] = [(1, 65.0), (2, 25.0), (3, 8.0), (4, 2.0)];

impl Ring {
    /// Build a ring from (multiplier, weight) pairs in segment order.
    /// Fails fast on an empty table, a negative or non-finite weight,
    /// or weights that sum to zero.
    pub fn new(
        name: impl Into<String>,
        table: Vec<(Multiplier, f64)>,
        motion: RingMotion,
    ) -> WheelResult<Self> {
        let name = name.into();
        let invalid = |reason: String| WheelError::InvalidOddsTable {
            ring: name.clone(),
            reason,
        };
        if table.is_empty() {
            return Err(invalid("ring has no segments".into()));
        }
        for (i, (_, w)) in table.iter().enumerate() {
            if !w.is_finite() || *w < 0.0 {
                return Err(invalid(format!("segment {i} has invalid weight {w}")));
            }
        }
        let total: f64 = table.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(invalid("weights sum to zero".into()));
        }
        motion.validate(&name)?;

        let segments: Vec<Segment> = table
            .into_iter()
            .enumerate()
            .map(|(index, (multiplier, weight))| Segment { index, multiplier, weight })
            .collect();
        let weights = segments.iter().map(|s| s.weight).collect();
        Ok(Self { name, segments, weights, motion })
    }

    /// The reference outer ring: 0x..50x, clockwise, 6–9 full turns.
    pub fn outer() -> Self {
        Self::canonical(
            "outer",
            &OUTER_ODDS,
            RingMotion {
                direction: SpinDirection::Clockwise,
                min_turns: 6,
                max_turns: 9,
                jitter_fraction: RingMotion::DEFAULT_JITTER_FRACTION,
            },
        )
    }

    /// The reference inner ring: 1x..4x, counter-clockwise, 7–10 full turns.
    pub fn inner() -> Self {
        Self::canonical(
            "inner",
            &INNER_ODDS,
            RingMotion {
                direction: SpinDirection::CounterClockwise,
                min_turns: 7,
                max_turns: 10,
                jitter_fraction: RingMotion::DEFAULT_JITTER_FRACTION,
            },
        )
    }

    // The canonical tables are constants known to be valid.
    fn canonical(name: &str, odds: &[(u32, f64)], motion: RingMotion) -> Self {
        let segments: Vec<Segment> = odds
            .iter()
            .enumerate()
            .map(|(index, (m, weight))| Segment {
                index,
                multiplier: Multiplier::whole(*m),
                weight: *weight,
            })
            .collect();
        let weights = segments.iter().map(|s| s.weight).collect();
        Self { name: name.to_string(), segments, weights, motion }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn motion(&self) -> &RingMotion {
        &self.motion
    }

    pub fn labels(&self) -> Vec<String> {
        self.segments.iter().map(Segment::label).collect()
    }

    /// Angular width of one segment in degrees.
    pub fn slice_degrees(&self) -> f64 {
        360.0 / self.segments.len() as f64
    }
}
