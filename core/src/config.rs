use crate::{
    error::WheelResult,
    ring::{Multiplier, Ring, RingMotion, SpinDirection, INNER_ODDS, OUTER_ODDS},
    types::Cents,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Multiplier label, e.g. "0x" or "2.5x".
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingConfig {
    pub name: String,
    pub segments: Vec<SegmentConfig>,
    pub direction: SpinDirection,
    pub min_turns: u32,
    pub max_turns: u32,
    #[serde(default = "default_jitter_fraction")]
    pub jitter_fraction: f64,
}

fn default_jitter_fraction() -> f64 {
    RingMotion::DEFAULT_JITTER_FRACTION
}

impl RingConfig {
    /// Validate and build the ring. Fails fast on a bad label, odds table
    /// or motion.
    pub fn build(&self) -> WheelResult<Ring> {
        let table = self
            .segments
            .iter()
            .map(|s| Ok((Multiplier::parse_label(&s.label)?, s.weight)))
            .collect::<WheelResult<Vec<_>>>()?;
        Ring::new(
            self.name.clone(),
            table,
            RingMotion {
                direction: self.direction,
                min_turns: self.min_turns,
                max_turns: self.max_turns,
                jitter_fraction: self.jitter_fraction,
            },
        )
    }

    fn from_odds(
        name: &str,
        odds: &[(u32, f64)],
        direction: SpinDirection,
        min_turns: u32,
        max_turns: u32,
    ) -> Self {
        Self {
            name: name.into(),
            segments: odds
                .iter()
                .map(|(m, weight)| SegmentConfig {
                    label: Multiplier::whole(*m).to_string(),
                    weight: *weight,
                })
                .collect(),
            direction,
            min_turns,
            max_turns,
            jitter_fraction: RingMotion::DEFAULT_JITTER_FRACTION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfig {
    pub outer: RingConfig,
    pub inner: RingConfig,
    /// Delay between spin start and result disclosure.
    pub reveal_delay_ms: u64,
    /// Stake used when a spin request does not name one (cents).
    pub default_stake: Cents,
    /// Demo top-up amount (cents).
    pub deposit_amount: Cents,
    /// Credited on registration (cents).
    pub welcome_bonus: Cents,
}

impl WheelConfig {
    /// The reference game: canonical odds, 5 s reveal, 0.50 stake,
    /// 50.00 deposits, 10.00 welcome bonus.
    pub fn canonical() -> Self {
        Self {
            outer: RingConfig::from_odds("outer", &OUTER_ODDS, SpinDirection::Clockwise, 6, 9),
            inner: RingConfig::from_odds(
                "inner",
                &INNER_ODDS,
                SpinDirection::CounterClockwise,
                7,
                10,
            ),
            reveal_delay_ms: 5_000,
            default_stake: 50,
            deposit_amount: 5_000,
            welcome_bonus: 1_000,
        }
    }

    /// Load from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: WheelConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.build_rings()?;
        Ok(config)
    }

    /// Build (outer, inner).
    pub fn build_rings(&self) -> WheelResult<(Ring, Ring)> {
        Ok((self.outer.build()?, self.inner.build()?))
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self::canonical()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_config_builds_reference_rings() {
        let (outer, inner) = WheelConfig::canonical().build_rings().unwrap();
        assert_eq!(outer.labels(), Ring::outer().labels());
        assert_eq!(outer.weights(), Ring::outer().weights());
        assert_eq!(inner.motion(), Ring::inner().motion());
    }

    #[test]
    fn shipped_data_file_matches_canonical() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/wheel.json");
        let loaded = WheelConfig::load(path).unwrap();
        assert_eq!(loaded, WheelConfig::canonical());
    }

    #[test]
    fn bad_label_fails_at_build_time() {
        let mut config = WheelConfig::canonical();
        config.outer.segments[0].label = "zero".into();
        assert!(config.build_rings().is_err());
    }
}
