//! Random sources for the wheel.
//!
//! The engine only ever asks for a uniform fraction in [0, 1). Where that
//! fraction comes from is the caller's choice:
//!   - EntropySource: OS entropy, with a silent fallback to a wall-clock
//!     seeded PCG stream if the OS source fails.
//!   - SeededSource: a deterministic PCG stream derived from a master seed,
//!     used by the runner and by every test.

use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Uniform random fractions for weighted picks, turn counts and jitter.
pub trait RandomSource {
    /// Draw a float in [0.0, 1.0).
    fn next_uniform_fraction(&mut self) -> f64;

    /// Draw an integer in `min..=max`. Returns `min` when `max <= min`.
    fn next_u32_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as f64 + 1.0;
        let offset = (self.next_uniform_fraction() * span) as u32;
        (min + offset).min(max)
    }
}

/// 53 high-quality bits mapped onto [0, 1).
fn fraction_from_bits(bits: u64) -> f64 {
    (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// A named, deterministic PCG stream.
pub struct SeededSource {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SeededSource {
    /// Derive a stream from the master seed and a stable stream index.
    /// Different indices never share a stream for the same master seed.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }
}

impl RandomSource for SeededSource {
    fn next_uniform_fraction(&mut self) -> f64 {
        fraction_from_bits(self.inner.next_u64())
    }
}

/// OS entropy with a transparent pseudo-random fallback.
///
/// The primary generator defaults to `OsRng`. Once it reports an error the
/// source switches to the fallback stream for good.
pub struct EntropySource<P: RngCore = OsRng> {
    primary: P,
    fallback: Option<Pcg64Mcg>,
}

impl EntropySource<OsRng> {
    pub fn new() -> Self {
        Self::with_source(OsRng)
    }
}

impl<P: RngCore> EntropySource<P> {
    /// Draw from `primary` until it fails.
    pub fn with_source(primary: P) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// True once the primary source has failed and the fallback stream is in use.
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    fn fallback_u64(&mut self) -> u64 {
        let rng = self.fallback.get_or_insert_with(|| {
            let now = chrono::Utc::now();
            let nanos = now.timestamp_nanos_opt().unwrap_or_else(|| now.timestamp());
            Pcg64Mcg::seed_from_u64(nanos as u64)
        });
        rng.next_u64()
    }
}

impl Default for EntropySource<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: RngCore> RandomSource for EntropySource<P> {
    fn next_uniform_fraction(&mut self) -> f64 {
        if self.fallback.is_some() {
            return fraction_from_bits(self.fallback_u64());
        }
        let mut buf = [0u8; 8];
        match self.primary.try_fill_bytes(&mut buf) {
            Ok(()) => fraction_from_bits(u64::from_le_bytes(buf)),
            Err(e) => {
                log::warn!("OS entropy unavailable ({e}); falling back to pseudo-random source");
                fraction_from_bits(self.fallback_u64())
            }
        }
    }
}

/// Stable stream assignments for a seeded run.
/// Append only: reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Table = 0,
    Simulation = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Simulation => "simulation",
        }
    }
}

/// Hands out seeded streams for one master seed.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    pub fn for_slot(&self, slot: StreamSlot) -> SeededSource {
        SeededSource::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}
