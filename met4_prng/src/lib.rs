// Injectable random source for the MET4 codex.
//
// Every stochastic decision in synthetic text generation (flavor injection,
// fragmentation rolls, capitalization rolls, seed selection) draws from a
// `RandomSource` passed in by the caller. Nothing in the codex touches
// ambient or OS randomness, so a fixed seed reproduces a generation run
// byte for byte.
//
// Two implementations:
// - `CodexRng`: xoshiro256++ (Blackman & Vigna, 2019) seeded via SplitMix64.
//   Hand-rolled so output is identical across platforms and toolchains.
// - `ReplaySource`: replays a scripted list of unit-interval values, for tests
//   that need to force a particular roll outcome.
//
// Determinism constraint: `CodexRng::next_u64` uses only integer arithmetic.
// The float helpers derive from it with exact bit manipulation.

use serde::{Deserialize, Serialize};

/// A source of uniform random draws.
///
/// Implementors provide `next_u64`; the remaining methods are derived from
/// it and should not normally be overridden, since generation output depends
/// on the exact number and order of draws.
pub trait RandomSource {
    /// Next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform `f64` in [0, 1), built from the upper 53 bits.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)`.
    ///
    /// Multiply-shift mapping: the draw is scaled onto the span, so the
    /// result is monotone in the underlying value and never loops. Bias is at
    /// most `span / 2^64`. Panics if `low >= high`.
    fn range_usize(&mut self, low: usize, high: usize) -> usize {
        assert!(low < high, "range_usize: low must be less than high");
        let span = (high - low) as u128;
        low + ((self.next_u64() as u128 * span) >> 64) as usize
    }

    /// `true` with probability `p`. `p <= 0` never fires, `p >= 1` always does.
    fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Seedable xoshiro256++ generator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CodexRng {
    s: [u64; 4],
}

impl CodexRng {
    /// Create a generator from a `u64` seed.
    ///
    /// SplitMix64 expands the seed into the 256-bit state, so nearby seeds
    /// (0, 1, 2, ...) still produce unrelated streams.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }
}

impl RandomSource for CodexRng {
    fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

/// SplitMix64 step, used only for seeding.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Replays a fixed script of unit-interval values, cycling when exhausted.
///
/// Each scripted value `v` in [0, 1) is encoded so that `next_f64` returns
/// `v` exactly (up to 53-bit precision). Handy for pinning down a single
/// roll: `ReplaySource::new(vec![0.0])` makes every roll land at the bottom
/// of its range, `vec![0.999]` near the top.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplaySource {
    /// Panics if `values` is empty.
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "ReplaySource needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplaySource {
    fn next_u64(&mut self) -> u64 {
        let v = self.values[self.cursor % self.values.len()].clamp(0.0, 1.0 - f64::EPSILON);
        self.cursor += 1;
        ((v * (1u64 << 53) as f64) as u64) << 11
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = CodexRng::new(42);
        let mut b = CodexRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = CodexRng::new(42);
        let mut b = CodexRng::new(43);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn f64_in_unit_range() {
        let mut rng = CodexRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "f64 out of range: {v}");
        }
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = CodexRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(5, 15);
            assert!((5..15).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn range_usize_reaches_every_value() {
        let mut rng = CodexRng::new(7);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            seen[rng.range_usize(0, 3)] = true;
        }
        assert!(seen.iter().all(|&s| s), "expected all of 0..3, saw {seen:?}");
    }

    #[test]
    fn random_bool_distribution() {
        let mut rng = CodexRng::new(42);
        let n = 10_000;
        let hits = (0..n).filter(|_| rng.random_bool(0.25)).count();
        let pct = hits as f64 / n as f64;
        assert!(
            (0.22..0.28).contains(&pct),
            "random_bool(0.25) should be ~25%, got {:.1}%",
            pct * 100.0
        );
    }

    #[test]
    fn random_bool_extremes() {
        let mut rng = CodexRng::new(42);
        for _ in 0..100 {
            assert!(!rng.random_bool(0.0));
            assert!(rng.random_bool(1.0));
        }
    }

    #[test]
    fn serialization_resumes_stream() {
        let mut rng = CodexRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: CodexRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }

    #[test]
    fn replay_returns_scripted_values() {
        let mut src = ReplaySource::new(vec![0.0, 0.5, 0.75]);
        assert_eq!(src.next_f64(), 0.0);
        assert_eq!(src.next_f64(), 0.5);
        assert_eq!(src.next_f64(), 0.75);
        // Cycles back to the start.
        assert_eq!(src.next_f64(), 0.0);
        assert_eq!(src.draws(), 4);
    }

    #[test]
    fn replay_clamps_out_of_range() {
        let mut src = ReplaySource::new(vec![1.5, -0.2]);
        let hi = src.next_f64();
        assert!(hi < 1.0 && hi > 0.99);
        assert_eq!(src.next_f64(), 0.0);
    }

    #[test]
    fn replay_forces_range_choice() {
        // The draw scales onto the span: 0.0 is the first slot, 0.5 the middle.
        let mut src = ReplaySource::new(vec![0.0, 0.5, 0.99]);
        assert_eq!(src.range_usize(0, 3), 0);
        assert_eq!(src.range_usize(0, 3), 1);
        assert_eq!(src.range_usize(0, 3), 2);
    }
}
