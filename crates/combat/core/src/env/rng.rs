//! Injectable randomness for combat resolution.
//!
//! Every probabilistic decision in a battle (hit check, crit check, skill and
//! equipment activation rolls, turn-order tie-break) draws from a
//! [`RandomSource`] handed to the engine by the caller. Nothing in the crate
//! touches a global RNG, so a battle is fully reproducible from its seed.
//!
//! # Draw discipline
//!
//! [`RandomSource::chance`] always consumes exactly one draw, even when the
//! probability is `<= 0` or `>= 1`. This keeps replays aligned when a catalog
//! value changes between a certain and an uncertain outcome.

/// Source of uniformly distributed random values.
pub trait RandomSource {
    /// Returns a value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Single Bernoulli trial with success probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        let roll = self.next_f64();
        if !p.is_finite() || p <= 0.0 {
            return false;
        }
        roll < p
    }

    /// Uniform coin flip.
    fn coin_flip(&mut self) -> bool {
        self.next_f64() < 0.5
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Stateful PCG-XSH-RR stream: 64-bit state, 32-bit output per step.
/// Same seed, same sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PcgRandom {
    state: u64,
}

impl PcgRandom {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: Self::pcg_step(seed.wrapping_add(Self::INCREMENT)),
        }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        let old = self.state;
        self.state = Self::pcg_step(old);
        Self::pcg_output(old)
    }
}

impl RandomSource for PcgRandom {
    fn next_f64(&mut self) -> f64 {
        // 53 bits of mantissa from two outputs
        let hi = (self.next_u32() as u64) << 21;
        let lo = (self.next_u32() as u64) >> 11;
        ((hi | lo) as f64) / ((1u64 << 53) as f64)
    }
}

/// Always returns the same roll.
///
/// `FixedRandom(0.0)` makes every chance with `p > 0` succeed;
/// `FixedRandom(0.999)` makes every uncertain chance fail.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0.clamp(0.0, 0.999_999_999)
    }
}

/// Replays a scripted list of rolls, cycling when exhausted.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRandom {
    rolls: Vec<f64>,
    cursor: usize,
}

impl SequenceRandom {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for SequenceRandom {
    fn next_f64(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let roll = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        roll.clamp(0.0, 0.999_999_999)
    }
}

/// Compute a deterministic seed from battle components.
///
/// * `base_seed` - Seed chosen by the caller (for replay)
/// * `battle_nonce` - Sequence number of the battle within a session
/// * `side` - 0 for the challenger, 1 for the opponent
/// * `context` - Additional discriminator for independent streams
pub fn compute_seed(base_seed: u64, battle_nonce: u64, side: u32, context: u32) -> u64 {
    let mut hash = base_seed;

    hash ^= battle_nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (side as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pcg_is_deterministic() {
        let mut a = PcgRandom::new(42);
        let mut b = PcgRandom::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn pcg_stays_in_unit_interval() {
        let mut rng = PcgRandom::new(7);
        for _ in 0..10_000 {
            let v = rng.next_f64();
            assert!((0.0..1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn chance_consumes_a_draw_for_certain_outcomes() {
        let mut rng = SequenceRandom::new(vec![0.5, 0.5, 0.5]);
        assert!(!rng.chance(0.0));
        assert!(rng.chance(1.0));
        assert!(!rng.chance(f64::NAN));
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn fixed_random_extremes() {
        let mut always = FixedRandom(0.0);
        assert!(always.chance(0.01));
        let mut never = FixedRandom(0.999);
        assert!(!never.chance(0.99));
        assert!(never.chance(1.0));
    }

    #[test]
    fn compute_seed_separates_sides() {
        assert_ne!(compute_seed(1, 1, 0, 0), compute_seed(1, 1, 1, 0));
        assert_eq!(compute_seed(9, 3, 1, 2), compute_seed(9, 3, 1, 2));
    }
}
