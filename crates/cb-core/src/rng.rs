//! Deterministic per-rider RNG.
//!
//! # Determinism strategy
//!
//! Each rider gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (rider_id * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive rider IDs uniformly across the seed space.
//! Riders never share RNG state, so station picks need no synchronisation and
//! each rider's pick sequence is reproducible for a given seed.  The run as a
//! whole is still non-deterministic: thread interleaving decides who finds a
//! bike first.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{RiderId, StationIdx};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Per-rider deterministic RNG.
///
/// Owned by exactly one rider for the length of its loop.
pub struct RiderRng(SmallRng);

impl RiderRng {
    /// Seed deterministically from the run's seed and a rider ID.
    pub fn new(run_seed: u64, rider: RiderId) -> Self {
        let seed = run_seed ^ (rider.0 as u64).wrapping_mul(MIXING_CONSTANT);
        RiderRng(SmallRng::seed_from_u64(seed))
    }

    /// Pick a station uniformly from a set of `len` stations.
    ///
    /// # Panics
    /// Panics if `len == 0`; station sets are validated non-empty before any
    /// rider starts.
    #[inline]
    pub fn pick_station(&mut self, len: usize) -> StationIdx {
        StationIdx(self.0.gen_range(0..len) as u32)
    }
}
