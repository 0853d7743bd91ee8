//! Seed sources for the noise oracles.
//!
//! The session keeps one base seed and derives a decorrelated seed per oracle
//! from it, so a single number reproduces the whole terrain.

use std::time::{SystemTime, UNIX_EPOCH};

/// Which oracle a derived seed feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OracleStream {
    OpenSimplex,
    Worley,
}

impl OracleStream {
    /// Per-stream constant mixed into the base seed.
    const fn salt(self) -> u64 {
        match self {
            OracleStream::OpenSimplex => 0x6f70_656e_7369_6d70,
            OracleStream::Worley => 0x776f_726c_6579_7074,
        }
    }
}

/// Milliseconds since the Unix epoch, used by the reset action.
///
/// A clock set before 1970 yields `0` rather than failing.
pub fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Derive the seed for one oracle from the session's base seed.
///
/// A fixed SplitMix64 finalizer over `base ^ salt`. The function is pure
/// integer arithmetic, so a given base seed reproduces the same terrain on
/// every platform and toolchain.
pub fn derive_oracle_seed(base: u64, stream: OracleStream) -> u64 {
    splitmix64(base ^ stream.salt())
}

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
