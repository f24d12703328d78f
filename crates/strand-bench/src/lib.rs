//! Benchmark profiles and harness helpers for strand.
//!
//! Shared by the criterion benches and the runnable examples:
//!
//! - [`BenchProfile`]: element count, insert count and seed
//! - [`insertion_positions`]: deterministic insert positions via seed
//! - [`measure_appends`]: wall-clock append throughput, `GrowVec` vs `Vec`

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::hint::black_box;
use std::time::{Duration, Instant};

use strand::GrowVec;

/// Workload sizes for benchmarks and the throughput harness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchProfile {
    /// Number of elements appended per run.
    pub element_count: usize,
    /// Number of positional inserts per run.
    pub insert_count: usize,
    /// Seed for [`insertion_positions`].
    pub seed: u64,
}

impl BenchProfile {
    /// Default append workload: one million `u64`s.
    pub const DEFAULT_ELEMENT_COUNT: usize = 1_000_000;

    /// Default insert workload. Inserts are O(n), so this stays small.
    pub const DEFAULT_INSERT_COUNT: usize = 2_000;

    /// Default seed.
    pub const DEFAULT_SEED: u64 = 42;

    /// A profile appending `element_count` elements, other values default.
    pub fn new(element_count: usize) -> Self {
        Self {
            element_count,
            insert_count: Self::DEFAULT_INSERT_COUNT,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// A small profile for tests and smoke runs.
    pub fn quick() -> Self {
        Self {
            element_count: 10_000,
            insert_count: 200,
            seed: Self::DEFAULT_SEED,
        }
    }
}

impl Default for BenchProfile {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ELEMENT_COUNT)
    }
}

/// Generate `count` insert positions for a vector that starts empty.
///
/// The `k`-th position lies in `0..=k`, so it is valid for a vector that
/// already holds `k` elements. Same seed, same positions.
pub fn insertion_positions(count: usize, seed: u64) -> Vec<usize> {
    (0..count)
        .map(|k| {
            let mixed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add((k as u64).wrapping_mul(1442695040888963407));
            ((mixed >> 33) % (k as u64 + 1)) as usize
        })
        .collect()
}

/// Append `0..n` to a fresh [`GrowVec`].
pub fn fill_grow_vec(n: usize) -> GrowVec<u64> {
    let mut v = GrowVec::new();
    for i in 0..n as u64 {
        v.push_back(i);
    }
    v
}

/// Append `0..n` to a fresh `Vec`, for comparison.
pub fn fill_std_vec(n: usize) -> Vec<u64> {
    let mut v = Vec::new();
    for i in 0..n as u64 {
        v.push(i);
    }
    v
}

/// Insert `profile.insert_count` values at seeded positions.
pub fn insert_at_positions(profile: &BenchProfile) -> GrowVec<u64> {
    let mut v = GrowVec::new();
    for (value, pos) in insertion_positions(profile.insert_count, profile.seed)
        .into_iter()
        .enumerate()
    {
        v.insert(pos, value as u64);
    }
    v
}

/// Wall-clock timings from [`measure_appends`].
#[derive(Clone, Debug)]
pub struct AppendReport {
    /// Elements appended per container.
    pub elements: usize,
    /// Time to fill a `GrowVec`.
    pub grow_vec: Duration,
    /// Time to fill a `Vec`.
    pub std_vec: Duration,
}

impl AppendReport {
    /// `GrowVec` time divided by `Vec` time.
    pub fn ratio(&self) -> f64 {
        self.grow_vec.as_secs_f64() / self.std_vec.as_secs_f64().max(f64::EPSILON)
    }
}

/// Time appending `profile.element_count` elements to each container.
pub fn measure_appends(profile: &BenchProfile) -> AppendReport {
    let n = profile.element_count;

    let start = Instant::now();
    black_box(fill_grow_vec(black_box(n)));
    let grow_vec = start.elapsed();

    let start = Instant::now();
    black_box(fill_std_vec(black_box(n)));
    let std_vec = start.elapsed();

    log::debug!("appended {n} elements: GrowVec {grow_vec:?}, Vec {std_vec:?}");
    AppendReport {
        elements: n,
        grow_vec,
        std_vec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_deterministic() {
        assert_eq!(insertion_positions(50, 7), insertion_positions(50, 7));
        assert_ne!(insertion_positions(50, 7), insertion_positions(50, 8));
    }

    #[test]
    fn positions_are_in_range() {
        for (k, pos) in insertion_positions(500, 3).into_iter().enumerate() {
            assert!(pos <= k, "position {pos} out of range at step {k}");
        }
    }

    #[test]
    fn seeded_inserts_match_std_vec() {
        let profile = BenchProfile::quick();
        let mut expected = Vec::new();
        for (value, pos) in insertion_positions(profile.insert_count, profile.seed)
            .into_iter()
            .enumerate()
        {
            expected.insert(pos, value as u64);
        }
        assert_eq!(insert_at_positions(&profile).as_slice(), expected.as_slice());
    }

    #[test]
    fn fills_agree() {
        assert_eq!(fill_grow_vec(1000).as_slice(), fill_std_vec(1000).as_slice());
    }

    #[test]
    fn report_covers_profile() {
        let report = measure_appends(&BenchProfile::new(1000));
        assert_eq!(report.elements, 1000);
        assert!(report.ratio() >= 0.0);
    }

    #[test]
    fn default_profile_uses_constants() {
        let profile = BenchProfile::default();
        assert_eq!(profile.element_count, BenchProfile::DEFAULT_ELEMENT_COUNT);
        assert_eq!(profile.insert_count, BenchProfile::DEFAULT_INSERT_COUNT);
        assert_eq!(profile.seed, BenchProfile::DEFAULT_SEED);
    }
}
