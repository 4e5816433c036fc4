//! Counting distinct records by fingerprint.
//!
//! Every strategy computes the same answer: the number of distinct
//! `hash64(record, seed)` values. They differ in how much parallelism they use
//! and which container holds the fingerprints.

use std::collections::HashSet;
use std::hash::BuildHasher;

use rayon::prelude::*;
use voracious_radix_sort::RadixSort;

use crate::fingerprint_set::FingerprintSet;
use crate::hashers::BuildMurmur64;
use crate::murmur::hash64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DedupStrategy {
    /// Sequential inserts into a [`FingerprintSet`].
    FingerprintSet,
    /// Sequential inserts into a std `HashSet<u64>` rehashed with [`BuildMurmur64`].
    StdHashSet,
    /// Parallel inserts into a `dashmap::DashSet`.
    DashSet,
    /// Parallel inserts into an `scc::HashSet`.
    SccHashSet,
    /// Parallel fingerprinting, radix sort, then count runs.
    RadixSort,
}

impl DedupStrategy {
    pub const ALL: [DedupStrategy; 5] = [
        DedupStrategy::FingerprintSet,
        DedupStrategy::StdHashSet,
        DedupStrategy::DashSet,
        DedupStrategy::SccHashSet,
        DedupStrategy::RadixSort,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            DedupStrategy::FingerprintSet => "FingerprintSet",
            DedupStrategy::StdHashSet => "HashSet (Murmur)",
            DedupStrategy::DashSet => "DashSet",
            DedupStrategy::SccHashSet => "scc::HashSet",
            DedupStrategy::RadixSort => "RadixSort",
        }
    }
}

/// Fingerprints every record in parallel, preserving order.
pub fn fingerprints<R: AsRef<[u8]> + Sync>(records: &[R], seed: u64) -> Vec<u64> {
    records
        .par_iter()
        .map(|record| hash64(record.as_ref(), seed))
        .collect()
}

pub fn count_unique_by_hash<Hasher: BuildHasher>(data: &[u64], hasher: Hasher) -> usize {
    let mut set = HashSet::with_capacity_and_hasher(data.len(), hasher);
    for d in data {
        set.insert(*d);
    }
    set.len()
}

pub fn count_unique<R: AsRef<[u8]> + Sync>(
    records: &[R],
    seed: u64,
    strategy: DedupStrategy,
) -> usize {
    match strategy {
        DedupStrategy::FingerprintSet => {
            let mut set = FingerprintSet::with_capacity(records.len());
            for record in records {
                set.insert_bytes(record.as_ref(), seed);
            }
            set.len()
        }
        DedupStrategy::StdHashSet => {
            let data: Vec<u64> = records.iter().map(|r| hash64(r.as_ref(), seed)).collect();
            count_unique_by_hash(&data, BuildMurmur64::with_seed(seed))
        }
        DedupStrategy::DashSet => {
            let set = dashmap::DashSet::with_capacity(records.len());
            records.par_iter().for_each(|record| {
                set.insert(hash64(record.as_ref(), seed));
            });
            set.len()
        }
        DedupStrategy::SccHashSet => {
            let set = scc::HashSet::with_capacity(records.len());
            records.par_iter().for_each(|record| {
                // Err only means the fingerprint was already there.
                let _ = set.insert(hash64(record.as_ref(), seed));
            });
            set.len()
        }
        DedupStrategy::RadixSort => {
            let mut data = fingerprints(records, seed);
            data.voracious_mt_sort(rayon::current_num_threads());
            data.dedup();
            data.len()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(rng: &mut fastrand::Rng, len: usize, distinct: u32) -> Vec<Vec<u8>> {
        (0..len)
            .map(|_| format!("record-{}", rng.u32(..distinct)).into_bytes())
            .collect()
    }

    #[test]
    fn test_fingerprints_preserve_order() {
        let records = ["apple", "banana", "cherry"];
        assert_eq!(
            fingerprints(&records, 1),
            vec![0x76e148d25b1513f2, 0x230d26247b0e15ea, 0x2f1dbd4555ed89d8]
        );
    }

    #[test]
    fn test_strategies_agree() {
        let mut rng = fastrand::Rng::with_seed(0);
        let records = corpus(&mut rng, 20_000, 5_000);
        let expected: HashSet<&[u8]> = records.iter().map(|r| r.as_slice()).collect();
        for strategy in DedupStrategy::ALL {
            assert_eq!(
                count_unique(&records, 42, strategy),
                expected.len(),
                "{}",
                strategy.name()
            );
        }
    }

    #[test]
    fn test_empty_corpus() {
        let records: Vec<Vec<u8>> = Vec::new();
        for strategy in DedupStrategy::ALL {
            assert_eq!(count_unique(&records, 0, strategy), 0);
        }
    }

    #[test]
    fn test_empty_records_count_once() {
        let records = [&b""[..], b"", b"x", b""];
        for strategy in DedupStrategy::ALL {
            assert_eq!(count_unique(&records, 0, strategy), 2, "{}", strategy.name());
        }
    }

    #[test]
    fn test_count_unique_by_hash_with_foldhash() {
        let data = [1u64, 2, 3, 2, 1, 0];
        let hasher = foldhash::fast::FixedState::with_seed(9);
        assert_eq!(count_unique_by_hash(&data, hasher), 4);
    }
}
