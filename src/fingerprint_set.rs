//! A dense hash set for 64-bit fingerprints.
//!
//! There is no metadata table, just buckets of plain fingerprints, one cache
//! line each. Probe sequences may be longer than a SwissTable's (each probe is
//! 8 bytes, not 1), but every access costs a single cache miss. Fingerprints
//! are already well mixed, so they index the table without further hashing.

use crate::murmur::hash64;

const BUCKET_SIZE: usize = 8;

#[derive(Clone, Copy)]
#[repr(align(64))] // Cache line alignment
struct Bucket([u64; BUCKET_SIZE]);

const EMPTY_BUCKET: Bucket = Bucket([0u64; BUCKET_SIZE]);

pub struct FingerprintSet {
    table: Box<[Bucket]>,
    len: usize,
    // 0 marks an empty slot, so the zero fingerprint lives here.
    has_zero: bool,
}

impl FingerprintSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: Self::alloc_table(Self::num_buckets(capacity)),
            len: 0,
            has_zero: false,
        }
    }

    // Twice the requested slots, rounded to a power of two and capped at the
    // largest power of two that fits in usize.
    fn num_buckets(capacity: usize) -> usize {
        let slots = capacity
            .max(1)
            .checked_next_power_of_two()
            .and_then(|slots| slots.checked_mul(2))
            .unwrap_or(1 << (usize::BITS - 1));
        slots.div_ceil(BUCKET_SIZE)
    }

    fn alloc_table(num_buckets: usize) -> Box<[Bucket]> {
        debug_assert!(num_buckets.is_power_of_two());
        vec![EMPTY_BUCKET; num_buckets].into_boxed_slice()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len + self.has_zero as usize
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hashes `data` under `seed` and inserts the fingerprint.
    #[inline]
    pub fn insert_bytes(&mut self, data: &[u8], seed: u64) -> bool {
        self.insert(hash64(data, seed))
    }

    /// Returns true if `fingerprint` was not already present.
    #[inline]
    pub fn insert(&mut self, fingerprint: u64) -> bool {
        if fingerprint == 0 {
            let added = !self.has_zero;
            self.has_zero = true;
            return added;
        }
        if (self.len + 1) * 2 > self.table.len() * BUCKET_SIZE {
            self.grow();
        }
        let added = Self::insert_into(&mut self.table, fingerprint);
        self.len += added as usize;
        added
    }

    pub fn contains(&self, fingerprint: u64) -> bool {
        if fingerprint == 0 {
            return self.has_zero;
        }
        let bucket_mask = self.table.len() - 1;
        let (mut bucket_i, element_offset) = Self::home(fingerprint);
        loop {
            let bucket = &self.table[bucket_i & bucket_mask];
            for element_i in 0..BUCKET_SIZE {
                match bucket.0[(element_i + element_offset) % BUCKET_SIZE] {
                    0 => return false,
                    e if e == fingerprint => return true,
                    _ => {}
                }
            }
            bucket_i = bucket_i.wrapping_add(1);
        }
    }

    #[inline(always)]
    fn home(fingerprint: u64) -> (usize, usize) {
        (fingerprint as usize, (fingerprint >> 61) as usize)
    }

    // The table is kept at most half full, so the probe always terminates.
    #[inline(always)]
    fn insert_into(table: &mut [Bucket], fingerprint: u64) -> bool {
        let bucket_mask = table.len() - 1;
        let (mut bucket_i, element_offset) = Self::home(fingerprint);
        loop {
            let bucket = &mut table[bucket_i & bucket_mask];
            for element_i in 0..BUCKET_SIZE {
                let element = &mut bucket.0[(element_i + element_offset) % BUCKET_SIZE];
                if *element == 0 {
                    *element = fingerprint;
                    return true;
                }
                if *element == fingerprint {
                    return false;
                }
            }
            bucket_i = bucket_i.wrapping_add(1);
        }
    }

    fn grow(&mut self) {
        let new_buckets = self.table.len() * 2;
        log::trace!("growing fingerprint set to {new_buckets} buckets");
        let old = std::mem::replace(&mut self.table, Self::alloc_table(new_buckets));
        for bucket in old.iter() {
            for &fingerprint in &bucket.0 {
                if fingerprint != 0 {
                    Self::insert_into(&mut self.table, fingerprint);
                }
            }
        }
    }
}

impl Default for FingerprintSet {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl Extend<u64> for FingerprintSet {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        for fingerprint in iter {
            self.insert(fingerprint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_insert_and_contains() {
        let mut set = FingerprintSet::with_capacity(4);
        assert!(set.is_empty());
        assert!(set.insert(17));
        assert!(!set.insert(17));
        assert!(set.insert(u64::MAX));
        assert!(set.contains(17));
        assert!(set.contains(u64::MAX));
        assert!(!set.contains(18));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_num_buckets() {
        assert_eq!(FingerprintSet::num_buckets(0), 1);
        assert_eq!(FingerprintSet::num_buckets(4), 1);
        assert_eq!(FingerprintSet::num_buckets(5), 2);
        assert_eq!(FingerprintSet::num_buckets(64), 16);
        let max = 1 << (usize::BITS - 1) >> 3;
        assert_eq!(FingerprintSet::num_buckets(1 << (usize::BITS - 2)), max);
        assert_eq!(FingerprintSet::num_buckets((1 << (usize::BITS - 2)) + 1), max);
        assert_eq!(FingerprintSet::num_buckets(usize::MAX), max);
        assert!(FingerprintSet::num_buckets(usize::MAX).is_power_of_two());
    }

    #[test]
    fn test_zero_fingerprint() {
        let mut set = FingerprintSet::default();
        assert!(!set.contains(0));
        assert!(set.insert(0));
        assert!(!set.insert(0));
        assert!(set.contains(0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let mut rng = fastrand::Rng::with_seed(3);
        let mut set = FingerprintSet::with_capacity(1);
        let mut expected = HashSet::new();
        for _ in 0..50_000 {
            // Narrow range so that duplicates occur.
            let fingerprint = hash64(&rng.u32(..20_000).to_le_bytes(), 0);
            assert_eq!(set.insert(fingerprint), expected.insert(fingerprint));
        }
        assert_eq!(set.len(), expected.len());
        assert!(expected.iter().all(|&f| set.contains(f)));
    }

    #[test]
    fn test_colliding_home_buckets() {
        // Same low bits and same top bits: all start probing at one slot.
        let mut set = FingerprintSet::with_capacity(64);
        for i in 1..=40u64 {
            assert!(set.insert(i << 32));
        }
        for i in 1..=40u64 {
            assert!(set.contains(i << 32));
        }
        assert!(!set.contains(41 << 32));
        assert_eq!(set.len(), 40);
    }

    #[test]
    fn test_insert_bytes() {
        let mut set = FingerprintSet::default();
        assert!(set.insert_bytes(b"apple", 1));
        assert!(!set.insert_bytes(b"apple", 1));
        assert!(set.insert_bytes(b"apple", 2));
        assert!(set.contains(0x76e148d25b1513f2));
    }

    #[test]
    fn test_extend() {
        let mut set = FingerprintSet::default();
        set.extend([5, 0, 5, 9, 0]);
        assert_eq!(set.len(), 3);
    }
}
