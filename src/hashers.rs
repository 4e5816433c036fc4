//! `std::hash` adapters around [`hash64`].

use std::hash::{BuildHasher, Hasher};

use crate::murmur::hash64;

/// A `Hasher` whose state is a running fingerprint.
///
/// Each `write` folds its bytes in as `state = hash64(bytes, state)`. Integer
/// writes go through their little-endian encoding, so results do not depend on
/// the host byte order.
#[derive(Clone, Copy, Debug)]
pub struct Murmur64Hasher {
    state: u64,
}

impl Murmur64Hasher {
    pub const fn with_seed(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl Default for Murmur64Hasher {
    fn default() -> Self {
        Self::with_seed(0)
    }
}

impl Hasher for Murmur64Hasher {
    #[inline(always)]
    fn write(&mut self, bytes: &[u8]) {
        self.state = hash64(bytes, self.state);
    }

    #[inline(always)]
    fn write_u8(&mut self, value: u8) {
        self.write(&[value]);
    }

    #[inline(always)]
    fn write_u16(&mut self, value: u16) {
        self.write(&value.to_le_bytes());
    }

    #[inline(always)]
    fn write_u32(&mut self, value: u32) {
        self.write(&value.to_le_bytes());
    }

    #[inline(always)]
    fn write_u64(&mut self, value: u64) {
        self.write(&value.to_le_bytes());
    }

    // usize is widened so 32- and 64-bit hosts agree.
    #[inline(always)]
    fn write_usize(&mut self, value: usize) {
        self.write_u64(value as u64);
    }

    #[inline(always)]
    fn finish(&self) -> u64 {
        self.state
    }
}

/// Seedable `BuildHasher` for `HashMap`/`HashSet`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildMurmur64 {
    seed: u64,
}

impl BuildMurmur64 {
    pub const fn with_seed(seed: u64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl BuildHasher for BuildMurmur64 {
    type Hasher = Murmur64Hasher;

    fn build_hasher(&self) -> Murmur64Hasher {
        Murmur64Hasher::with_seed(self.seed)
    }
}
