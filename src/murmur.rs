//! MurmurHash64A: the 64-bit (x64) member of the MurmurHash2 family.
//!
//! Blocks and tail bytes are always decoded little-endian, so a fingerprint is
//! the same on every host. Not suitable where an adversary picks the input.

/// Multiplier shared by the block mix and the finalizer.
pub const M: u64 = 0xc6a4a7935bd1e995;
/// Shift amount of the xorshift steps.
pub const R: u32 = 47;

const BLOCK_SIZE: usize = 8;

/// Hashes `data` under `seed`, bit-compatible with the reference MurmurHash64A.
#[inline]
pub fn hash64(data: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (data.len() as u64).wrapping_mul(M);

    let (blocks, tail) = data.as_chunks::<BLOCK_SIZE>();
    for block in blocks {
        h = mix_block(h, u64::from_le_bytes(*block));
    }

    // Fold the 0..=7 leftover bytes from the highest offset down, then a single
    // multiply. The reference skips the multiply when there is no tail.
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate().rev() {
            h ^= u64::from(byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    finalize(h)
}

#[inline(always)]
fn mix_block(h: u64, mut k: u64) -> u64 {
    k = k.wrapping_mul(M);
    k ^= k >> R;
    k = k.wrapping_mul(M);
    (h ^ k).wrapping_mul(M)
}

#[inline(always)]
fn finalize(mut h: u64) -> u64 {
    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^ (h >> R)
}
