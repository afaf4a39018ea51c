//! Bucket hashing: the classic djb2 multiply-by-33 string hash.
//!
//! The table feeds raw key bytes straight into `Hasher::write` rather than
//! going through `Hash for str` (which appends a terminator byte), so the
//! default hasher reproduces `acc = acc * 33 + byte` exactly.

use core::hash::{BuildHasher, Hasher};

/// Initial accumulator value.
pub const DJB2_SEED: u64 = 5381;

/// Hash a byte string with djb2, wrapping at 64 bits.
#[inline]
pub fn djb2(bytes: &[u8]) -> u64 {
    bytes.iter().fold(DJB2_SEED, |acc, &b| {
        acc.wrapping_mul(33).wrapping_add(u64::from(b))
    })
}

/// Bucket index of `s` in a table with `capacity` buckets.
///
/// Panics if `capacity` is zero.
#[inline]
pub fn bucket_index(s: &str, capacity: usize) -> usize {
    assert!(capacity > 0, "bucket_index: capacity must be positive");
    (djb2(s.as_bytes()) % capacity as u64) as usize
}

/// Streaming djb2 state. Consecutive `write` calls behave like a single
/// write of the concatenated bytes.
#[derive(Copy, Clone, Debug)]
pub struct Djb2Hasher {
    acc: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { acc: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.acc = self.acc.wrapping_mul(33).wrapping_add(u64::from(b));
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.acc
    }
}

/// `BuildHasher` for [`Djb2Hasher`]; the default hasher of `ChainedTable`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuildDjb2;

impl BuildHasher for BuildDjb2 {
    type Hasher = Djb2Hasher;

    fn build_hasher(&self) -> Self::Hasher {
        Djb2Hasher::default()
    }
}
