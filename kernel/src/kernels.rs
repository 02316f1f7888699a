//! Hash Kernels — 16-bit key to 32-bit hash
//!
//! Algorithm family: FNV-style seed (init * prime), byte/whole-value XOR,
//! 16-bit half folding, multiply by prime. All arithmetic wraps mod 2^32.
//! Bounded forms reduce the hash with `% bucket_count`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Input key. Valid domain is `[0, 65535]`.
pub type Key = u32;
/// Raw output of an unbounded kernel.
pub type HashValue = u32;
/// Output of a bounded kernel, in `[0, bucket_count)`.
pub type BucketIndex = u32;

/// FNV offset basis used as the seed.
pub const INIT: u32 = 2_166_136_261;
/// Multiplier shared by every kernel.
pub const PRIME: u32 = 1_677_619;
/// Bucket count used when the caller has no table size in mind.
pub const DEFAULT_BUCKET_COUNT: u32 = 256;
/// Exclusive upper bound of the key domain.
pub const KEY_DOMAIN: u32 = 1 << 16;

const MASK8: u32 = 0xFF;
const MASK16: u32 = 0xFFFF;

/// Key to HashValue, and key plus bucket count to BucketIndex.
pub trait BucketHasher {
    fn hash(&self, key: Key) -> HashValue;

    /// Reduce `hash(key)` into `[0, bucket_count)`.
    fn bucket(&self, key: Key, bucket_count: u32) -> Result<BucketIndex> {
        if bucket_count == 0 {
            return Err(Error::invalid("bucket count must be non-zero"));
        }
        Ok(self.hash(key) % bucket_count)
    }

    /// Bounded form with [`DEFAULT_BUCKET_COUNT`] buckets.
    fn default_bucket(&self, key: Key) -> BucketIndex {
        self.hash(key) % DEFAULT_BUCKET_COUNT
    }
}

/// The closed set of kernel variants under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashKernel {
    /// Seeded, byte-split FNV-style (variant A). Consumes only the low two
    /// bytes of the key.
    FnvByteSplit,
    /// Seeded, whole-value XOR (variant B).
    FnvWhole,
    /// `key * prime` only (variant C). Baseline.
    Multiplicative,
    /// `key * prime` folded to 16 bits (variant D).
    MultiplicativeFold,
}

impl HashKernel {
    /// Every variant, in declaration order (A, B, C, D).
    pub const ALL: [HashKernel; 4] = [
        HashKernel::FnvByteSplit,
        HashKernel::FnvWhole,
        HashKernel::Multiplicative,
        HashKernel::MultiplicativeFold,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HashKernel::FnvByteSplit => "fnv-byte-split",
            HashKernel::FnvWhole => "fnv-whole",
            HashKernel::Multiplicative => "multiplicative",
            HashKernel::MultiplicativeFold => "multiplicative-fold",
        }
    }

    /// Single-letter alias (`a`..`d`).
    pub fn letter(&self) -> char {
        match self {
            HashKernel::FnvByteSplit => 'a',
            HashKernel::FnvWhole => 'b',
            HashKernel::Multiplicative => 'c',
            HashKernel::MultiplicativeFold => 'd',
        }
    }
}

impl BucketHasher for HashKernel {
    fn hash(&self, key: Key) -> HashValue {
        match self {
            HashKernel::FnvByteSplit => fnv_byte_split(key),
            HashKernel::FnvWhole => fnv_whole(key),
            HashKernel::Multiplicative => multiplicative(key),
            HashKernel::MultiplicativeFold => multiplicative_fold(key),
        }
    }
}

impl fmt::Display for HashKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashKernel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        HashKernel::ALL
            .into_iter()
            .find(|k| k.name() == wanted || (wanted.len() == 1 && wanted.starts_with(k.letter())))
            .ok_or_else(|| Error::UnknownKernel(s.to_string()))
    }
}

#[inline]
fn seed() -> u32 {
    INIT.wrapping_mul(PRIME)
}

/// XOR the high 16 bits into the low 16 bits.
#[inline]
fn fold16(h: u32) -> u32 {
    (h >> 16) ^ (h & MASK16)
}

/// Variant A. Keys >= 65536 lose everything above their second byte.
#[inline]
pub fn fnv_byte_split(key: Key) -> HashValue {
    let h = seed() ^ (key & MASK8);
    let h = fold16(h).wrapping_mul(PRIME);
    h ^ ((key >> 8) & MASK8)
}

/// Variant B.
#[inline]
pub fn fnv_whole(key: Key) -> HashValue {
    fold16(seed() ^ key).wrapping_mul(PRIME)
}

/// Variant C.
#[inline]
pub fn multiplicative(key: Key) -> HashValue {
    key.wrapping_mul(PRIME)
}

/// Variant D.
#[inline]
pub fn multiplicative_fold(key: Key) -> HashValue {
    fold16(key.wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conformance_vectors() {
        assert_eq!(multiplicative_fold(0), 0);
        assert_eq!(multiplicative_fold(1), 39210);
        assert_eq!(HashKernel::MultiplicativeFold.bucket(1, 256).unwrap(), 42);
        assert_eq!(HashKernel::MultiplicativeFold.default_bucket(1), 42);
    }

    #[test]
    fn test_multiplicative_wraps() {
        assert_eq!(multiplicative(1), PRIME);
        assert_eq!(multiplicative(u32::MAX), PRIME.wrapping_neg());
    }

    #[test]
    fn test_reference_vectors() {
        let keys = [0, 1, 255, 256, 4660, 65535];
        let expected: [[u32; 6]; 4] = [
            [2583270604, 2584948223, 2997642497, 2583270605, 2657085826, 2997642750],
            [2583270604, 2584948223, 2997642497, 3012741068, 939466640, 4280275457],
            [0, 1677619, 427792845, 429470464, 3522737244, 2568578765],
            [0, 39210, 32946, 10905, 26020, 65492],
        ];
        for (kernel, row) in HashKernel::ALL.iter().zip(expected) {
            for (&key, want) in keys.iter().zip(row) {
                assert_eq!(kernel.hash(key), want, "{kernel}({key})");
            }
        }
    }

    #[test]
    fn test_byte_split_truncates() {
        assert_eq!(fnv_byte_split(65536 + 7), fnv_byte_split(7));
        assert_eq!(fnv_byte_split(0x00AB_1234), fnv_byte_split(0x1234));
        assert_ne!(fnv_whole(65536 + 7), fnv_whole(7));
    }

    #[test]
    fn test_zero_buckets_rejected() {
        for kernel in HashKernel::ALL {
            let err = kernel.bucket(123, 0).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_parse_names_and_letters() {
        for kernel in HashKernel::ALL {
            assert_eq!(kernel.name().parse::<HashKernel>().unwrap(), kernel);
            assert_eq!(kernel.letter().to_string().parse::<HashKernel>().unwrap(), kernel);
        }
        assert_eq!("D".parse::<HashKernel>().unwrap(), HashKernel::MultiplicativeFold);
        assert!(matches!("e".parse::<HashKernel>(), Err(Error::UnknownKernel(_))));
        assert!(matches!("fnv".parse::<HashKernel>(), Err(Error::UnknownKernel(_))));
    }
}
