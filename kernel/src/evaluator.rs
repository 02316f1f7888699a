//! Distribution evaluation — key sequence → occupancy histogram → spread
//!
//! Bounded mode classifies each key by `kernel.bucket(key, n)`. Unbounded mode
//! classifies by the raw hash value and can produce one bucket per key, so it
//! is meant for small diagnostic samples only.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::kernels::{BucketHasher, Key, KEY_DOMAIN};

/// Bucket (or raw hash, in unbounded mode) → keys that landed there, in
/// input order.
pub type Histogram = BTreeMap<u32, Vec<Key>>;

/// `(spread, occupied)` summary of one histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpreadResult {
    /// Max occupancy minus min occupancy over non-empty buckets.
    pub spread: u32,
    /// Number of non-empty buckets.
    pub occupied: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub histogram: Histogram,
    pub result: SpreadResult,
    min_occupancy: u32,
    max_occupancy: u32,
}

impl Evaluation {
    fn from_histogram(histogram: Histogram) -> Self {
        let (min_occupancy, max_occupancy) = histogram
            .values()
            .map(|keys| keys.len() as u32)
            .fold(None, |acc: Option<(u32, u32)>, n| match acc {
                None => Some((n, n)),
                Some((lo, hi)) => Some((lo.min(n), hi.max(n))),
            })
            .unwrap_or((0, 0));

        let result = SpreadResult {
            spread: max_occupancy - min_occupancy,
            occupied: histogram.len() as u32,
        };
        Self { histogram, result, min_occupancy, max_occupancy }
    }

    /// Total keys across all buckets.
    pub fn total_keys(&self) -> usize {
        self.histogram.values().map(Vec::len).sum()
    }

    pub fn min_occupancy(&self) -> u32 {
        self.min_occupancy
    }

    pub fn max_occupancy(&self) -> u32 {
        self.max_occupancy
    }

    /// One-line diagnostic for this evaluation.
    pub fn describe<'a>(&'a self, kernel: &'a str, bucket_count: Option<u32>) -> Describe<'a> {
        Describe { evaluation: self, kernel, bucket_count }
    }
}

/// Display adapter returned by [`Evaluation::describe`].
pub struct Describe<'a> {
    evaluation: &'a Evaluation,
    kernel: &'a str,
    bucket_count: Option<u32>,
}

impl fmt::Display for Describe<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = match self.bucket_count {
            Some(n) => n.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "Testing {:20} size: {:<5} Bins: {:5} Min: {:5} Max: {:5}",
            self.kernel,
            size,
            self.evaluation.result.occupied,
            self.evaluation.min_occupancy,
            self.evaluation.max_occupancy,
        )
    }
}

/// Classify every key and summarize the resulting histogram.
///
/// `bucket_count = Some(0)` fails with `InvalidArgument`. An empty key
/// sequence yields an empty histogram and a zero result.
pub fn evaluate<K, I>(kernel: &K, keys: I, bucket_count: Option<u32>) -> Result<Evaluation>
where
    K: BucketHasher + ?Sized,
    I: IntoIterator<Item = Key>,
{
    let mut histogram = Histogram::new();
    match bucket_count {
        Some(0) => return Err(Error::invalid("bucket count must be non-zero")),
        Some(n) => {
            for key in keys {
                histogram.entry(kernel.hash(key) % n).or_default().push(key);
            }
        }
        None => {
            for key in keys {
                histogram.entry(kernel.hash(key)).or_default().push(key);
            }
        }
    }

    let evaluation = Evaluation::from_histogram(histogram);
    tracing::trace!(
        bucket_count = ?bucket_count,
        keys = evaluation.total_keys(),
        spread = evaluation.result.spread,
        occupied = evaluation.result.occupied,
        "evaluated"
    );
    Ok(evaluation)
}

/// Evaluate every key in `[0, domain_bound)`, bounded when `bucket_count`
/// is given and by raw hash otherwise.
///
/// Refuses domains wider than the 16-bit key space: every key is stored in
/// the histogram, and unbounded mode can give each its own bucket.
pub fn inspect_domain<K>(kernel: &K, domain_bound: u32, bucket_count: Option<u32>) -> Result<Evaluation>
where
    K: BucketHasher + ?Sized,
{
    if domain_bound > KEY_DOMAIN {
        return Err(Error::invalid(format!(
            "inspection is limited to {KEY_DOMAIN} keys, got {domain_bound}"
        )));
    }
    evaluate(kernel, 0..domain_bound, bucket_count)
}
