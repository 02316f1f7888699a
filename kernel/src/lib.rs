//! Bucket Hash - 16-bit key hash kernels
//!
//! Provides:
//! - Hash kernels (key -> 32-bit hash, key + table size -> bucket)
//! - Distribution evaluation (occupancy histogram, spread)
//! - Sweep reporting (kernel comparison across bucket counts and strides)

pub mod error;
pub mod evaluator;
pub mod kernels;
pub mod logging;
pub mod sweep;

#[cfg(feature = "python")]
mod bindings;

pub use error::{Error, Result};
pub use evaluator::{evaluate, inspect_domain, Evaluation, Histogram, SpreadResult};
pub use kernels::{BucketHasher, BucketIndex, HashKernel, HashValue, Key, DEFAULT_BUCKET_COUNT, KEY_DOMAIN};
pub use sweep::{sweep, BucketGroup, KernelStats, Report, Summary, SweepConfig};
