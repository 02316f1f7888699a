//! Distribution sweep over (bucket count × stride) for every kernel.
//!
//! For each bucket count, the stride trials run in parallel; each trial
//! evaluates every kernel on the strided key subsample and returns one
//! `SpreadResult` per kernel. Aggregation happens once all trials of the
//! group are back, per kernel, in caller order.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::evaluator::{evaluate, SpreadResult};
use crate::kernels::{HashKernel, Key, KEY_DOMAIN};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Table sizes compared by the default sweep.
pub const DEFAULT_BUCKET_COUNTS: &[u32] = &[32, 64, 128];
/// Default strides are `1..=DEFAULT_MAX_STRIDE`.
pub const DEFAULT_MAX_STRIDE: u32 = 2999;
/// Default keys are `[0, DEFAULT_DOMAIN_BOUND)`.
pub const DEFAULT_DOMAIN_BOUND: u32 = KEY_DOMAIN - 1;

/// The three-level trial grid plus the key domain it samples from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Kernels to compare, in report order.
    pub kernels: Vec<HashKernel>,
    /// Table sizes. Treated as a set; the first occurrence fixes the order.
    pub bucket_counts: Vec<u32>,
    /// Sampling strides, one trial each.
    pub strides: Vec<u32>,
    /// Exclusive upper bound of sampled keys.
    pub domain_bound: u32,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            kernels: HashKernel::ALL.to_vec(),
            bucket_counts: DEFAULT_BUCKET_COUNTS.to_vec(),
            strides: (1..=DEFAULT_MAX_STRIDE).collect(),
            domain_bound: DEFAULT_DOMAIN_BOUND,
        }
    }
}

impl SweepConfig {
    /// Parse a TOML document. Missing fields keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: SweepConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernels.is_empty() {
            return Err(Error::invalid("at least one kernel is required"));
        }
        if self.bucket_counts.is_empty() {
            return Err(Error::invalid("at least one bucket count is required"));
        }
        if self.bucket_counts.contains(&0) {
            return Err(Error::invalid("bucket count must be non-zero"));
        }
        if self.strides.is_empty() {
            return Err(Error::invalid("at least one stride is required"));
        }
        if self.strides.contains(&0) {
            return Err(Error::invalid("stride must be non-zero"));
        }
        if self.domain_bound > KEY_DOMAIN {
            return Err(Error::invalid(format!(
                "domain bound {} exceeds the 16-bit key domain",
                self.domain_bound
            )));
        }
        Ok(())
    }

    /// Bucket counts with duplicates dropped.
    pub fn distinct_bucket_counts(&self) -> Vec<u32> {
        let mut seen = Vec::with_capacity(self.bucket_counts.len());
        for &n in &self.bucket_counts {
            if !seen.contains(&n) {
                seen.push(n);
            }
        }
        seen
    }
}

/// `0, stride, 2*stride, …` below `domain_bound`.
pub fn strided_keys(stride: u32, domain_bound: u32) -> impl Iterator<Item = Key> {
    (0..domain_bound).step_by(stride.max(1) as usize)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Mean/min/max/stdev of one metric across all strides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    /// Sample standard deviation (n - 1). Zero for a single observation.
    pub stdev: f64,
}

impl Summary {
    /// Summarize `values`. Returns `None` when empty.
    pub fn of(values: &[u32]) -> Option<Self> {
        let min = *values.iter().min()?;
        let max = *values.iter().max()?;
        let n = values.len() as f64;
        let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
        let stdev = if values.len() < 2 {
            0.0
        } else {
            let ss: f64 = values
                .iter()
                .map(|&v| {
                    let d = f64::from(v) - mean;
                    d * d
                })
                .sum();
            (ss / (n - 1.0)).sqrt()
        };
        Some(Self { mean, min, max, stdev })
    }
}

/// Aggregated statistics for one kernel at one bucket count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelStats {
    pub kernel: HashKernel,
    pub spread: Summary,
    pub occupied: Summary,
}

/// All kernels at one bucket count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketGroup {
    pub bucket_count: u32,
    pub trials: usize,
    /// One entry per kernel, in config order.
    pub kernels: Vec<KernelStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub config: SweepConfig,
    pub groups: Vec<BucketGroup>,
}

impl Report {
    /// Hex SHA-256 of the rendered text report.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn group(&self, bucket_count: u32) -> Option<&BucketGroup> {
        self.groups.iter().find(|g| g.bucket_count == bucket_count)
    }
}

// ---------------------------------------------------------------------------
// Sweep
// ---------------------------------------------------------------------------

/// Run every kernel over every (bucket count, stride) trial.
pub fn sweep(config: &SweepConfig) -> Result<Report> {
    config.validate()?;
    let started = Instant::now();

    let groups = config
        .distinct_bucket_counts()
        .into_iter()
        .map(|bucket_count| sweep_group(config, bucket_count))
        .collect::<Result<Vec<_>>>()?;

    tracing::info!(
        kernels = config.kernels.len(),
        groups = groups.len(),
        strides = config.strides.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "sweep finished"
    );

    Ok(Report { config: config.clone(), groups })
}

fn sweep_group(config: &SweepConfig, bucket_count: u32) -> Result<BucketGroup> {
    let _span = tracing::debug_span!("bucket_group", bucket_count).entered();
    let started = Instant::now();

    // trials[stride_idx][kernel_idx]
    let trials: Vec<Vec<SpreadResult>> = config
        .strides
        .par_iter()
        .map(|&stride| {
            config
                .kernels
                .iter()
                .map(|kernel| {
                    let keys = strided_keys(stride, config.domain_bound);
                    evaluate(kernel, keys, Some(bucket_count)).map(|e| e.result)
                })
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    let kernels = config
        .kernels
        .iter()
        .enumerate()
        .map(|(k, &kernel)| {
            let spreads: Vec<u32> = trials.iter().map(|row| row[k].spread).collect();
            let occupied: Vec<u32> = trials.iter().map(|row| row[k].occupied).collect();
            match (Summary::of(&spreads), Summary::of(&occupied)) {
                (Some(spread), Some(occupied)) => Ok(KernelStats { kernel, spread, occupied }),
                _ => Err(Error::invalid("at least one stride is required")),
            }
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        trials = trials.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "bucket group aggregated"
    );

    Ok(BucketGroup { bucket_count, trials: trials.len(), kernels })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn write_floats(f: &mut fmt::Formatter<'_>, label: &str, values: impl Iterator<Item = f64>) -> fmt::Result {
    let cells: Vec<String> = values.map(|v| format!("{v:?}")).collect();
    writeln!(f, "{label} [{}]", cells.join(", "))
}

fn write_ints(f: &mut fmt::Formatter<'_>, label: &str, values: impl Iterator<Item = u32>) -> fmt::Result {
    let cells: Vec<String> = values.map(|v| v.to_string()).collect();
    writeln!(f, "{label} [{}]", cells.join(", "))
}

impl fmt::Display for BucketGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ks = &self.kernels;
        writeln!(f, "Bins:  {}", self.bucket_count)?;
        write_floats(f, "Spread mean:", ks.iter().map(|k| k.spread.mean))?;
        write_ints(f, "Spread min :", ks.iter().map(|k| k.spread.min))?;
        write_ints(f, "Spread max :", ks.iter().map(|k| k.spread.max))?;
        write_floats(f, "Spread stdev :", ks.iter().map(|k| k.spread.stdev))?;
        write_floats(f, "bins mean:", ks.iter().map(|k| k.occupied.mean))?;
        write_ints(f, "bins min :", ks.iter().map(|k| k.occupied.min))?;
        write_ints(f, "bins max :", ks.iter().map(|k| k.occupied.max))?;
        write_floats(f, "bins stdev :", ks.iter().map(|k| k.occupied.stdev))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{group}")?;
        }
        Ok(())
    }
}
