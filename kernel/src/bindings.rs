//! Python Bindings for Bucket Hash

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::evaluator::evaluate;
use crate::kernels::{BucketHasher, HashKernel};
use crate::sweep::{sweep, SweepConfig};

fn to_py(err: crate::Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_kernel(name: &str) -> PyResult<HashKernel> {
    name.parse().map_err(to_py)
}

// ============================================================================
// KERNELS
// ============================================================================

/// Raw 32-bit hash of `key` under kernel `name` ("a".."d" or full name)
#[pyfunction]
fn kernel_hash(name: &str, key: u32) -> PyResult<u32> {
    Ok(parse_kernel(name)?.hash(key))
}

/// Bucket index of `key` in a table of `bucket_count` slots
#[pyfunction]
#[pyo3(signature = (name, key, bucket_count = 256))]
fn kernel_bucket(name: &str, key: u32, bucket_count: u32) -> PyResult<u32> {
    parse_kernel(name)?.bucket(key, bucket_count).map_err(to_py)
}

// ============================================================================
// EVALUATION
// ============================================================================

/// (spread, occupied) for `keys`; unbounded when `bucket_count` is None
#[pyfunction]
#[pyo3(signature = (name, keys, bucket_count = None))]
fn evaluate_spread(name: &str, keys: Vec<u32>, bucket_count: Option<u32>) -> PyResult<(u32, u32)> {
    let kernel = parse_kernel(name)?;
    let eval = evaluate(&kernel, keys, bucket_count).map_err(to_py)?;
    Ok((eval.result.spread, eval.result.occupied))
}

/// Rendered text report for a sweep over all kernels
#[pyfunction]
fn sweep_report(bucket_counts: Vec<u32>, strides: Vec<u32>, domain_bound: u32) -> PyResult<String> {
    let config = SweepConfig {
        bucket_counts,
        strides,
        domain_bound,
        ..SweepConfig::default()
    };
    let report = sweep(&config).map_err(to_py)?;
    Ok(report.to_string())
}

// ============================================================================
// MODULE EXPORT
// ============================================================================

#[pymodule]
fn bucket_hash(_py: Python, m: &PyModule) -> PyResult<()> {
    // Kernels
    m.add_function(wrap_pyfunction!(kernel_hash, m)?)?;
    m.add_function(wrap_pyfunction!(kernel_bucket, m)?)?;
    // Evaluation
    m.add_function(wrap_pyfunction!(evaluate_spread, m)?)?;
    m.add_function(wrap_pyfunction!(sweep_report, m)?)?;
    Ok(())
}
