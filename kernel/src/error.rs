//! Error types for the hash kernels, evaluator and sweep.

use std::io;

use crate::logging::LogError;

/// Crate-wide error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bucket count, stride or grid set that cannot produce a result.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown kernel: {0} (expected one of a, b, c, d or a kernel name)")]
    UnknownKernel(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("logging error: {0}")]
    Log(#[from] LogError),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True for the `InvalidArgument` kind.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let err = Error::invalid("bucket count must be non-zero");
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "invalid argument: bucket count must be non-zero");
    }

    #[test]
    fn test_io_is_not_invalid_argument() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(!err.is_invalid_argument());
    }
}
