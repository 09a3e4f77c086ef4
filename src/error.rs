use std::path::PathBuf;

use thiserror::Error;

/// Errors from the non-kernel surfaces: configuration and the equivalence harness.
///
/// Kernels themselves have no error path; their contracts are preconditions.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("failed to read kernel config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse kernel config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize kernel config: {0}")]
    ConfigSerialize(#[from] serde_json::Error),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("operation {op} has no variant named {variant}")]
    UnknownVariant { op: String, variant: String },
    #[error(
        "{op}/{variant} diverged from {reference} at index {index} of {len}: expected {expected}, got {actual}"
    )]
    Mismatch {
        op: &'static str,
        variant: &'static str,
        reference: &'static str,
        len: usize,
        index: usize,
        expected: String,
        actual: String,
    },
}

pub type KernelResult<T> = Result<T, KernelError>;
