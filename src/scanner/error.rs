use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the token scanners.
///
/// Scan results are cached together with their error, so the type is `Clone`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The scanner was handed an empty token slice. This is a caller bug.
    #[error("no tokens were provided")]
    NoTokens,

    #[error("{kind} `{name}` was not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} index {index} is out of range ({len} available)")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },

    /// Only raised under [`UnbalancedPolicy::Reject`](crate::UnbalancedPolicy::Reject).
    #[error("unbalanced `{delimiter}` in {context} starting on line {line}")]
    Unbalanced {
        delimiter: char,
        context: &'static str,
        line: u32,
    },
}

pub type ScanResult<T> = Result<T, ScanError>;

/// Failures of the file and directory layer.
#[derive(Debug, Error)]
pub enum FileScanError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid scanner config in {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to walk directory")]
    Walk(#[from] walkdir::Error),

    #[error(transparent)]
    Scan(#[from] ScanError),
}
