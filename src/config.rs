use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scanner::FileScanError;

/// What a scanner does when braces or parentheses never balance before the
/// token stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnbalancedPolicy {
    /// Close the open record at the last token and mark it truncated.
    #[default]
    Truncate,
    /// Fail with [`ScanError::Unbalanced`](crate::scanner::ScanError::Unbalanced).
    Reject,
}

/// Knobs shared by every scanner created from the same token stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub unbalanced: UnbalancedPolicy,
    /// Expand parameter and property type hints to fully-qualified names
    /// through the enclosing namespace and use statements.
    pub resolve_type_hints: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            unbalanced: UnbalancedPolicy::Truncate,
            resolve_type_hints: true,
        }
    }
}

impl ScanConfig {
    pub fn strict() -> Self {
        Self {
            unbalanced: UnbalancedPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Load a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, FileScanError> {
        let text = fs::read_to_string(path).map_err(|source| FileScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| FileScanError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
