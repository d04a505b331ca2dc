use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Aggregated outcome of one catalog check pass.
///
/// `errors` and `warnings` are deduplicated, first occurrence order
/// preserved. `fixed_content` holds the full re-serialized catalog and is
/// populated only when fixing was requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub fixed_content: Option<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Keep a lightweight error type for crates that still import it.
#[derive(Debug, Error)]
pub enum PolintError {
    #[error("{0}")]
    Other(String),
}
