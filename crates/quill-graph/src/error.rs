//! Error types for content graph operations.

/// Errors raised while addressing or mutating a graph.
///
/// Lookups never fail; only structural writes validate their input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A path is empty, or has a segment that is not a positive integer.
    #[error("invalid path `{index}`: {reason}")]
    InvalidPath { index: String, reason: String },
}

impl GraphError {
    pub(crate) fn invalid_path(index: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            index: index.into(),
            reason: reason.into(),
        }
    }
}
