//! Integer paths addressing nodes in a graph.
//!
//! The string form is `/a/b/c`, one segment per tree level, every
//! segment a positive decimal integer of any size.

use quill_kernel::BigUint;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::error::GraphError;

/// A validated, non-empty sequence of positive integer segments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IndexPath(Vec<BigUint>);

impl IndexPath {
    /// Build a path from segments, rejecting an empty path or a zero
    /// segment.
    pub fn new(segments: Vec<BigUint>) -> Result<Self, GraphError> {
        validate_segments(&segments)?;
        Ok(Self(segments))
    }

    /// Parse the `/a/b/c` form.
    ///
    /// Negative, fractional, or non-numeric segments are rejected along
    /// with zero and empty segments.
    pub fn parse(index: &str) -> Result<Self, GraphError> {
        let rest = index
            .strip_prefix('/')
            .ok_or_else(|| GraphError::invalid_path(index, "path must start with `/`"))?;
        if rest.is_empty() {
            return Err(GraphError::invalid_path(index, "path has no segments"));
        }

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(GraphError::invalid_path(
                    index,
                    format!("segment `{raw}` is not a positive integer"),
                ));
            }
            let segment = BigUint::from_str(raw).map_err(|e| {
                GraphError::invalid_path(index, format!("segment `{raw}`: {e}"))
            })?;
            segments.push(segment);
        }
        Self::new(segments)
            .map_err(|_| GraphError::invalid_path(index, "segment `0` is not positive"))
    }

    /// Convenience constructor for small literal paths.
    pub fn from_u64s(segments: &[u64]) -> Result<Self, GraphError> {
        Self::new(segments.iter().copied().map(BigUint::from).collect())
    }

    /// This path extended by one segment.
    pub fn child(&self, segment: impl Into<BigUint>) -> Result<Self, GraphError> {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self::new(segments)
    }

    /// The top-level key this path lives under.
    pub fn root(&self) -> &BigUint {
        // Non-empty by construction.
        &self.0[0]
    }

    pub fn segments(&self) -> &[BigUint] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<BigUint> {
        self.0
    }
}

impl Deref for IndexPath {
    type Target = [BigUint];

    fn deref(&self) -> &[BigUint] {
        &self.0
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_index(&self.0))
    }
}

impl FromStr for IndexPath {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Render segments in the `/a/b/c` form. Does not validate.
pub fn format_index(segments: &[BigUint]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.to_string());
    }
    out
}

pub(crate) fn validate_segments(segments: &[BigUint]) -> Result<(), GraphError> {
    if segments.is_empty() {
        return Err(GraphError::invalid_path("", "path has no segments"));
    }
    if segments.iter().any(|s| *s == BigUint::default()) {
        return Err(GraphError::invalid_path(
            format_index(segments),
            "segment `0` is not positive",
        ));
    }
    Ok(())
}
