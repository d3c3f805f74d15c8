//! Content hashing for posts.
//!
//! A digest is built from named fields in a fixed order. Each field is
//! framed by its name and byte length, so no two field sequences share
//! an encoding.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn builder() -> ContentHashBuilder {
        ContentHashBuilder {
            hasher: Sha256::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulates framed fields into a [`ContentHash`].
pub struct ContentHashBuilder {
    hasher: Sha256,
}

impl ContentHashBuilder {
    pub fn text(mut self, name: &str, value: &str) -> Self {
        for part in [name.as_bytes(), value.as_bytes()] {
            self.hasher.update((part.len() as u64).to_be_bytes());
            self.hasher.update(part);
        }
        self
    }

    pub fn uint(self, name: &str, value: u64) -> Self {
        self.text(name, &value.to_string())
    }

    pub fn finish(self) -> ContentHash {
        ContentHash(format!("{:x}", self.hasher.finalize()))
    }
}
