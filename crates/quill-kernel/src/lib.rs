//! # Quill Kernel
//!
//! Primitives shared by the content graph and the notification index:
//! an exact big-integer ordered map, `da` time identifiers, and content
//! hashing.
//!
//! ## Architecture
//!
//! ```text
//! BigIntOrderedMap<V>   ← newest-first container, exact key comparison
//!     │
//! da                    ← 128-bit time identifiers ↔ Unix milliseconds
//!     │
//! ContentHash           ← stable SHA-256 fingerprint of post content
//! ```

pub mod da;
pub mod decimal;
pub mod hash;
pub mod ordered;

pub use da::{da_second, da_to_datetime, da_to_unix_ms, da_unix_epoch, unix_ms_to_da};
pub use hash::{ContentHash, ContentHashBuilder};
pub use num_bigint::BigUint;
pub use ordered::BigIntOrderedMap;
