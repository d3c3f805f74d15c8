//! Serde adapter for `BigUint` fields.
//!
//! Serializes as a decimal string so JSON consumers never round the
//! value through a float. Deserializes from a decimal string or from a
//! plain unsigned JSON integer.
//!
//! ```ignore
//! #[serde(with = "quill_kernel::decimal")]
//! pub time: BigUint,
//! ```

use num_bigint::BigUint;
use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use std::fmt;
use std::str::FromStr;

pub fn serialize<S: Serializer>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigUint, D::Error> {
    deserializer.deserialize_any(DecimalVisitor)
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = BigUint;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative integer or decimal string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigUint, E> {
        Ok(BigUint::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigUint, E> {
        u64::try_from(v)
            .map(BigUint::from)
            .map_err(|_| E::custom(format!("negative integer {v}")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<BigUint, E> {
        BigUint::from_str(v.trim()).map_err(|e| E::custom(format!("invalid integer `{v}`: {e}")))
    }
}
