//! Absolute time identifiers.
//!
//! A `da` is a 128-bit fixed-point count of seconds since a remote epoch:
//! the high 64 bits are whole seconds, the low 64 bits the fraction.
//! Notification buckets are keyed by these values, which is why they
//! need exact big-integer handling.

use chrono::{DateTime, TimeZone, Utc};
use num_bigint::BigUint;
use num_traits::ToPrimitive;

/// `da` value of 1970-01-01T00:00:00Z.
const DA_UNIX_EPOCH_HIGH: u64 = 0x8000_000c_ce9e_0d80;

/// One second in `da` units (2^64).
pub fn da_second() -> BigUint {
    BigUint::from(1u8) << 64
}

/// `da` value of the Unix epoch.
pub fn da_unix_epoch() -> BigUint {
    BigUint::from(DA_UNIX_EPOCH_HIGH) << 64
}

/// Convert a `da` to Unix milliseconds, rounding to the nearest
/// millisecond.
///
/// Returns `None` for values before the Unix epoch or beyond `i64`.
pub fn da_to_unix_ms(da: &BigUint) -> Option<i64> {
    let epoch = da_unix_epoch();
    if *da < epoch {
        return None;
    }
    let second = da_second();
    let half = &second >> 1;
    let ms: BigUint = ((da - epoch) * 1000u32 + half) / second;
    ms.to_i64()
}

/// Convert Unix milliseconds to the `da` at the start of that millisecond.
pub fn unix_ms_to_da(ms: u64) -> BigUint {
    da_unix_epoch() + (BigUint::from(ms) << 64) / 1000u32
}

/// UTC instant for a `da`, if it is representable.
pub fn da_to_datetime(da: &BigUint) -> Option<DateTime<Utc>> {
    let ms = da_to_unix_ms(da)?;
    Utc.timestamp_millis_opt(ms).single()
}
