//! Ordered container keyed by arbitrary-precision integers.
//!
//! Keys are time identifiers that exceed what an `f64` represents
//! exactly, so ordering is always exact `BigUint` comparison. Iteration
//! runs newest (largest key) first.

use num_bigint::BigUint;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::iter::Rev;
use std::marker::PhantomData;
use std::str::FromStr;

/// Descending `(key, value)` iterator.
pub type Entries<'a, V> = Rev<btree_map::Iter<'a, BigUint, V>>;

/// Descending `(key, value)` iterator with mutable values.
pub type EntriesMut<'a, V> = Rev<btree_map::IterMut<'a, BigUint, V>>;

/// Owning descending iterator.
pub type IntoEntries<V> = Rev<btree_map::IntoIter<BigUint, V>>;

/// Map from non-negative big integers to `V`, iterated in strictly
/// descending key order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigIntOrderedMap<V> {
    root: BTreeMap<BigUint, V>,
}

impl<V> Default for BigIntOrderedMap<V> {
    fn default() -> Self {
        Self {
            root: BTreeMap::new(),
        }
    }
}

impl<V> BigIntOrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. Returns the previous value at `key`.
    pub fn put(&mut self, key: impl Into<BigUint>, value: V) -> Option<V> {
        self.root.insert(key.into(), value)
    }

    pub fn get(&self, key: &BigUint) -> Option<&V> {
        self.root.get(key)
    }

    pub fn get_mut(&mut self, key: &BigUint) -> Option<&mut V> {
        self.root.get_mut(key)
    }

    /// Mutable access to `key`, inserting `default()` first if absent.
    pub fn get_or_insert_with(
        &mut self,
        key: impl Into<BigUint>,
        default: impl FnOnce() -> V,
    ) -> &mut V {
        self.root.entry(key.into()).or_insert_with(default)
    }

    pub fn contains_key(&self, key: &BigUint) -> bool {
        self.root.contains_key(key)
    }

    pub fn remove(&mut self, key: &BigUint) -> Option<V> {
        self.root.remove(key)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Entries in strictly descending key order.
    ///
    /// Lazy and restartable: every call starts from the largest key.
    pub fn entries(&self) -> Entries<'_, V> {
        self.root.iter().rev()
    }

    /// Alias of [`entries`](Self::entries).
    pub fn iter(&self) -> Entries<'_, V> {
        self.entries()
    }

    pub fn entries_mut(&mut self) -> EntriesMut<'_, V> {
        self.root.iter_mut().rev()
    }

    pub fn keys(&self) -> impl Iterator<Item = &BigUint> {
        self.root.keys().rev()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.root.values().rev()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.root.values_mut().rev()
    }

    /// Entry with the largest key (first in iteration order).
    pub fn first(&self) -> Option<(&BigUint, &V)> {
        self.root.last_key_value()
    }

    /// Entry with the smallest key (last in iteration order).
    pub fn last(&self) -> Option<(&BigUint, &V)> {
        self.root.first_key_value()
    }

    /// Union `other` into `self`. On a key collision the value from
    /// `other` wins.
    ///
    /// Returns the number of keys that were not present before.
    pub fn merge(&mut self, other: BigIntOrderedMap<V>) -> usize {
        let mut added = 0;
        for (key, value) in other.root {
            if self.root.insert(key, value).is_none() {
                added += 1;
            }
        }
        added
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged(mut self, other: BigIntOrderedMap<V>) -> Self {
        self.merge(other);
        self
    }

    /// Keep only the `keep` largest keys. Returns how many entries were
    /// evicted.
    pub fn truncate_oldest(&mut self, keep: usize) -> usize {
        let mut evicted = 0;
        while self.root.len() > keep {
            if self.root.pop_first().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }
}

impl<V> IntoIterator for BigIntOrderedMap<V> {
    type Item = (BigUint, V);
    type IntoIter = IntoEntries<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.root.into_iter().rev()
    }
}

impl<'a, V> IntoIterator for &'a BigIntOrderedMap<V> {
    type Item = (&'a BigUint, &'a V);
    type IntoIter = Entries<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K: Into<BigUint>, V> FromIterator<(K, V)> for BigIntOrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.put(key, value);
        }
        map
    }
}

impl<K: Into<BigUint>, V> Extend<(K, V)> for BigIntOrderedMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

// Serialized as a JSON object keyed by decimal strings, newest first.
impl<V: Serialize> Serialize for BigIntOrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.entries() {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for BigIntOrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = BigIntOrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map keyed by non-negative decimal integers")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = BigIntOrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            let key = BigUint::from_str(key.trim()).map_err(|e| {
                serde::de::Error::custom(format!("invalid integer key `{key}`: {e}"))
            })?;
            map.put(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn big(s: &str) -> BigUint {
        BigUint::from_str(s).expect("valid decimal")
    }

    #[test]
    fn entries_are_descending() {
        let map: BigIntOrderedMap<&str> = [(2u32, "b"), (9, "i"), (1, "a"), (5, "e")]
            .into_iter()
            .collect();
        let keys: Vec<String> = map.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["9", "5", "2", "1"]);
        assert_eq!(map.first().map(|(_, v)| *v), Some("i"));
        assert_eq!(map.last().map(|(_, v)| *v), Some("a"));
    }

    #[test]
    fn keys_beyond_f64_precision_stay_distinct() {
        // Both keys round to the same f64.
        let a = big("170141184504841449916980385121776435200");
        let b = big("170141184504841449916980385121776435201");
        assert_eq!(
            a.to_string().parse::<f64>().ok(),
            b.to_string().parse::<f64>().ok()
        );

        let mut map = BigIntOrderedMap::new();
        map.put(a.clone(), "older");
        map.put(b.clone(), "newer");
        assert_eq!(map.len(), 2);
        let order: Vec<&str> = map.values().copied().collect();
        assert_eq!(order, vec!["newer", "older"]);
        assert_eq!(map.get(&a), Some(&"older"));
    }

    #[test]
    fn merge_prefers_incoming_values() {
        let mut base: BigIntOrderedMap<&str> = [(1u32, "a"), (2, "b")].into_iter().collect();
        let incoming: BigIntOrderedMap<&str> = [(2u32, "B"), (3, "C")].into_iter().collect();

        let added = base.merge(incoming);
        assert_eq!(added, 1);
        assert_eq!(base.get(&BigUint::from(2u32)), Some(&"B"));
        assert_eq!(base.get(&BigUint::from(3u32)), Some(&"C"));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn iteration_restarts_from_largest_key() {
        let map: BigIntOrderedMap<u8> = [(1u32, 1), (2, 2)].into_iter().collect();
        let first_pass: Vec<u8> = map.values().copied().collect();
        let second_pass: Vec<u8> = map.values().copied().collect();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn truncate_oldest_evicts_smallest_keys() {
        let mut map: BigIntOrderedMap<u8> = (1u32..=5).map(|k| (k, k as u8)).collect();
        assert_eq!(map.truncate_oldest(2), 3);
        let keys: Vec<String> = map.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["5", "4"]);
        assert_eq!(map.truncate_oldest(10), 0);
    }

    #[test]
    fn json_keys_are_exact_decimal_strings() {
        let key = big("170141184504841449916980385121776435201");
        let mut map = BigIntOrderedMap::new();
        map.put(key.clone(), 7u8);
        map.put(3u32, 1u8);

        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(
            json,
            r#"{"170141184504841449916980385121776435201":7,"3":1}"#
        );

        let back: BigIntOrderedMap<u8> = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, map);
    }

    #[test]
    fn json_rejects_non_integer_keys() {
        let err = serde_json::from_str::<BigIntOrderedMap<u8>>(r#"{"-4":1}"#)
            .expect_err("negative key must be rejected");
        assert!(err.to_string().contains("invalid integer key"));
    }

    proptest! {
        #[test]
        fn any_put_order_iterates_strictly_descending(keys in proptest::collection::vec(any::<u128>(), 0..64)) {
            let mut map = BigIntOrderedMap::new();
            for key in &keys {
                map.put(*key, ());
            }
            let seen: Vec<&BigUint> = map.keys().collect();
            for pair in seen.windows(2) {
                prop_assert!(pair[0] > pair[1]);
            }
        }

        #[test]
        fn merge_collision_takes_incoming(key in any::<u64>(), left in any::<u8>(), right in any::<u8>()) {
            let mut a = BigIntOrderedMap::new();
            a.put(key, left);
            let mut b = BigIntOrderedMap::new();
            b.put(key, right);
            a.merge(b);
            prop_assert_eq!(a.get(&BigUint::from(key)), Some(&right));
        }
    }
}
