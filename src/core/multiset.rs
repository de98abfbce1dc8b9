//! Small counted multiset.
//!
//! Used for potion recipes, held ingredients and magical-object token
//! requirements. Those hold at most a handful of distinct kinds, so the
//! counts live inline in a sorted `SmallVec`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Multiset of small `Copy` keys with per-key counts.
///
/// ```
/// use coop_deck_engine::core::Multiset;
///
/// let mut held: Multiset<char> = "aab".chars().collect();
/// assert_eq!(held.count(&'a'), 2);
///
/// assert!(held.remove(&'a', 2));
/// assert!(!held.remove(&'a', 1));
/// assert_eq!(held.total(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(
    from = "Vec<(K, u32)>",
    into = "Vec<(K, u32)>",
    bound(
        serialize = "K: Serialize + Ord + Copy",
        deserialize = "K: Deserialize<'de> + Ord + Copy"
    )
)]
pub struct Multiset<K> {
    /// Sorted by key, no zero counts.
    entries: SmallVec<[(K, u32); 6]>,
}

impl<K> Default for Multiset<K> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<K: Ord + Copy> Multiset<K> {
    /// Create an empty multiset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` copies of `key`.
    pub fn add(&mut self, key: K, count: u32) {
        if count == 0 {
            return;
        }
        match self.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
            Ok(pos) => self.entries[pos].1 += count,
            Err(pos) => self.entries.insert(pos, (key, count)),
        }
    }

    /// Builder form of `add`.
    #[must_use]
    pub fn with(mut self, key: K, count: u32) -> Self {
        self.add(key, count);
        self
    }

    /// Remove `count` copies of `key`.
    ///
    /// All or nothing: returns false and leaves the set untouched when fewer
    /// than `count` copies are held.
    pub fn remove(&mut self, key: &K, count: u32) -> bool {
        if count == 0 {
            return true;
        }
        let Ok(pos) = self.entries.binary_search_by(|(k, _)| k.cmp(key)) else {
            return false;
        };
        let held = self.entries[pos].1;
        if held < count {
            return false;
        }
        if held == count {
            self.entries.remove(pos);
        } else {
            self.entries[pos].1 = held - count;
        }
        true
    }

    /// Copies of `key` held.
    #[must_use]
    pub fn count(&self, key: &K) -> u32 {
        self.entries
            .binary_search_by(|(k, _)| k.cmp(key))
            .map_or(0, |pos| self.entries[pos].1)
    }

    /// Total number of units across all keys.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(key, count)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.entries.iter().copied()
    }

    /// True if every unit of `other` is also held here.
    #[must_use]
    pub fn contains_all(&self, other: &Multiset<K>) -> bool {
        other.iter().all(|(k, c)| self.count(&k) >= c)
    }

    /// Units of `other` not covered by `self`.
    #[must_use]
    pub fn missing_from(&self, other: &Multiset<K>) -> Multiset<K> {
        let mut missing = Multiset::new();
        for (k, c) in other.iter() {
            let held = self.count(&k);
            if held < c {
                missing.add(k, c - held);
            }
        }
        missing
    }
}

impl<K: Ord + Copy> From<Vec<(K, u32)>> for Multiset<K> {
    fn from(pairs: Vec<(K, u32)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Ord + Copy> From<Multiset<K>> for Vec<(K, u32)> {
    fn from(set: Multiset<K>) -> Self {
        set.entries.into_vec()
    }
}

impl<K: Ord + Copy> FromIterator<K> for Multiset<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Multiset::new();
        for key in iter {
            set.add(key, 1);
        }
        set
    }
}

impl<K: Ord + Copy> FromIterator<(K, u32)> for Multiset<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut set = Multiset::new();
        for (key, count) in iter {
            set.add(key, count);
        }
        set
    }
}
