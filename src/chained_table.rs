//! ChainedTable: a fixed array of lazily created chains with stable,
//! generational handles to entries.

use crate::chain::{Arena, Chain, EntryKey};
use crate::hasher::BuildDjb2;
use core::hash::{BuildHasher, Hasher};

/// Bucket count used by [`ChainedTable::new`].
pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(EntryKey);

impl Handle {
    pub(crate) fn new(k: EntryKey) -> Self {
        Handle(k)
    }

    pub fn key<'a, V, S>(&self, table: &'a ChainedTable<V, S>) -> Option<&'a str> {
        table.entries.get(self.0).map(|e| e.key.as_str())
    }

    pub fn value<'a, V, S>(&self, table: &'a ChainedTable<V, S>) -> Option<&'a V> {
        table.entries.get(self.0).map(|e| &e.value)
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum InsertError {
    /// The key is already present; carries the handle of the entry that
    /// keeps its original value.
    DuplicateKey(Handle),
}

pub struct ChainedTable<V, S = BuildDjb2> {
    hasher: S,
    buckets: Box<[Option<Chain>]>,
    entries: Arena<V>, // every chain's entries, linked by arena keys
}

impl<V> ChainedTable<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, BuildDjb2)
    }
}

impl<V> Default for ChainedTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, S> ChainedTable<V, S>
where
    S: BuildHasher,
{
    /// Panics if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        assert!(capacity > 0, "ChainedTable capacity must be positive");
        Self {
            hasher,
            buckets: std::iter::repeat_with(|| None).take(capacity).collect(),
            entries: Arena::with_key(),
        }
    }

    /// Bucket that `key` belongs to. Hashes the raw key bytes.
    pub fn bucket_index(&self, key: &str) -> usize {
        let mut h = self.hasher.build_hasher();
        h.write(key.as_bytes());
        (h.finish() % self.buckets.len() as u64) as usize
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert `key -> value`. An existing key keeps its value and the call
    /// fails with `DuplicateKey`.
    pub fn insert(&mut self, key: String, value: V) -> Result<Handle, InsertError> {
        let idx = self.bucket_index(&key);
        let chain = self.buckets[idx].get_or_insert_with(Chain::new);
        match chain.insert(&mut self.entries, key, value) {
            Ok(k) => Ok(Handle::new(k)),
            Err(existing) => Err(InsertError::DuplicateKey(Handle::new(existing))),
        }
    }

    pub fn find(&self, key: &str) -> Option<Handle> {
        let chain = self.buckets[self.bucket_index(key)].as_ref()?;
        chain.find(&self.entries, key).map(Handle::new)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.find(key).and_then(|h| h.value(self))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_some()
    }

    /// Unlink the entry for `key` and return its owned key and value.
    ///
    /// A bucket whose chain becomes empty goes back to the absent state.
    pub fn remove(&mut self, key: &str) -> Option<(String, V)> {
        let idx = self.bucket_index(key);
        let slot = &mut self.buckets[idx];
        let chain = slot.as_mut()?;
        let entry = chain.remove(&mut self.entries, key)?;
        if chain.is_empty() {
            *slot = None;
        }
        Some((entry.key, entry.value))
    }

    /// Number of entries in bucket `index`; `None` if the bucket holds no chain.
    ///
    /// Panics if `index >= capacity()`.
    pub fn bucket_len(&self, index: usize) -> Option<usize> {
        self.buckets[index].as_ref().map(Chain::len)
    }

    /// Entries of bucket `index` in chain order.
    ///
    /// Panics if `index >= capacity()`.
    pub fn bucket(&self, index: usize) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.buckets[index]
            .iter()
            .flat_map(move |c| c.iter(&self.entries))
            .map(|(_, e)| (e.key.as_str(), &e.value))
    }

    /// Every entry, bucket by bucket, each bucket in chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        (0..self.buckets.len()).flat_map(move |i| self.bucket(i))
    }

    /// Tear down every chain and the bucket array. Returns the number of
    /// entries released.
    pub fn destroy(mut self) -> usize {
        let mut released = 0;
        for slot in self.buckets.iter_mut() {
            if let Some(chain) = slot.take() {
                released += chain.destroy(&mut self.entries);
            }
        }
        debug_assert!(self.entries.is_empty());
        tracing::debug!(released, capacity = self.buckets.len(), "table destroyed");
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[derive(Clone, Default)]
    struct ConstBuildHasher;
    struct ConstHasher;
    impl BuildHasher for ConstBuildHasher {
        type Hasher = ConstHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ConstHasher
        }
    }
    impl Hasher for ConstHasher {
        fn write(&mut self, _bytes: &[u8]) {}
        fn finish(&self) -> u64 {
            0
        } // force all keys into the same bucket
    }

    /// Invariant: a duplicate insert is rejected, reports the surviving
    /// entry and leaves the original value (first-write-wins).
    #[test]
    fn duplicate_insert_keeps_first_value() {
        let mut t: ChainedTable<String> = ChainedTable::new();
        let h = t.insert("k".to_string(), "v1".to_string()).unwrap();
        match t.insert("k".to_string(), "v2".to_string()) {
            Err(InsertError::DuplicateKey(existing)) => assert_eq!(existing, h),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(t.get("k").map(String::as_str), Some("v1"));
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn find_get_contains_parity() {
        let mut t: ChainedTable<i32> = ChainedTable::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            t.insert((*k).to_string(), i as i32).unwrap();
        }
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            let h = t.find(k).expect("present");
            assert_eq!(h.key(&t), Some(*k));
            assert_eq!(h.value(&t), Some(&(i as i32)));
            assert_eq!(t.get(k), Some(&(i as i32)));
            assert!(t.contains_key(k));
        }
        for k in ["x", "", "ab"] {
            assert!(t.find(k).is_none());
            assert!(t.get(k).is_none());
            assert!(!t.contains_key(k));
        }
    }

    /// Invariant: entries land in `bucket_index(key)` and nowhere else.
    #[test]
    fn entries_reside_in_their_hash_bucket() {
        let mut t: ChainedTable<()> = ChainedTable::with_capacity(7);
        let words = ["house", "hosue", "cat", "cta", "dog", "a", "b", "ç"];
        for w in words {
            t.insert(w.to_string(), ()).unwrap();
        }
        for i in 0..t.capacity() {
            for (k, _) in t.bucket(i) {
                assert_eq!(t.bucket_index(k), i);
            }
        }
        assert_eq!(t.iter().count(), words.len());
        assert_eq!(t.bucket_index("house"), crate::hasher::bucket_index("house", 7));
    }

    /// Invariant: under total collision every key keeps its own value,
    /// resolved by full key comparison.
    #[test]
    fn collisions_resolve_by_key() {
        let mut t: ChainedTable<i32, ConstBuildHasher> =
            ChainedTable::with_capacity_and_hasher(4, ConstBuildHasher);
        t.insert("a".to_string(), 1).unwrap();
        t.insert("b".to_string(), 2).unwrap();
        t.insert("ab".to_string(), 3).unwrap();

        assert_eq!(t.bucket_len(0), Some(3));
        assert_eq!(t.bucket_len(1), None);
        assert_eq!(t.get("a"), Some(&1));
        assert_eq!(t.get("b"), Some(&2));
        assert_eq!(t.get("ab"), Some(&3));
        let order: Vec<&str> = t.bucket(0).map(|(k, _)| k).collect();
        assert_eq!(order, ["a", "b", "ab"]);
    }

    /// Invariant: remove returns the owned pair, the key disappears, and a
    /// stale handle never resolves to a later entry.
    #[test]
    fn remove_then_reinsert() {
        let mut t: ChainedTable<i32> = ChainedTable::new();
        let h1 = t.insert("k".to_string(), 1).unwrap();
        assert_eq!(t.remove("k"), Some(("k".to_string(), 1)));
        assert!(t.find("k").is_none());
        assert!(h1.value(&t).is_none());
        assert!(t.remove("k").is_none());

        let h2 = t.insert("k".to_string(), 2).unwrap();
        assert_ne!(h1, h2, "handles must differ across generations");
        assert!(h1.value(&t).is_none());
        assert_eq!(h2.value(&t), Some(&2));
    }

    /// Invariant: emptying a bucket returns it to the never-used state.
    #[test]
    fn emptied_bucket_is_released() {
        let mut t: ChainedTable<i32, ConstBuildHasher> =
            ChainedTable::with_capacity_and_hasher(2, ConstBuildHasher);
        assert_eq!(t.bucket_len(0), None);
        t.insert("a".to_string(), 1).unwrap();
        t.insert("b".to_string(), 2).unwrap();
        t.remove("a").unwrap();
        assert_eq!(t.bucket_len(0), Some(1));
        t.remove("b").unwrap();
        assert_eq!(t.bucket_len(0), None);
        assert!(t.is_empty());

        // The bucket accepts a fresh chain afterwards.
        t.insert("c".to_string(), 3).unwrap();
        assert_eq!(t.bucket_len(0), Some(1));
    }

    #[test]
    fn remove_from_absent_bucket_is_none() {
        let mut t: ChainedTable<i32> = ChainedTable::with_capacity(3);
        assert!(t.remove("nothing").is_none());
        assert!(t.is_empty());
    }

    #[test]
    fn iter_yields_every_entry_once() {
        let mut t: ChainedTable<i32> = ChainedTable::with_capacity(5);
        let keys = ["k1", "k2", "k3", "k4", "k5", "k6"];
        for (i, k) in keys.iter().enumerate() {
            t.insert((*k).to_string(), i as i32).unwrap();
        }
        let seen: BTreeSet<&str> = t.iter().map(|(k, _)| k).collect();
        let expected: BTreeSet<&str> = keys.iter().copied().collect();
        assert_eq!(seen, expected);
        assert_eq!(t.len(), keys.len());
    }

    #[test]
    fn destroy_reports_released_entries() {
        let mut t: ChainedTable<i32> = ChainedTable::with_capacity(3);
        for (i, k) in ["a", "b", "c", "d"].iter().enumerate() {
            t.insert((*k).to_string(), i as i32).unwrap();
        }
        t.remove("b").unwrap();
        assert_eq!(t.destroy(), 3);

        let empty: ChainedTable<i32> = ChainedTable::new();
        assert_eq!(empty.destroy(), 0);
    }

    #[test]
    #[should_panic]
    fn zero_capacity_panics() {
        let _t: ChainedTable<i32> = ChainedTable::with_capacity(0);
    }

    #[test]
    fn default_capacity() {
        let t: ChainedTable<i32> = ChainedTable::default();
        assert_eq!(t.capacity(), DEFAULT_CAPACITY);
    }
}
