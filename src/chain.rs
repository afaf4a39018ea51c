//! Chain: one bucket's singly linked list of entries, threaded through a
//! shared generational arena.
//!
//! Entries never hold pointers to each other; `next` is an arena key. A
//! chain only stores its head and length, so every operation takes the
//! arena explicitly. All keys reachable from `head` are distinct and
//! `len` equals the number of reachable entries.

use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational key of an entry inside the table's arena.
    pub struct EntryKey;
}

#[derive(Debug)]
pub(crate) struct Entry<V> {
    pub(crate) key: String,
    pub(crate) value: V,
    pub(crate) next: Option<EntryKey>,
}

pub(crate) type Arena<V> = SlotMap<EntryKey, Entry<V>>;

#[derive(Debug, Default)]
pub(crate) struct Chain {
    head: Option<EntryKey>,
    len: usize,
}

impl Chain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `key -> value` at the tail unless `key` is already present.
    ///
    /// Returns the new entry's key, or `Err` with the existing entry's key
    /// when the chain already holds `key`; the chain is then unchanged.
    pub(crate) fn insert<V>(
        &mut self,
        arena: &mut Arena<V>,
        key: String,
        value: V,
    ) -> Result<EntryKey, EntryKey> {
        let mut tail = None;
        let mut cursor = self.head;
        while let Some(k) = cursor {
            let e = &arena[k];
            if e.key == key {
                return Err(k);
            }
            tail = Some(k);
            cursor = e.next;
        }

        let k = arena.insert(Entry {
            key,
            value,
            next: None,
        });
        match tail {
            Some(t) => arena[t].next = Some(k),
            None => self.head = Some(k),
        }
        self.len += 1;
        Ok(k)
    }

    pub(crate) fn find<V>(&self, arena: &Arena<V>, key: &str) -> Option<EntryKey> {
        let mut cursor = self.head;
        while let Some(k) = cursor {
            let e = &arena[k];
            if e.key == key {
                return Some(k);
            }
            cursor = e.next;
        }
        None
    }

    /// Unlink the entry holding `key` and hand it to the caller.
    pub(crate) fn remove<V>(&mut self, arena: &mut Arena<V>, key: &str) -> Option<Entry<V>> {
        let mut prev: Option<EntryKey> = None;
        let mut cursor = self.head;
        while let Some(k) = cursor {
            if arena[k].key == key {
                let mut entry = arena.remove(k)?;
                let next = entry.next.take();
                match prev {
                    Some(p) => arena[p].next = next,
                    None => self.head = next,
                }
                self.len -= 1;
                return Some(entry);
            }
            prev = Some(k);
            cursor = arena[k].next;
        }
        None
    }

    /// Release every entry of this chain from the arena. Returns how many
    /// entries were released.
    pub(crate) fn destroy<V>(self, arena: &mut Arena<V>) -> usize {
        let mut released = 0;
        let mut cursor = self.head;
        while let Some(k) = cursor {
            cursor = arena.remove(k).and_then(|e| e.next);
            released += 1;
        }
        debug_assert_eq!(released, self.len);
        released
    }

    pub(crate) fn iter<'a, V>(&self, arena: &'a Arena<V>) -> ChainIter<'a, V> {
        ChainIter {
            arena,
            cursor: self.head,
        }
    }
}

/// Walks a chain from head to tail.
pub(crate) struct ChainIter<'a, V> {
    arena: &'a Arena<V>,
    cursor: Option<EntryKey>,
}

impl<'a, V> Iterator for ChainIter<'a, V> {
    type Item = (EntryKey, &'a Entry<V>);

    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let e = self.arena.get(k)?;
        self.cursor = e.next;
        Some((k, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(chain: &Chain, arena: &Arena<i32>) -> Vec<String> {
        chain.iter(arena).map(|(_, e)| e.key.clone()).collect()
    }

    /// Invariant: inserts append in order; a duplicate key leaves the chain
    /// untouched and reports the existing entry.
    #[test]
    fn insert_appends_and_deduplicates() {
        let mut arena = Arena::with_key();
        let mut c = Chain::new();
        let a = c.insert(&mut arena, "a".into(), 1).unwrap();
        c.insert(&mut arena, "b".into(), 2).unwrap();
        c.insert(&mut arena, "c".into(), 3).unwrap();

        assert_eq!(c.insert(&mut arena, "a".into(), 99), Err(a));
        assert_eq!(arena[a].value, 1);
        assert_eq!(c.len(), 3);
        assert_eq!(arena.len(), 3);
        assert_eq!(keys(&c, &arena), ["a", "b", "c"]);
    }

    #[test]
    fn find_scans_full_keys() {
        let mut arena = Arena::with_key();
        let mut c = Chain::new();
        let ab = c.insert(&mut arena, "ab".into(), 1).unwrap();
        let abc = c.insert(&mut arena, "abc".into(), 2).unwrap();
        assert_eq!(c.find(&arena, "ab"), Some(ab));
        assert_eq!(c.find(&arena, "abc"), Some(abc));
        assert_eq!(c.find(&arena, "a"), None);
        assert_eq!(c.find(&arena, "abcd"), None);
    }

    /// Invariant: removal relinks the predecessor for head, middle and tail
    /// positions, and the removed entry carries no stale link.
    #[test]
    fn remove_relinks_head_middle_and_tail() {
        let mut arena = Arena::with_key();
        let mut c = Chain::new();
        for (i, k) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            c.insert(&mut arena, (*k).to_string(), i as i32).unwrap();
        }

        let head = c.remove(&mut arena, "a").unwrap();
        assert_eq!((head.key.as_str(), head.value, head.next), ("a", 0, None));
        assert_eq!(keys(&c, &arena), ["b", "c", "d", "e"]);

        let mid = c.remove(&mut arena, "c").unwrap();
        assert_eq!(mid.value, 2);
        assert_eq!(keys(&c, &arena), ["b", "d", "e"]);

        let tail = c.remove(&mut arena, "e").unwrap();
        assert_eq!(tail.value, 4);
        assert_eq!(keys(&c, &arena), ["b", "d"]);

        // A new insert after removing the tail still lands at the end.
        c.insert(&mut arena, "f".into(), 5).unwrap();
        assert_eq!(keys(&c, &arena), ["b", "d", "f"]);
        assert_eq!(c.len(), 3);
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn remove_missing_is_none() {
        let mut arena: Arena<i32> = Arena::with_key();
        let mut c = Chain::new();
        assert!(c.remove(&mut arena, "x").is_none());
        c.insert(&mut arena, "a".into(), 1).unwrap();
        assert!(c.remove(&mut arena, "x").is_none());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn remove_last_entry_empties_chain() {
        let mut arena = Arena::with_key();
        let mut c = Chain::new();
        c.insert(&mut arena, "only".into(), 1).unwrap();
        c.remove(&mut arena, "only").unwrap();
        assert!(c.is_empty());
        assert!(c.iter(&arena).next().is_none());
        assert!(arena.is_empty());
    }

    /// Invariant: destroy releases exactly this chain's entries, leaving
    /// other chains sharing the arena intact.
    #[test]
    fn destroy_releases_only_own_entries() {
        let mut arena = Arena::with_key();
        let mut c1 = Chain::new();
        let mut c2 = Chain::new();
        c1.insert(&mut arena, "a".into(), 1).unwrap();
        c1.insert(&mut arena, "b".into(), 2).unwrap();
        c2.insert(&mut arena, "x".into(), 3).unwrap();

        assert_eq!(c1.destroy(&mut arena), 2);
        assert_eq!(arena.len(), 1);
        assert_eq!(keys(&c2, &arena), ["x"]);

        assert_eq!(Chain::new().destroy(&mut arena), 0);
        assert_eq!(arena.len(), 1);
    }
}
