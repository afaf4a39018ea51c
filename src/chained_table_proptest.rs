#![cfg(test)]

// Property tests for ChainedTable kept inside the crate so they can check
// bucket placement through the same hasher the table uses.

use crate::chained_table::{ChainedTable, Handle, InsertError};
use core::hash::{BuildHasher, Hasher};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    Remove(usize),
    Find(usize),
    Get(String),
    Iterate,
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-eç]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let get_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Find),
            prop_oneof![get_pool.prop_map(|s: String| s), "[a-eç]{0,5}".prop_map(|s| s)]
                .prop_map(OpI::Get),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..60).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Structural invariants that must hold between any two operations:
// every entry sits in the bucket its key hashes to, chains report their
// true length, and no empty chain is left allocated.
fn check_buckets<S: BuildHasher>(
    sut: &ChainedTable<i32, S>,
    model: &HashMap<String, i32>,
) -> Result<(), TestCaseError> {
    let mut total = 0;
    for i in 0..sut.capacity() {
        let keys: Vec<&str> = sut.bucket(i).map(|(k, _)| k).collect();
        for &k in &keys {
            prop_assert_eq!(sut.bucket_index(k), i);
        }
        let distinct: BTreeSet<&str> = keys.iter().copied().collect();
        prop_assert_eq!(distinct.len(), keys.len(), "duplicate key in chain");
        match sut.bucket_len(i) {
            Some(n) => {
                prop_assert!(n > 0, "empty chain left in bucket {}", i);
                prop_assert_eq!(n, keys.len());
            }
            None => prop_assert!(keys.is_empty()),
        }
        total += keys.len();
    }
    prop_assert_eq!(total, model.len());
    prop_assert_eq!(sut.len(), model.len());
    prop_assert_eq!(sut.is_empty(), model.is_empty());
    Ok(())
}

fn run_scenario<S: BuildHasher>(
    mut sut: ChainedTable<i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<String, i32> = HashMap::new();
    let mut live: HashMap<String, Handle> = HashMap::new();
    let mut stale: Vec<Handle> = Vec::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = pool[i].clone();
                match sut.insert(k.clone(), v) {
                    Ok(h) => {
                        prop_assert!(!model.contains_key(&k), "insert must fail on duplicate");
                        live.insert(k.clone(), h);
                        model.insert(k, v);
                    }
                    Err(InsertError::DuplicateKey(h)) => {
                        // First write wins: the stored value is untouched.
                        prop_assert_eq!(Some(&h), live.get(&k));
                        prop_assert_eq!(h.value(&sut), model.get(&k));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = &pool[i];
                let removed = sut.remove(k);
                prop_assert_eq!(removed.as_ref().map(|(_, v)| v), model.get(k));
                if let Some((kk, _)) = removed {
                    prop_assert_eq!(&kk, k);
                    model.remove(k);
                    stale.push(live.remove(k).expect("tracked live handle"));
                }
                prop_assert!(sut.find(k).is_none());
            }
            OpI::Find(i) => {
                let k = &pool[i];
                let found = sut.find(k);
                prop_assert_eq!(found.is_some(), model.contains_key(k));
                if let Some(h) = found {
                    prop_assert_eq!(Some(&h), live.get(k));
                    prop_assert_eq!(h.key(&sut), Some(k.as_str()));
                }
            }
            OpI::Get(s) => {
                prop_assert_eq!(sut.get(&s), model.get(&s));
                prop_assert_eq!(sut.contains_key(&s), model.contains_key(&s));
            }
            OpI::Iterate => {
                let s_keys: BTreeSet<String> = sut.iter().map(|(k, _)| k.to_owned()).collect();
                let m_keys: BTreeSet<String> = model.keys().cloned().collect();
                prop_assert_eq!(s_keys, m_keys);
            }
        }

        for h in &stale {
            prop_assert!(h.value(&sut).is_none());
        }
        check_buckets(&sut, &model)?;
    }

    prop_assert_eq!(sut.destroy(), model.len());
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap
// with first-write-wins inserts, using the default djb2 hasher over a
// small table so chains get long.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario(), capacity in 1usize..=5) {
        run_scenario(ChainedTable::with_capacity(capacity), pool, ops)?;
    }
}

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
    }
}

// Property: same invariants with every key in one chain, which stresses
// head, middle and tail unlinking.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run_scenario(ChainedTable::with_capacity_and_hasher(3, ConstBuildHasher), pool, ops)?;
    }
}
