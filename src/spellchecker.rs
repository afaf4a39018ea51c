//! Spellchecker: registers canonical words together with their variants
//! in a `ChainedTable`, and unregisters exactly what was registered.
//!
//! Each registration records the keys it actually inserted. A variant
//! already owned by another word is left alone (first-write-wins) and is
//! not recorded, so unregistering a word can never remove an entry that
//! resolves to a different word.

use crate::chained_table::{ChainedTable, InsertError};
use crate::hasher::BuildDjb2;
use crate::variants::{self, VariantError};
use core::hash::BuildHasher;
use hashbrown::HashMap;
use thiserror::Error;

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum SpellError {
    #[error("{0:?} is already registered")]
    AlreadyRegistered(String),
    #[error("{word:?} is already a known misspelling of {canonical:?}")]
    Shadowed { word: String, canonical: String },
    #[error("{0:?} is not registered")]
    NotRegistered(String),
    #[error("invalid word: {0}")]
    InvalidWord(#[from] VariantError),
}

/// Outcome of a successful `register`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Registration {
    /// Keys newly inserted for this word, the word itself included.
    pub inserted: usize,
    /// Variants left mapped to a different, earlier word.
    pub shadowed: usize,
}

pub struct Spellchecker<S = BuildDjb2> {
    table: ChainedTable<String, S>,
    ledger: HashMap<String, Vec<String>>, // canonical word -> keys it inserted
}

impl Spellchecker {
    pub fn new() -> Self {
        Self::from_table(ChainedTable::new())
    }

    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_table(ChainedTable::with_capacity(capacity))
    }
}

impl Default for Spellchecker {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Spellchecker<S>
where
    S: BuildHasher,
{
    /// Start from an empty table, e.g. one built with a custom hasher.
    ///
    /// Panics if `table` already holds entries, since their ownership could
    /// not be attributed to any registration.
    pub fn from_table(table: ChainedTable<String, S>) -> Self {
        assert!(table.is_empty(), "Spellchecker needs an empty table");
        Self {
            table,
            ledger: HashMap::new(),
        }
    }

    pub fn table(&self) -> &ChainedTable<String, S> {
        &self.table
    }

    /// Number of registered canonical words.
    pub fn len(&self) -> usize {
        self.ledger.len()
    }
    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// Canonical word that `word` resolves to, if any.
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.table.get(word).map(String::as_str)
    }

    pub fn is_registered(&self, word: &str) -> bool {
        self.ledger.contains_key(word)
    }

    /// Register `word` and all its variants.
    pub fn register(&mut self, word: &str) -> Result<Registration, SpellError> {
        let variants = variants::variants(word)?;

        if let Some(canonical) = self.lookup(word) {
            return Err(if canonical == word {
                SpellError::AlreadyRegistered(word.to_owned())
            } else {
                SpellError::Shadowed {
                    word: word.to_owned(),
                    canonical: canonical.to_owned(),
                }
            });
        }

        let mut inserted = Vec::with_capacity(variants.len());
        let mut shadowed = 0;
        for variant in variants {
            if variant.key.is_empty() {
                continue;
            }
            match self.table.insert(variant.key.clone(), word.to_owned()) {
                Ok(_) => inserted.push(variant.key),
                Err(InsertError::DuplicateKey(existing)) => {
                    // Repeats of this word's own variants are not shadowing.
                    if existing.value(&self.table).map(String::as_str) != Some(word) {
                        tracing::trace!(word, variant = %variant.key, edit = ?variant.edit, "variant shadowed");
                        shadowed += 1;
                    }
                }
            }
        }

        let registration = Registration {
            inserted: inserted.len(),
            shadowed,
        };
        tracing::debug!(word, inserted = registration.inserted, shadowed, "registered");
        self.ledger.insert(word.to_owned(), inserted);
        Ok(registration)
    }

    /// Remove `word` and every key its registration inserted. Returns the
    /// number of entries removed.
    pub fn unregister(&mut self, word: &str) -> Result<usize, SpellError> {
        let keys = self
            .ledger
            .remove(word)
            .ok_or_else(|| SpellError::NotRegistered(word.to_owned()))?;

        let mut removed = 0;
        for key in &keys {
            if let Some((_, canonical)) = self.table.remove(key) {
                debug_assert_eq!(canonical, word);
                removed += 1;
            }
        }
        debug_assert_eq!(removed, keys.len());
        tracing::debug!(word, removed, "unregistered");
        Ok(removed)
    }

    /// Tear down the table. Returns the number of entries released.
    pub fn destroy(self) -> usize {
        self.table.destroy()
    }
}
