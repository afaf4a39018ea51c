//! typo-table: a fixed-capacity, hash-chained string table and the
//! single-edit spellchecker built on it.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep bucket-chain maintenance and variant bookkeeping in small
//!   layers that can each be reasoned about on their own.
//! - Layers:
//!   - `hasher`: djb2 over the key's bytes, reduced modulo the bucket count.
//!   - `chain`: one bucket's singly linked list, threaded through a shared
//!     generational arena instead of owning pointers.
//!   - `ChainedTable<V, S>`: fixed bucket array; lazily creates chains,
//!     releases them once emptied, returns stable `Handle`s.
//!   - `variants`: pure generator of single-edit misspellings.
//!   - `Spellchecker<S>`: registers a word's variants and records which
//!     keys it actually inserted so unregistering removes exactly those.
//!   - `session`: the `+`/`-`/`*`/query line protocol over any reader and
//!     writer, used by the `spellcheck` binary.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no locking.
//! - Fixed capacity: no resizing or rehashing, chains grow instead.
//! - Unique keys per table; insert is first-write-wins and reports the
//!   surviving entry.
//! - Keys and values are immutable after insertion.
//!
//! Ownership
//! - Every entry lives in one `SlotMap` owned by the table. Chains link
//!   entries by arena key, so unlinking is a relink plus a slot removal and
//!   there is nothing to double-free. Stale handles fail to resolve thanks
//!   to slot generations.
//! - Teardown is `ChainedTable::destroy(self)`; consuming the table makes
//!   a second teardown impossible. Plain `Drop` releases the same storage.
//!
//! Registration bookkeeping
//! - `register` inserts `(variant -> word)` for every generated variant. A
//!   variant already owned by another word keeps its owner and is counted
//!   as shadowed.
//! - The keys actually inserted are kept per word; `unregister` replays
//!   that list rather than regenerating variants, so it never deletes an
//!   entry that resolves to a different word.
//! - The empty string produced by omitting the only letter of a one-letter
//!   word is never registered.
//!
//! Notes and non-goals
//! - No persistence and no concurrent access.
//! - Words must be drawn from `a..=z` plus `ç`; anything else is rejected
//!   before generation starts.
//! - Logging goes through `tracing`; the library installs no subscriber.

mod chain;
pub mod chained_table;
mod chained_table_proptest;
pub mod hasher;
pub mod session;
pub mod spellchecker;
pub mod variants;

// Public surface
pub use chained_table::{ChainedTable, Handle, InsertError, DEFAULT_CAPACITY};
pub use hasher::BuildDjb2;
pub use session::{Command, Reply, Session, Summary};
pub use spellchecker::{Registration, SpellError, Spellchecker};
pub use variants::{Edit, Variant, VariantError};
