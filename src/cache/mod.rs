//! In-memory request cache.
//!
//! Entries are keyed by [`QueryKey`] and move through
//! idle -> pending -> resolved | failed. Values stay fresh for a configurable
//! stale time; a stale value keeps being served while it is refetched.
//! Concurrent requests for the same key share one fetch.

mod entry;
mod key;
mod layer;

pub use entry::{CacheEntry, EntryState};
pub use key::QueryKey;
pub use layer::{QueryCache, QueryOptions};
