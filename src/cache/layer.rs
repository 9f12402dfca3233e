//! In-memory query cache that deduplicates in-flight fetches.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::entry::{CacheEntry, EntryState};
use super::key::QueryKey;
use crate::catalog::CatalogError;

/// Per-call cache options.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions {
  /// How long a resolved value is served without refetching
  pub stale_time: Duration,
  /// Disabled queries never fetch; they only expose what is already cached
  pub enabled: bool,
  /// How long an entry nobody uses is kept before it is dropped
  pub gc_time: Duration,
}

impl Default for QueryOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::from_secs(5 * 60),
      enabled: true,
      gc_time: Duration::from_secs(5 * 60),
    }
  }
}

impl QueryOptions {
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
    self.gc_time = gc_time;
    self
  }

  pub fn enabled(mut self, enabled: bool) -> Self {
    self.enabled = enabled;
    self
  }
}

/// Query cache for one value type.
///
/// Owned by the event-loop task and mutated only through `&mut self`.
/// Fetches run as spawned tokio tasks; their results come back through a
/// oneshot per in-flight key and are applied by [`QueryCache::poll`].
///
/// Guarantees:
/// - at most one in-flight fetch per key
/// - a fresh resolved value is served without a fetch, as the same `Arc`
/// - stale or failed entries refetch on the next `get`
/// - entries unused for longer than the gc window are dropped by
///   [`QueryCache::collect_garbage`], never while a fetch is in flight
pub struct QueryCache<V> {
  entries: HashMap<QueryKey, CacheEntry<V>>,
  in_flight: HashMap<QueryKey, oneshot::Receiver<Result<V, CatalogError>>>,
  /// Last time each entry was requested, seeded, settled or observed
  last_used: HashMap<QueryKey, Instant>,
}

impl<V: Send + Sync + 'static> QueryCache<V> {
  pub fn new() -> Self {
    Self {
      entries: HashMap::new(),
      in_flight: HashMap::new(),
      last_used: HashMap::new(),
    }
  }

  /// Read the entry for `key`, starting a fetch if the entry needs one.
  ///
  /// - missing, idle or failed: fetch
  /// - pending: join the in-flight fetch, nothing new is spawned
  /// - resolved and fresh: return the cached value
  /// - resolved and stale: fetch, keeping the old value visible meanwhile
  ///
  /// `fetcher` is only called when a fetch actually starts.
  pub fn get<F, Fut>(&mut self, key: &QueryKey, options: QueryOptions, fetcher: F) -> CacheEntry<V>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, CatalogError>> + Send + 'static,
  {
    self.last_used.insert(key.clone(), Instant::now());
    let existing = self.entries.get(key);

    if !options.enabled {
      return existing
        .cloned()
        .unwrap_or_else(|| CacheEntry::idle(key.clone()));
    }

    let previous = match existing {
      None => None,
      Some(entry) => match &entry.state {
        EntryState::Idle | EntryState::Failed(_) => None,
        EntryState::Pending { .. } => {
          debug!(key = %key, "joining in-flight fetch");
          return entry.clone();
        }
        EntryState::Resolved(value) => {
          if !entry.is_stale(Instant::now(), options.stale_time) {
            return entry.clone();
          }
          Some(Arc::clone(value))
        }
      },
    };

    self.start_fetch(key.clone(), previous, fetcher)
  }

  fn start_fetch<F, Fut>(&mut self, key: QueryKey, previous: Option<Arc<V>>, fetcher: F) -> CacheEntry<V>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, CatalogError>> + Send + 'static,
  {
    debug!(key = %key, revalidating = previous.is_some(), "starting fetch");

    let (tx, rx) = oneshot::channel();
    let future = fetcher();
    tokio::spawn(async move {
      // Ignore send errors - the entry may have been replaced meanwhile
      let _ = tx.send(future.await);
    });

    let entry = CacheEntry::pending(key.clone(), previous);
    self.in_flight.insert(key.clone(), rx);
    self.entries.insert(key, entry.clone());
    entry
  }

  /// Apply finished fetches. Returns the keys whose entries changed.
  ///
  /// Call this on every event loop tick.
  pub fn poll(&mut self) -> Vec<QueryKey> {
    let entries = &mut self.entries;
    let last_used = &mut self.last_used;
    let mut changed = Vec::new();

    self.in_flight.retain(|key, rx| {
      let entry = match rx.try_recv() {
        Err(oneshot::error::TryRecvError::Empty) => return true,
        Ok(Ok(value)) => {
          debug!(key = %key, "fetch resolved");
          CacheEntry::resolved(key.clone(), Arc::new(value), Some(Instant::now()))
        }
        Ok(Err(error)) => {
          warn!(key = %key, error = %error, "fetch failed");
          CacheEntry::failed(key.clone(), error)
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          // The fetch task ended without reporting (panicked or was aborted)
          warn!(key = %key, "fetch ended without a result");
          CacheEntry::failed(
            key.clone(),
            CatalogError::ServerFailure(format!("{}: fetch ended without a result", key.description())),
          )
        }
      };

      entries.insert(key.clone(), entry);
      last_used.insert(key.clone(), Instant::now());
      changed.push(key.clone());
      false
    });

    changed
  }

  /// Install a value obtained out of band as a resolved entry.
  pub fn seed(&mut self, key: QueryKey, value: V) {
    debug!(key = %key, "seeding entry");
    self.in_flight.remove(&key);
    let entry = CacheEntry::resolved(key.clone(), Arc::new(value), Some(Instant::now()));
    self.last_used.insert(key.clone(), Instant::now());
    self.entries.insert(key, entry);
  }

  /// Drop entries unused for at least `gc_time`. Returns the dropped keys.
  ///
  /// Keys in `observed` are on screen: they count as used now and are kept.
  /// Entries with a fetch in flight are always kept.
  pub fn collect_garbage(&mut self, gc_time: Duration, observed: &[QueryKey]) -> Vec<QueryKey> {
    let now = Instant::now();
    for key in observed {
      if self.entries.contains_key(key) {
        self.last_used.insert(key.clone(), now);
      }
    }

    let expired: Vec<QueryKey> = self
      .entries
      .keys()
      .filter(|key| !self.in_flight.contains_key(*key))
      .filter(|key| {
        self
          .last_used
          .get(*key)
          .map_or(true, |used| now.duration_since(*used) >= gc_time)
      })
      .cloned()
      .collect();

    for key in &expired {
      self.entries.remove(key);
      self.last_used.remove(key);
    }
    if !expired.is_empty() {
      debug!(dropped = expired.len(), remaining = self.entries.len(), "collected unused entries");
    }
    expired
  }


  /// Mark a resolved entry stale so the next `get` refetches it.
  pub fn invalidate(&mut self, key: &QueryKey) {
    let replacement = match self.entries.get(key).map(|e| &e.state) {
      Some(EntryState::Resolved(value)) => CacheEntry::resolved(key.clone(), Arc::clone(value), None),
      _ => return,
    };
    debug!(key = %key, "invalidating entry");
    self.entries.insert(key.clone(), replacement);
  }

  /// Read without side effects.
  pub fn peek(&self, key: &QueryKey) -> Option<&CacheEntry<V>> {
    self.entries.get(key)
  }

}

impl<V: Send + Sync + 'static> Default for QueryCache<V> {
  fn default() -> Self {
    Self::new()
  }
}
