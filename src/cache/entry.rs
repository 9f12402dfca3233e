//! Cache entries and their lifecycle states.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use super::key::QueryKey;
use crate::catalog::CatalogError;

/// Lifecycle state of a cache entry
#[derive(Debug)]
pub enum EntryState<V> {
  /// Disabled key that has never been fetched
  Idle,
  /// A fetch is in flight. `previous` holds the stale value being revalidated, if any.
  Pending { previous: Option<Arc<V>> },
  /// Last fetch succeeded
  Resolved(Arc<V>),
  /// Last fetch failed
  Failed(CatalogError),
}

impl<V> Clone for EntryState<V> {
  fn clone(&self) -> Self {
    match self {
      Self::Idle => Self::Idle,
      Self::Pending { previous } => Self::Pending {
        previous: previous.clone(),
      },
      Self::Resolved(value) => Self::Resolved(Arc::clone(value)),
      Self::Failed(err) => Self::Failed(err.clone()),
    }
  }
}

impl<V> EntryState<V> {
  pub fn is_pending(&self) -> bool {
    matches!(self, Self::Pending { .. })
  }

  /// Nothing to show yet: idle, or pending without a previous value.
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Idle | Self::Pending { previous: None })
  }

  /// The value to display: the resolved value, or the stale one during revalidation.
  pub fn data(&self) -> Option<&Arc<V>> {
    match self {
      Self::Resolved(value) => Some(value),
      Self::Pending { previous } => previous.as_ref(),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&CatalogError> {
    match self {
      Self::Failed(err) => Some(err),
      _ => None,
    }
  }
}

/// One cached request.
///
/// Entries are never patched: every state transition builds a new entry and
/// replaces the old one in the cache map.
#[derive(Debug)]
pub struct CacheEntry<V> {
  pub key: QueryKey,
  pub state: EntryState<V>,
  /// When the current value was fetched; `None` once invalidated
  pub fetched_at: Option<Instant>,
}

impl<V> Clone for CacheEntry<V> {
  fn clone(&self) -> Self {
    Self {
      key: self.key.clone(),
      state: self.state.clone(),
      fetched_at: self.fetched_at,
    }
  }
}

impl<V> CacheEntry<V> {
  pub(super) fn idle(key: QueryKey) -> Self {
    Self {
      key,
      state: EntryState::Idle,
      fetched_at: None,
    }
  }

  pub(super) fn pending(key: QueryKey, previous: Option<Arc<V>>) -> Self {
    Self {
      key,
      state: EntryState::Pending { previous },
      fetched_at: None,
    }
  }

  pub(super) fn resolved(key: QueryKey, value: Arc<V>, fetched_at: Option<Instant>) -> Self {
    Self {
      key,
      state: EntryState::Resolved(value),
      fetched_at,
    }
  }

  pub(super) fn failed(key: QueryKey, error: CatalogError) -> Self {
    Self {
      key,
      state: EntryState::Failed(error),
      fetched_at: None,
    }
  }

  /// A resolved entry is fresh while `now - fetched_at < stale_time`.
  pub fn is_stale(&self, now: Instant, stale_time: Duration) -> bool {
    match (&self.state, self.fetched_at) {
      (EntryState::Resolved(_), Some(fetched_at)) => now.duration_since(fetched_at) >= stale_time,
      (EntryState::Resolved(_), None) => true,
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loading_only_without_data() {
    let fresh: EntryState<i32> = EntryState::Pending { previous: None };
    assert!(fresh.is_loading());

    let revalidating = EntryState::Pending {
      previous: Some(Arc::new(1)),
    };
    assert!(!revalidating.is_loading());
    assert!(revalidating.is_pending());
    assert_eq!(revalidating.data().map(|v| **v), Some(1));

    assert!(EntryState::<i32>::Idle.is_loading());
  }

  #[test]
  fn test_staleness_window() {
    let start = Instant::now();
    let entry = CacheEntry::resolved(QueryKey::popular(2), Arc::new(7), Some(start));
    let window = Duration::from_secs(60);

    assert!(!entry.is_stale(start, window));
    assert!(!entry.is_stale(start + Duration::from_secs(59), window));
    assert!(entry.is_stale(start + Duration::from_secs(60), window));
  }

  #[test]
  fn test_invalidated_entry_is_stale() {
    let entry = CacheEntry::resolved(QueryKey::popular(2), Arc::new(7), None);
    assert!(entry.is_stale(Instant::now(), Duration::from_secs(3600)));
  }

  #[test]
  fn test_failed_entry_is_not_stale() {
    let entry: CacheEntry<i32> =
      CacheEntry::failed(QueryKey::detail(1), CatalogError::NotFound("movie 1".into()));
    assert!(!entry.is_stale(Instant::now(), Duration::ZERO));
    assert!(entry.state.error().is_some());
  }
}
