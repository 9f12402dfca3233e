//! Catalog client with per-session query caching.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::{CacheEntry, EntryState, QueryCache, QueryKey, QueryOptions};

use super::types::{CatalogItem, CatalogItemDetail, Page};
use super::Catalog;

/// Where the list view gets its current page from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
  /// Title search for a committed, non-empty term
  Search { term: String, page: u32 },
  /// First page of the popular listing, loaded before the UI started
  InitialPage,
  /// Any later page of the popular listing
  Popular { page: u32 },
}

impl DataSource {
  pub fn key(&self) -> QueryKey {
    match self {
      Self::Search { term, page } => QueryKey::search(term, *page),
      Self::InitialPage => QueryKey::popular(1),
      Self::Popular { page } => QueryKey::popular(*page),
    }
  }
}

/// Catalog with transparent caching.
///
/// Owns the catalog client and one [`QueryCache`] per value type. There is
/// one per session; views borrow it mutably for requests and immutably for
/// rendering.
pub struct CachedCatalog {
  catalog: Arc<dyn Catalog>,
  pages: QueryCache<Page<CatalogItem>>,
  details: QueryCache<CatalogItemDetail>,
  options: QueryOptions,
}

impl CachedCatalog {
  pub fn new(catalog: Arc<dyn Catalog>, stale_time: Duration) -> Self {
    Self {
      catalog,
      pages: QueryCache::new(),
      details: QueryCache::new(),
      options: QueryOptions::default().with_stale_time(stale_time),
    }
  }

  /// Keep unused entries for `gc_time` before dropping them.
  pub fn with_gc_time(mut self, gc_time: Duration) -> Self {
    self.options = self.options.with_gc_time(gc_time);
    self
  }

  /// Hand over the popular page 1 fetched at startup.
  pub fn seed_initial_page(&mut self, page: Page<CatalogItem>) {
    info!(
      items = page.items.len(),
      total_pages = page.total_pages,
      "seeding initial page"
    );
    self.pages.seed(DataSource::InitialPage.key(), page);
  }

  /// Request the page behind `source`.
  ///
  /// The initial page is served from its seed without ever going stale; it
  /// is only fetched when there is no usable seed.
  pub fn request(&mut self, source: &DataSource) -> CacheEntry<Page<CatalogItem>> {
    let key = source.key();
    let options = match source {
      DataSource::InitialPage => {
        // An invalidated seed has no fetch time and is fetched again
        let seeded = self
          .pages
          .peek(&key)
          .is_some_and(|e| matches!(e.state, EntryState::Resolved(_)) && e.fetched_at.is_some());
        self.options.enabled(!seeded)
      }
      _ => self.options,
    };

    let catalog = Arc::clone(&self.catalog);
    let source = source.clone();
    self.pages.get(&key, options, move || async move {
      match source {
        DataSource::Search { term, page } => catalog.search(&term, page).await,
        DataSource::InitialPage => catalog.list_popular(1).await,
        DataSource::Popular { page } => catalog.list_popular(page).await,
      }
    })
  }

  pub fn request_detail(&mut self, id: u64) -> CacheEntry<CatalogItemDetail> {
    let catalog = Arc::clone(&self.catalog);
    self
      .details
      .get(&QueryKey::detail(id), self.options, move || async move {
        catalog.get_detail(id).await
      })
  }

  pub fn page_entry(&self, key: &QueryKey) -> Option<&CacheEntry<Page<CatalogItem>>> {
    self.pages.peek(key)
  }

  pub fn detail_entry(&self, id: u64) -> Option<&CacheEntry<CatalogItemDetail>> {
    self.details.peek(&QueryKey::detail(id))
  }

  /// Apply finished fetches. Returns true when anything changed.
  pub fn poll(&mut self) -> bool {
    let pages = self.pages.poll();
    let details = self.details.poll();
    if !pages.is_empty() || !details.is_empty() {
      debug!(pages = pages.len(), details = details.len(), "fetches settled");
      return true;
    }
    false
  }

  /// Drop entries no view has used for the gc window.
  ///
  /// `observed` are the keys currently on screen. The initial page is always
  /// kept, since dropping it would turn the seed into a fetch.
  pub fn collect_garbage(&mut self, observed: &[QueryKey]) -> usize {
    let mut keep = observed.to_vec();
    keep.push(DataSource::InitialPage.key());

    let gc_time = self.options.gc_time;
    let dropped = self.pages.collect_garbage(gc_time, &keep).len()
      + self.details.collect_garbage(gc_time, &keep).len();
    if dropped > 0 {
      debug!(dropped, "dropped unused queries");
    }
    dropped
  }

  /// Mark a cached result stale so the next request refetches it.
  pub fn invalidate(&mut self, key: &QueryKey) {
    match key {
      QueryKey::Detail { .. } => self.details.invalidate(key),
      _ => self.pages.invalidate(key),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::testing::{self, MockCatalog};
  use crate::catalog::CatalogError;

  fn cached(mock: &Arc<MockCatalog>) -> CachedCatalog {
    CachedCatalog::new(mock.clone(), Duration::from_secs(300))
  }

  async fn settle(catalog: &mut CachedCatalog) -> bool {
    tokio::time::sleep(Duration::from_millis(5)).await;
    catalog.poll()
  }

  #[tokio::test]
  async fn test_seeded_initial_page_needs_no_fetch() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);
    catalog.seed_initial_page(testing::page(1, 20, 500));

    let entry = catalog.request(&DataSource::InitialPage);

    assert_eq!(entry.state.data().unwrap().items.len(), 20);
    assert_eq!(mock.call_count(), 0);
  }

  #[tokio::test(start_paused = true)]
  async fn test_seed_never_goes_stale() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);
    catalog.seed_initial_page(testing::page(1, 20, 500));

    tokio::time::advance(Duration::from_secs(3600)).await;
    let entry = catalog.request(&DataSource::InitialPage);
    settle(&mut catalog).await;

    assert!(!entry.state.is_pending());
    assert_eq!(mock.call_count(), 0);
  }

  #[tokio::test]
  async fn test_initial_page_fetches_without_seed() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);

    let entry = catalog.request(&DataSource::InitialPage);
    assert!(entry.state.is_loading());
    assert!(settle(&mut catalog).await);

    assert_eq!(mock.calls(), vec![QueryKey::popular(1)]);
    let entry = catalog.page_entry(&QueryKey::popular(1)).unwrap();
    assert_eq!(entry.state.data().unwrap().page_number, 1);
  }

  #[tokio::test]
  async fn test_sources_route_to_operations() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);

    catalog.request(&DataSource::Popular { page: 3 });
    catalog.request(&DataSource::Search {
      term: "batman".into(),
      page: 2,
    });
    catalog.request_detail(550);
    settle(&mut catalog).await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.contains(&QueryKey::popular(3)));
    assert!(calls.contains(&QueryKey::search("batman", 2)));
    assert!(calls.contains(&QueryKey::detail(550)));
    assert!(catalog.detail_entry(550).unwrap().state.data().is_some());
  }

  #[tokio::test]
  async fn test_unknown_detail_fails_with_not_found() {
    let mock = Arc::new(MockCatalog::new());
    mock.fail(
      QueryKey::detail(999_999_999),
      CatalogError::NotFound("movie 999999999".into()),
    );
    let mut catalog = cached(&mock);

    catalog.request_detail(999_999_999);
    settle(&mut catalog).await;

    let err = catalog.detail_entry(999_999_999).unwrap().state.error().cloned();
    assert!(matches!(err, Some(CatalogError::NotFound(_))));
  }

  #[tokio::test]
  async fn test_invalidated_seed_is_refetched() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);
    catalog.seed_initial_page(testing::page(1, 20, 500));

    catalog.invalidate(&DataSource::InitialPage.key());
    let entry = catalog.request(&DataSource::InitialPage);
    // The seed stays visible while it reloads
    assert!(entry.state.is_pending());
    assert_eq!(entry.state.data().unwrap().items.len(), 20);
    settle(&mut catalog).await;

    assert_eq!(mock.calls(), vec![QueryKey::popular(1)]);
  }

  #[tokio::test]
  async fn test_invalidate_refetches_page() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock);
    let source = DataSource::Popular { page: 2 };

    catalog.request(&source);
    settle(&mut catalog).await;
    catalog.request(&source);
    assert_eq!(mock.call_count(), 1);

    catalog.invalidate(&source.key());
    let entry = catalog.request(&source);
    assert!(entry.state.is_pending());
    settle(&mut catalog).await;
    assert_eq!(mock.call_count(), 2);
  }

  #[tokio::test(start_paused = true)]
  async fn test_garbage_collection_keeps_seed_and_observed_keys() {
    let mock = Arc::new(MockCatalog::new());
    let mut catalog = cached(&mock).with_gc_time(Duration::from_secs(300));
    catalog.seed_initial_page(testing::page(1, 20, 500));

    for page in 2..=6 {
      catalog.request(&DataSource::Popular { page });
    }
    catalog.request_detail(550);
    catalog.request_detail(551);
    settle(&mut catalog).await;

    tokio::time::advance(Duration::from_secs(3600)).await;
    let shown = [QueryKey::popular(4), QueryKey::detail(550)];
    assert_eq!(catalog.collect_garbage(&shown), 5);

    assert!(catalog.page_entry(&QueryKey::popular(1)).is_some());
    assert!(catalog.page_entry(&QueryKey::popular(4)).is_some());
    assert!(catalog.page_entry(&QueryKey::popular(2)).is_none());
    assert!(catalog.detail_entry(550).is_some());
    assert!(catalog.detail_entry(551).is_none());

    // The seed is still served without a fetch
    let calls = mock.call_count();
    catalog.request(&DataSource::InitialPage);
    assert_eq!(mock.call_count(), calls);
  }
}
