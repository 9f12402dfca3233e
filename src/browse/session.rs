//! State of the movie list: search box, committed term, page, active query.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use super::debounce::Debouncer;
use super::pagination::{Pagination, MAX_PAGE};
use super::view_model::{merge, ViewModel};
use crate::cache::QueryKey;
use crate::catalog::{CachedCatalog, CatalogError, DataSource};

/// Drives the movie list.
///
/// Inputs are raw search text, page requests and clear-search. The session
/// turns them into a committed term and a page, derives the active
/// [`DataSource`] from those, and requests it from the [`CachedCatalog`]
/// whenever the active key changes. Failed requests are only repeated on
/// [`BrowseSession::retry`].
pub struct BrowseSession {
  raw_term: String,
  debouncer: Debouncer<String>,
  committed_term: String,
  pagination: Pagination,
  /// Key most recently requested from the catalog
  synced: Option<QueryKey>,
  /// Page count of the current listing, kept while its next page loads
  known_total_pages: Option<u32>,
}

impl BrowseSession {
  pub fn new(debounce: Duration) -> Self {
    let mut pagination = Pagination::new();
    pagination.observe_term("");

    Self {
      raw_term: String::new(),
      debouncer: Debouncer::new(debounce),
      committed_term: String::new(),
      pagination,
      synced: None,
      known_total_pages: None,
    }
  }

  /// Start with `term` already committed, skipping the debounce.
  pub fn with_search(debounce: Duration, term: &str) -> Self {
    let mut session = Self::new(debounce);
    session.raw_term = term.to_string();
    session.commit(term.to_string());
    session
  }

  pub fn raw_term(&self) -> &str {
    &self.raw_term
  }

  pub fn committed_term(&self) -> &str {
    &self.committed_term
  }

  pub fn current_page(&self) -> u32 {
    self.pagination.current_page()
  }

  pub fn is_search_active(&self) -> bool {
    !self.committed_term.trim().is_empty()
  }

  /// The search box changed. The term is committed once typing pauses.
  pub fn set_raw_term(&mut self, text: &str, now: Instant) {
    if text == self.raw_term {
      return;
    }
    self.raw_term = text.to_string();
    self.debouncer.input(self.raw_term.clone(), now);
  }

  fn commit(&mut self, term: String) {
    if self.pagination.observe_term(term.trim()) {
      debug!(term = %term.trim(), "search term changed, back to page 1");
      self.known_total_pages = None;
    }
    self.committed_term = term;
  }

  /// Commit debounced input, then request the active source if it changed.
  /// Returns true when a request was issued.
  pub fn tick(&mut self, now: Instant, catalog: &mut CachedCatalog) -> bool {
    if let Some(term) = self.debouncer.poll(now) {
      self.commit(term);
    }
    let requested = self.sync(catalog);
    self.remember_total_pages(catalog);
    requested
  }

  /// Request the active source unless it is the one requested last.
  pub fn sync(&mut self, catalog: &mut CachedCatalog) -> bool {
    let source = self.active_source();
    let key = source.key();
    if self.synced.as_ref() == Some(&key) {
      return false;
    }

    debug!(key = %key, "active source changed");
    catalog.request(&source);
    self.synced = Some(key);
    true
  }

  /// Request the active source again. Joins an in-flight fetch, refetches
  /// a failed or stale one, and leaves a fresh one alone.
  pub fn retry(&mut self, catalog: &mut CachedCatalog) {
    let source = self.active_source();
    debug!(key = %source.key(), "retrying");
    catalog.request(&source);
    self.synced = Some(source.key());
  }

  /// Throw away the cached copy of the active page and load it again.
  pub fn refresh(&mut self, catalog: &mut CachedCatalog) {
    let source = self.active_source();
    debug!(key = %source.key(), "refreshing");
    catalog.invalidate(&source.key());
    catalog.request(&source);
    self.synced = Some(source.key());
  }

  pub fn request_page(&mut self, page: u32) -> Result<(), CatalogError> {
    self.pagination.set_page(page)
  }

  /// Returns false when already on the last known page.
  pub fn next_page(&mut self, catalog: &CachedCatalog) -> bool {
    let current = self.current_page();
    match self.total_pages(catalog) {
      Some(total) if current < total => self.pagination.set_page(current + 1).is_ok(),
      _ => false,
    }
  }

  pub fn previous_page(&mut self) -> bool {
    let current = self.current_page();
    current > 1 && self.pagination.set_page(current - 1).is_ok()
  }

  pub fn first_page(&mut self) -> bool {
    if self.current_page() == 1 {
      return false;
    }
    self.pagination.reset();
    true
  }

  pub fn last_page(&mut self, catalog: &CachedCatalog) -> bool {
    match self.total_pages(catalog) {
      Some(total) if total > self.current_page() => self.pagination.set_page(total).is_ok(),
      _ => false,
    }
  }

  /// Empty the search box and go back to the first page of the popular
  /// listing in one step.
  pub fn clear_search(&mut self) {
    self.raw_term.clear();
    let term = self.debouncer.commit_now(String::new());
    self.commit(term);
    self.pagination.reset();
  }

  pub fn active_source(&self) -> DataSource {
    self.pagination.source(&self.committed_term)
  }

  pub fn active_key(&self) -> QueryKey {
    self.active_source().key()
  }

  pub fn view_model(&self, catalog: &CachedCatalog) -> ViewModel {
    let entry = catalog.page_entry(&self.active_key());
    merge(entry.map(|e| &e.state), self.current_page())
  }

  /// Navigable page count of the current listing
  fn total_pages(&self, catalog: &CachedCatalog) -> Option<u32> {
    catalog
      .page_entry(&self.active_key())
      .and_then(|e| e.state.data())
      .map(|page| page.total_pages)
      .or(self.known_total_pages)
      .map(|total| total.min(MAX_PAGE))
  }

  fn remember_total_pages(&mut self, catalog: &CachedCatalog) {
    if let Some(page) = catalog
      .page_entry(&self.active_key())
      .and_then(|e| e.state.data())
    {
      self.known_total_pages = Some(page.total_pages);
    }
  }
}
