//! In-memory catalog for orchestration tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::types::{CatalogItem, CatalogItemDetail, Page};
use super::{Catalog, CatalogError, PAGE_SIZE};
use crate::cache::QueryKey;

/// Catalog that answers from generated fixtures and records every call.
///
/// Pages are synthesized from the page number, so any page exists up to
/// `total_pages`. Individual keys can be made to fail with [`MockCatalog::fail`].
pub struct MockCatalog {
  calls: Mutex<Vec<QueryKey>>,
  failures: Mutex<HashMap<QueryKey, CatalogError>>,
  empty_searches: Mutex<Vec<String>>,
  delay: Duration,
  total_pages: u32,
}

impl MockCatalog {
  pub fn new() -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      failures: Mutex::new(HashMap::new()),
      empty_searches: Mutex::new(Vec::new()),
      delay: Duration::ZERO,
      total_pages: 500,
    }
  }

  /// Every call sleeps this long before answering
  pub fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = delay;
    self
  }

  pub fn with_total_pages(mut self, total_pages: u32) -> Self {
    self.total_pages = total_pages;
    self
  }

  /// Make every request for `key` fail with `error`.
  pub fn fail(&self, key: QueryKey, error: CatalogError) {
    self.failures.lock().unwrap().insert(key, error);
  }

  /// Let a failing key succeed again.
  pub fn recover(&self, key: &QueryKey) {
    self.failures.lock().unwrap().remove(key);
  }

  /// Searches for `term` return no results.
  pub fn no_results_for(&self, term: &str) {
    self.empty_searches.lock().unwrap().push(term.to_string());
  }

  /// Requests made so far, in order.
  pub fn calls(&self) -> Vec<QueryKey> {
    self.calls.lock().unwrap().clone()
  }

  pub fn call_count(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  async fn answer(&self, key: QueryKey) -> Result<(), CatalogError> {
    self.calls.lock().unwrap().push(key.clone());
    if !self.delay.is_zero() {
      tokio::time::sleep(self.delay).await;
    }
    match self.failures.lock().unwrap().get(&key) {
      Some(err) => Err(err.clone()),
      None => Ok(()),
    }
  }
}

#[async_trait]
impl Catalog for MockCatalog {
  async fn list_popular(&self, page_number: u32) -> Result<Page<CatalogItem>, CatalogError> {
    self.answer(QueryKey::popular(page_number)).await?;
    Ok(page(page_number, PAGE_SIZE, self.total_pages))
  }

  async fn get_detail(&self, id: u64) -> Result<CatalogItemDetail, CatalogError> {
    self.answer(QueryKey::detail(id)).await?;
    Ok(detail(id))
  }

  async fn search(&self, term: &str, page_number: u32) -> Result<Page<CatalogItem>, CatalogError> {
    self.answer(QueryKey::search(term, page_number)).await?;
    let empty = self
      .empty_searches
      .lock()
      .unwrap()
      .iter()
      .any(|t| t == term.trim());
    if empty {
      return Ok(Page {
        items: Vec::new(),
        page_number,
        total_pages: 0,
        total_results: 0,
      });
    }
    let mut result = page(page_number, PAGE_SIZE, 10);
    for movie in &mut result.items {
      movie.title = format!("{} {}", term.trim(), movie.id);
    }
    Ok(result)
  }
}

pub fn item(id: u64) -> CatalogItem {
  CatalogItem {
    id,
    title: format!("Movie {}", id),
    original_title: format!("Movie {}", id),
    overview: String::from("A film."),
    poster_path: Some(format!("/poster{}.jpg", id)),
    backdrop_path: None,
    vote_average: 7.5,
    vote_count: 1200,
    release_date: NaiveDate::from_ymd_opt(2020, 5, 17),
    popularity: 88.2,
    original_language: String::from("en"),
    genre_ids: vec![28, 12],
    adult: false,
  }
}

/// Page `n` with `count` items whose ids continue from the previous pages.
pub fn page(n: u32, count: u32, total_pages: u32) -> Page<CatalogItem> {
  let first = u64::from(n.saturating_sub(1)) * u64::from(PAGE_SIZE) + 1;
  Page {
    items: (first..first + u64::from(count)).map(item).collect(),
    page_number: n,
    total_pages,
    total_results: u64::from(total_pages) * u64::from(PAGE_SIZE),
  }
}

pub fn detail(id: u64) -> CatalogItemDetail {
  CatalogItemDetail {
    item: item(id),
    budget: 63_000_000,
    revenue: 100_853_753,
    runtime: Some(139),
    status: String::from("Released"),
    tagline: String::from("Mischief. Mayhem. Soap."),
    genres: Vec::new(),
    production_companies: Vec::new(),
    production_countries: Vec::new(),
    spoken_languages: Vec::new(),
  }
}
