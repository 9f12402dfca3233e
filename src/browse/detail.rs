//! State of the movie detail page.

use std::sync::Arc;

use crate::catalog::{CachedCatalog, CatalogError, CatalogItemDetail};

/// What the detail page shows
#[derive(Debug, Clone)]
pub enum DetailState {
  Loading,
  /// The catalog has no movie with this id
  NotFound,
  Error(CatalogError),
  Ready(Arc<CatalogItemDetail>),
}

/// Drives the detail page for one movie.
#[derive(Debug, Clone)]
pub struct DetailSession {
  id: u64,
  requested: bool,
}

impl DetailSession {
  pub fn new(id: u64) -> Self {
    Self {
      id,
      requested: false,
    }
  }

  pub fn id(&self) -> u64 {
    self.id
  }

  /// Request the details the first time this is called.
  pub fn sync(&mut self, catalog: &mut CachedCatalog) -> bool {
    if self.requested {
      return false;
    }
    catalog.request_detail(self.id);
    self.requested = true;
    true
  }

  pub fn retry(&mut self, catalog: &mut CachedCatalog) {
    catalog.request_detail(self.id);
    self.requested = true;
  }

  pub fn state(&self, catalog: &CachedCatalog) -> DetailState {
    let Some(entry) = catalog.detail_entry(self.id) else {
      return DetailState::Loading;
    };

    if entry.state.is_loading() {
      return DetailState::Loading;
    }
    match (entry.state.error(), entry.state.data()) {
      (Some(err), _) if err.is_not_found() => DetailState::NotFound,
      (Some(err), _) => DetailState::Error(err.clone()),
      (None, Some(detail)) => DetailState::Ready(Arc::clone(detail)),
      (None, None) => DetailState::Loading,
    }
  }
}
