//! Folding a list query's cache state into a single render state.

use std::sync::Arc;

use crate::cache::EntryState;
use crate::catalog::{CatalogError, CatalogItem, Page};

/// What the movie list shows. Exactly one per render.
#[derive(Debug, Clone)]
pub enum ViewModel {
  Loading,
  Error(CatalogError),
  Empty,
  Success {
    page: Arc<Page<CatalogItem>>,
    current_page: u32,
    total_pages: u32,
    total_results: u64,
  },
}

impl ViewModel {
  pub fn is_loading(&self) -> bool {
    matches!(self, Self::Loading)
  }

  pub fn items(&self) -> &[CatalogItem] {
    match self {
      Self::Success { page, .. } => &page.items,
      _ => &[],
    }
  }
}

/// Merge the active query's state. First match wins:
/// loading, then error, then empty, then success.
///
/// A revalidating entry still has data and renders it.
pub fn merge(state: Option<&EntryState<Page<CatalogItem>>>, current_page: u32) -> ViewModel {
  let Some(state) = state else {
    return ViewModel::Loading;
  };

  if state.is_loading() {
    return ViewModel::Loading;
  }
  if let Some(err) = state.error() {
    return ViewModel::Error(err.clone());
  }
  match state.data() {
    Some(page) if !page.is_empty() => ViewModel::Success {
      page: Arc::clone(page),
      current_page,
      total_pages: page.total_pages,
      total_results: page.total_results,
    },
    _ => ViewModel::Empty,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::testing;

  fn resolved(count: u32) -> EntryState<Page<CatalogItem>> {
    EntryState::Resolved(Arc::new(testing::page(1, count, 3)))
  }

  #[test]
  fn test_missing_entry_is_loading() {
    assert!(merge(None, 1).is_loading());
  }

  #[test]
  fn test_pending_without_data_is_loading() {
    let state = EntryState::Pending { previous: None };
    assert!(merge(Some(&state), 1).is_loading());
  }

  #[test]
  fn test_failure_is_error_not_empty() {
    let state = EntryState::Failed(CatalogError::ServerFailure("boom".into()));
    match merge(Some(&state), 1) {
      ViewModel::Error(CatalogError::ServerFailure(msg)) => assert_eq!(msg, "boom"),
      other => panic!("expected server failure, got {:?}", other),
    }
  }

  #[test]
  fn test_no_items_is_empty() {
    assert!(matches!(merge(Some(&resolved(0)), 1), ViewModel::Empty));
  }

  #[test]
  fn test_items_are_success() {
    match merge(Some(&resolved(20)), 1) {
      ViewModel::Success {
        page,
        current_page,
        total_pages,
        total_results,
      } => {
        assert_eq!(page.items.len(), 20);
        assert_eq!(current_page, 1);
        assert_eq!(total_pages, 3);
        assert_eq!(total_results, 60);
      }
      other => panic!("expected success, got {:?}", other),
    }
  }

  #[test]
  fn test_revalidating_entry_keeps_showing_data() {
    let state = EntryState::Pending {
      previous: Some(Arc::new(testing::page(2, 20, 3))),
    };
    let view = merge(Some(&state), 2);
    assert_eq!(view.items().len(), 20);
  }
}
