//! Page tracking and data source selection for the movie list.

use crate::catalog::{CatalogError, DataSource, PAGE_SIZE};
use crate::format::format_number;

/// Tracks the current page and resets it when the committed term changes.
#[derive(Debug, Clone)]
pub struct Pagination {
  current_page: u32,
  /// Last term seen by `observe_term`; `None` until the first observation
  observed_term: Option<String>,
}

impl Default for Pagination {
  fn default() -> Self {
    Self::new()
  }
}

impl Pagination {
  pub fn new() -> Self {
    Self {
      current_page: 1,
      observed_term: None,
    }
  }

  pub fn current_page(&self) -> u32 {
    self.current_page
  }

  /// Record the committed term. Returns true when this reset the page to 1.
  ///
  /// The first observation never resets, and neither does observing the
  /// same term again.
  pub fn observe_term(&mut self, term: &str) -> bool {
    let changed = match &self.observed_term {
      Some(previous) => previous != term,
      None => false,
    };
    if self.observed_term.as_deref() != Some(term) {
      self.observed_term = Some(term.to_string());
    }
    if changed {
      self.current_page = 1;
    }
    changed
  }

  /// Jump to `page`. Callers clamp against the known page count.
  pub fn set_page(&mut self, page: u32) -> Result<(), CatalogError> {
    if page == 0 {
      return Err(CatalogError::ValidationFailure(
        "page numbers start at 1".to_string(),
      ));
    }
    self.current_page = page;
    Ok(())
  }

  /// Back to page 1 without touching the observed term.
  pub fn reset(&mut self) {
    self.current_page = 1;
  }

  pub fn source(&self, term: &str) -> DataSource {
    select_source(term, self.current_page)
  }
}

/// Highest page TMDB serves, whatever `total_pages` claims.
pub const MAX_PAGE: u32 = 500;

/// Pick the source for a committed term and page.
pub fn select_source(term: &str, page: u32) -> DataSource {
  let term = term.trim();
  if !term.is_empty() {
    DataSource::Search {
      term: term.to_string(),
      page,
    }
  } else if page == 1 {
    DataSource::InitialPage
  } else {
    DataSource::Popular { page }
  }
}

/// A slot in the pagination bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot {
  Page(u32),
  Ellipsis,
}

/// Buttons to show in the pagination bar.
///
/// Shows every page when they fit; otherwise the first and last page, the
/// current page with its neighbours, and ellipses for the gaps.
pub fn page_window(current: u32, total: u32, max_visible: u32) -> Vec<PageSlot> {
  if total <= max_visible {
    return (1..=total).map(PageSlot::Page).collect();
  }

  let mut slots = vec![PageSlot::Page(1)];
  let left = current.saturating_sub(1).max(2);
  let right = (current + 1).min(total - 1);
  let left_gap = left > 2;
  let right_gap = right < total - 1;

  match (left_gap, right_gap) {
    (false, true) => {
      slots.extend((2..max_visible).map(PageSlot::Page));
      slots.push(PageSlot::Ellipsis);
    }
    (true, false) => {
      slots.push(PageSlot::Ellipsis);
      slots.extend((total + 2 - max_visible..total).map(PageSlot::Page));
    }
    _ => {
      slots.push(PageSlot::Ellipsis);
      slots.extend((left..=right).map(PageSlot::Page));
      slots.push(PageSlot::Ellipsis);
    }
  }

  slots.push(PageSlot::Page(total));
  slots
}

/// "Showing 21-40 of 10,000 results", or `None` when there is nothing to show.
pub fn range_label(page: u32, total_results: u64) -> Option<String> {
  if total_results == 0 || page == 0 {
    return None;
  }
  let size = u64::from(PAGE_SIZE);
  let start = u64::from(page - 1) * size + 1;
  let end = (u64::from(page) * size).min(total_results);
  Some(format!(
    "Showing {}-{} of {} results",
    format_number(start),
    format_number(end),
    format_number(total_results)
  ))
}
