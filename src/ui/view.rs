use crossterm::event::KeyEvent;
use ratatui::prelude::*;

use crate::cache::QueryKey;
use crate::catalog::CachedCatalog;

/// A keyboard shortcut hint for the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
  pub key: &'static str,
  pub label: &'static str,
}

impl Shortcut {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self { key, label }
  }
}

/// Actions a view asks the App to perform
pub enum ViewAction {
  None,
  /// Open a view on top of this one
  Push(Box<dyn View>),
  /// Close this view; closing the last one quits
  Pop,
}

/// A screen in the view stack.
///
/// Views own their session state and borrow the shared [`CachedCatalog`]:
/// mutably when reacting to input or ticks (which may start requests),
/// immutably when rendering.
pub trait View {
  fn handle_key(&mut self, key: KeyEvent, catalog: &mut CachedCatalog) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect, catalog: &CachedCatalog);

  fn breadcrumb_label(&self) -> String;

  /// Called on every event loop iteration, after finished fetches are applied
  fn tick(&mut self, _catalog: &mut CachedCatalog) {}

  /// Queries this view shows; they are kept in the cache while it is open
  fn observed_queries(&self) -> Vec<QueryKey> {
    Vec::new()
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![Shortcut::new("q", "back")]
  }
}
