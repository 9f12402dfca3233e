use crate::catalog::CachedCatalog;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::view::{Shortcut, View, ViewAction};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::{debug, info};

/// Main application state
pub struct App {
  /// Navigation stack; the root view is at index 0
  views: Vec<Box<dyn View>>,

  /// Shared by every view for the whole session
  catalog: CachedCatalog,

  /// Catalog host, shown in the header
  host: String,

  tick_rate: Duration,

  should_quit: bool,
}

impl App {
  pub fn new(catalog: CachedCatalog, host: String, tick_rate: Duration, root: Box<dyn View>) -> Self {
    Self {
      views: vec![root],
      catalog,
      host,
      tick_rate,
      should_quit: false,
    }
  }

  /// Open `view` on top of the stack
  pub fn push(&mut self, view: Box<dyn View>) {
    debug!(view = %view.breadcrumb_label(), "push view");
    self.views.push(view);
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    info!("exiting");

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(self.tick_rate);
    self.tick();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Resize) | Some(Event::Tick) => {}
        None => break,
      }
      // Also after keys, so a page change starts loading before the next draw
      self.tick();
    }

    Ok(())
  }

  /// Apply finished fetches, let the top view react, then drop queries
  /// no open view has used for a while
  fn tick(&mut self) {
    self.catalog.poll();
    if let Some(view) = self.views.last_mut() {
      view.tick(&mut self.catalog);
    }

    let observed: Vec<_> = self
      .views
      .iter()
      .flat_map(|view| view.observed_queries())
      .collect();
    self.catalog.collect_garbage(&observed);
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let Some(view) = self.views.last_mut() else {
      self.should_quit = true;
      return;
    };

    match view.handle_key(key, &mut self.catalog) {
      ViewAction::None => {}
      ViewAction::Push(view) => self.push(view),
      ViewAction::Pop => {
        if self.views.len() > 1 {
          if let Some(view) = self.views.pop() {
            debug!(view = %view.breadcrumb_label(), "pop view");
          }
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  pub fn render_view(&mut self, frame: &mut Frame, area: Rect) {
    if let Some(view) = self.views.last_mut() {
      view.render(frame, area, &self.catalog);
    }
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn shortcuts(&self) -> Vec<Shortcut> {
    self
      .views
      .last()
      .map(|view| view.shortcuts())
      .unwrap_or_default()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self.views.iter().map(|v| v.breadcrumb_label()).collect()
  }
}
