use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use std::time::Duration;
use tokio::time::Instant;

use crate::browse::pagination::MAX_PAGE;
use crate::browse::{page_window, range_label, BrowseSession, PageSlot, ViewModel};
use crate::cache::QueryKey;
use crate::catalog::{CachedCatalog, CatalogError, CatalogItem};
use crate::format::{format_rating, format_year};
use crate::ui::components::{KeyResult, SearchBar, SearchEvent};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{rating_color, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::MovieDetailView;

/// Page buttons shown in the pagination bar
const MAX_VISIBLE_PAGES: u32 = 5;

/// Popular movies and title search, one page at a time
pub struct MovieListView {
  session: BrowseSession,
  search: SearchBar,
  list_state: ListState,
  image_base_url: String,
}

impl MovieListView {
  pub fn new(debounce: Duration, image_base_url: String) -> Self {
    Self {
      session: BrowseSession::new(debounce),
      search: SearchBar::new(),
      list_state: ListState::default(),
      image_base_url,
    }
  }

  /// Start on the results for `term`
  pub fn with_search(debounce: Duration, image_base_url: String, term: &str) -> Self {
    Self {
      session: BrowseSession::with_search(debounce, term),
      search: SearchBar::with_value(term),
      list_state: ListState::default(),
      image_base_url,
    }
  }

  /// Request the new active page and jump to its first row
  fn page_changed(&mut self, changed: bool, catalog: &mut CachedCatalog) {
    if changed {
      self.session.sync(catalog);
      self.list_state.select(Some(0));
    }
  }

  fn selected_movie(&self, catalog: &CachedCatalog) -> Option<CatalogItem> {
    let index = self.list_state.selected()?;
    self
      .session
      .view_model(catalog)
      .items()
      .get(index)
      .cloned()
  }

  fn title(&self) -> String {
    if self.session.is_search_active() {
      format!(" Search: \"{}\" ", self.session.committed_term().trim())
    } else {
      " Popular Movies ".to_string()
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect, view: &ViewModel) {
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let page = match view {
      ViewModel::Success { page, .. } => page,
      ViewModel::Loading => {
        let paragraph = Paragraph::new("Loading movies...")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
      ViewModel::Error(err) => {
        frame.render_widget(error_message(err).block(block), area);
        return;
      }
      ViewModel::Empty => {
        let content = if self.session.is_search_active() {
          format!(
            "No Results\n\nNo movies match \"{}\". Try a different title.",
            self.session.committed_term().trim()
          )
        } else {
          "No movies found.".to_string()
        };
        let paragraph = Paragraph::new(content)
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
    };

    ensure_valid_selection(&mut self.list_state, page.items.len());
    let title_width = (area.width as usize).saturating_sub(24).max(10);

    let items: Vec<ListItem> = page
      .items
      .iter()
      .map(|movie| {
        let line = Line::from(vec![
          Span::raw(format!(
            "{:<width$}",
            truncate(&movie.title, title_width),
            width = title_width
          )),
          Span::raw(" "),
          Span::styled(
            format!("{:>4}", format_year(movie.release_date)),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw("  "),
          Span::styled(
            format!("★ {:>4}", format_rating(movie.vote_average)),
            Style::default().fg(rating_color(movie.vote_average)),
          ),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

/// Kind-specific error text with a retry hint
fn error_message(err: &CatalogError) -> Paragraph<'static> {
  let text = vec![
    Line::from(Span::styled(
      err.title(),
      Style::default().fg(Color::Red).bold(),
    )),
    Line::raw(""),
    Line::raw(err.message().to_string()),
    Line::raw(""),
    Line::from(Span::styled(
      "Press r to retry.",
      Style::default().fg(Color::DarkGray),
    )),
  ];
  Paragraph::new(text).wrap(Wrap { trim: true })
}

/// Page buttons plus "Showing X-Y of Z results"
fn pagination_line(view: &ViewModel) -> Line<'static> {
  let ViewModel::Success {
    current_page,
    total_pages,
    total_results,
    ..
  } = view
  else {
    return Line::raw("");
  };

  let mut spans = vec![Span::raw(" ")];
  let total = (*total_pages).min(MAX_PAGE);
  if total > 1 {
    spans.push(Span::styled("< ", Style::default().fg(Color::DarkGray)));
    for slot in page_window(*current_page, total, MAX_VISIBLE_PAGES) {
      let span = match slot {
        PageSlot::Page(n) if n == *current_page => Span::styled(
          format!("[{}]", n),
          Style::default().fg(Color::Black).bg(Color::Cyan).bold(),
        ),
        PageSlot::Page(n) => Span::styled(format!(" {} ", n), Style::default().fg(Color::White)),
        PageSlot::Ellipsis => Span::styled(" … ", Style::default().fg(Color::DarkGray)),
      };
      spans.push(span);
    }
    spans.push(Span::styled(" >", Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw("   "));
  }
  if let Some(label) = range_label(*current_page, *total_results) {
    spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
  }
  Line::from(spans)
}

impl View for MovieListView {
  fn handle_key(&mut self, key: KeyEvent, catalog: &mut CachedCatalog) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(text)) => {
        self.session.set_raw_term(&text, Instant::now());
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Cleared) => {
        self.session.clear_search();
        self.page_changed(true, catalog);
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled if self.search.is_focused() => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.list_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.list_state.select_previous(),
      KeyCode::Char('h') | KeyCode::Left => {
        let changed = self.session.previous_page();
        self.page_changed(changed, catalog);
      }
      KeyCode::Char('l') | KeyCode::Right => {
        let changed = self.session.next_page(catalog);
        self.page_changed(changed, catalog);
      }
      KeyCode::Char('g') => {
        let changed = self.session.first_page();
        self.page_changed(changed, catalog);
      }
      KeyCode::Char('G') => {
        let changed = self.session.last_page(catalog);
        self.page_changed(changed, catalog);
      }
      KeyCode::Char('r') => self.session.retry(catalog),
      KeyCode::Char('R') => self.session.refresh(catalog),
      KeyCode::Enter => {
        if let Some(movie) = self.selected_movie(catalog) {
          return ViewAction::Push(Box::new(MovieDetailView::new(
            movie.id,
            self.image_base_url.clone(),
            Some(movie.title),
          )));
        }
      }
      KeyCode::Char('q') => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, catalog: &CachedCatalog) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Search bar
        Constraint::Min(3),    // Movies
        Constraint::Length(1), // Pagination
      ])
      .split(area);

    let view = self.session.view_model(catalog);
    self.search.render(frame, chunks[0]);
    self.render_list(frame, chunks[1], &view);
    frame.render_widget(Paragraph::new(pagination_line(&view)), chunks[2]);
  }

  fn breadcrumb_label(&self) -> String {
    if self.session.is_search_active() {
      format!("Search [{}]", self.session.committed_term().trim())
    } else {
      "Popular".to_string()
    }
  }

  fn tick(&mut self, catalog: &mut CachedCatalog) {
    let before = self.session.current_page();
    self.session.tick(Instant::now(), catalog);
    if self.session.current_page() != before {
      self.list_state.select(Some(0));
    }
  }

  fn observed_queries(&self) -> Vec<QueryKey> {
    vec![self.session.active_key()]
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    if self.search.is_focused() {
      return vec![
        Shortcut::new("enter", "done"),
        Shortcut::new("esc", "clear"),
      ];
    }
    vec![
      Shortcut::new("/", "search"),
      Shortcut::new("h/l", "page"),
      Shortcut::new("enter", "details"),
      Shortcut::new("r", "retry"),
      Shortcut::new("R", "refresh"),
      Shortcut::new("q", "quit"),
    ]
  }
}
