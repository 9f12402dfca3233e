use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::browse::{DetailSession, DetailState};
use crate::cache::QueryKey;
use crate::catalog::{image_url, CachedCatalog, CatalogItemDetail, ImageSize};
use crate::format::{
  format_currency, format_number, format_popularity, format_rating, format_runtime, format_year,
};
use crate::ui::renderfns::rating_color;
use crate::ui::view::{Shortcut, View, ViewAction};

/// Full details for one movie
pub struct MovieDetailView {
  session: DetailSession,
  image_base_url: String,
  /// Known from the list row that opened this view
  title: Option<String>,
  scroll: u16,
}

impl MovieDetailView {
  pub fn new(id: u64, image_base_url: String, title: Option<String>) -> Self {
    Self {
      session: DetailSession::new(id),
      image_base_url,
      title,
      scroll: 0,
    }
  }

  fn detail_lines(&self, detail: &CatalogItemDetail) -> Vec<Line<'static>> {
    let movie = &detail.item;
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![Line::from(vec![
      Span::styled(movie.title.clone(), Style::default().fg(Color::Cyan).bold()),
      Span::styled(
        format!(" ({})", format_year(movie.release_date)),
        Style::default().fg(Color::DarkGray),
      ),
    ])];

    if !detail.tagline.is_empty() {
      lines.push(Line::from(Span::styled(
        detail.tagline.clone(),
        Style::default().italic(),
      )));
    }
    lines.push(Line::raw(""));

    lines.push(Line::from(vec![
      Span::styled(
        format!("★ {}", format_rating(movie.vote_average)),
        Style::default().fg(rating_color(movie.vote_average)).bold(),
      ),
      Span::styled(
        format!(" ({} votes)", format_number(u64::from(movie.vote_count))),
        label,
      ),
      Span::raw("   "),
      Span::styled("Runtime: ", label),
      Span::raw(format_runtime(detail.runtime)),
      Span::raw("   "),
      Span::styled("Popularity: ", label),
      Span::raw(format_popularity(movie.popularity)),
    ]));

    if !detail.genres.is_empty() {
      let genres: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
      lines.push(Line::from(vec![
        Span::styled("Genres: ", label),
        Span::styled(genres.join(", "), Style::default().fg(Color::Yellow)),
      ]));
    }
    lines.push(Line::raw(""));

    let overview = if movie.overview.is_empty() {
      "No overview available."
    } else {
      movie.overview.as_str()
    };
    lines.push(Line::raw(overview.to_string()));
    lines.push(Line::raw(""));

    let mut field = |name: &str, value: String| {
      lines.push(Line::from(vec![
        Span::styled(format!("{:<18}", name), label),
        Span::raw(value),
      ]));
    };
    field("Status", detail.status.clone());
    field("Release date", release_date(detail));
    field("Original language", movie.original_language.to_uppercase());
    if movie.original_title != movie.title {
      field("Original title", movie.original_title.clone());
    }
    field("Budget", format_currency(detail.budget));
    field("Revenue", format_currency(detail.revenue));
    if !detail.production_companies.is_empty() {
      let companies: Vec<&str> = detail
        .production_companies
        .iter()
        .map(|c| c.name.as_str())
        .collect();
      field("Production", companies.join(", "));
    }
    if !detail.spoken_languages.is_empty() {
      let languages: Vec<&str> = detail
        .spoken_languages
        .iter()
        .map(|l| l.english_name.as_str())
        .collect();
      field("Languages", languages.join(", "));
    }
    field(
      "Poster",
      image_url(&self.image_base_url, ImageSize::W500, movie.poster_path.as_deref()),
    );
    field(
      "Backdrop",
      image_url(
        &self.image_base_url,
        ImageSize::Original,
        movie.backdrop_path.as_deref(),
      ),
    );

    lines
  }
}

fn release_date(detail: &CatalogItemDetail) -> String {
  detail
    .item
    .release_date
    .map(|d| d.format("%B %-d, %Y").to_string())
    .unwrap_or_else(|| "N/A".to_string())
}

fn centered_message(title: &str, body: &str, color: Color) -> Paragraph<'static> {
  let text = vec![
    Line::from(Span::styled(title.to_string(), Style::default().fg(color).bold())),
    Line::raw(""),
    Line::raw(body.to_string()),
  ];
  Paragraph::new(text)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
}

impl View for MovieDetailView {
  fn handle_key(&mut self, key: KeyEvent, catalog: &mut CachedCatalog) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => self.session.retry(catalog),
      KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
      KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect, catalog: &CachedCatalog) {
    let block = Block::default()
      .title(format!(" {} ", self.breadcrumb_label()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = match self.session.state(catalog) {
      DetailState::Loading => Paragraph::new("Loading movie details...")
        .style(Style::default().fg(Color::DarkGray)),
      DetailState::NotFound => centered_message(
        "Movie Not Found",
        "The movie you are looking for does not exist or has been removed. Press q to go back.",
        Color::Yellow,
      ),
      DetailState::Error(err) => centered_message(
        err.title(),
        &format!("{}\n\nPress r to retry.", err.message()),
        Color::Red,
      ),
      DetailState::Ready(detail) => Paragraph::new(self.detail_lines(&detail))
        .wrap(Wrap { trim: false })
        .scroll((self.scroll, 0)),
    };
    frame.render_widget(content, inner);
  }

  fn breadcrumb_label(&self) -> String {
    self
      .title
      .clone()
      .unwrap_or_else(|| format!("Movie {}", self.session.id()))
  }

  fn tick(&mut self, catalog: &mut CachedCatalog) {
    self.session.sync(catalog);
  }

  fn observed_queries(&self) -> Vec<QueryKey> {
    vec![QueryKey::detail(self.session.id())]
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("j/k", "scroll"),
      Shortcut::new("r", "retry"),
      Shortcut::new("q", "back"),
    ]
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::catalog::testing;

  #[test]
  fn test_detail_lines_cover_fields() {
    let view = MovieDetailView::new(550, "https://image.tmdb.org/t/p".into(), None);
    let lines = view.detail_lines(&testing::detail(550));
    let text: Vec<String> = lines
      .iter()
      .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
      .collect();
    let joined = text.join("\n");

    assert!(joined.contains("Movie 550 (2020)"));
    assert!(joined.contains("Runtime: 2h 19m"));
    assert!(joined.contains("$63,000,000"));
    assert!(joined.contains("May 17, 2020"));
    assert!(joined.contains("https://image.tmdb.org/t/p/w500/poster550.jpg"));
    assert!(joined.contains("/placeholder-movie.jpg"));
  }

  #[test]
  fn test_breadcrumb_falls_back_to_id() {
    let view = MovieDetailView::new(42, String::new(), None);
    assert_eq!(view.breadcrumb_label(), "Movie 42");
  }
}
