use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::ui::view::Shortcut;

/// Header bar: app name, catalog host and the active view's shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, host: &str, shortcuts: &[Shortcut]) {
  let mut spans = vec![
    Span::styled(" cinetrack ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];
  spans.extend(shortcut_spans(shortcuts));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// `<key> label` pairs, keys highlighted and labels dimmed
fn shortcut_spans(shortcuts: &[Shortcut]) -> Vec<Span<'static>> {
  let mut spans = Vec::with_capacity(shortcuts.len() * 3);
  for (i, shortcut) in shortcuts.iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }
  spans
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_shortcut_spans() {
    let spans = shortcut_spans(&[Shortcut::new("/", "search"), Shortcut::new("q", "quit")]);
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "</> search  <q> quit");
  }
}
