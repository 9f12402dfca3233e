use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Events the search bar reports to its view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
  /// Text changed; emitted per keystroke, debouncing is the caller's job
  Changed(String),
  /// Search text was cleared with Esc
  Cleared,
}

/// Always-visible search box. `/` focuses it, Enter leaves it, Esc clears it.
#[derive(Debug, Clone, Default)]
pub struct SearchBar {
  input: TextInput,
  focused: bool,
}

impl SearchBar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(value: &str) -> Self {
    Self {
      input: TextInput::with_value(value),
      focused: false,
    }
  }

  pub fn is_focused(&self) -> bool {
    self.focused
  }

  pub fn value(&self) -> &str {
    self.input.value()
  }

  /// Call for every key; handles focusing as well.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SearchEvent> {
    if !self.focused {
      return match key.code {
        KeyCode::Char('/') => {
          self.focused = true;
          KeyResult::Handled
        }
        KeyCode::Esc if !self.input.is_empty() => {
          self.input.clear();
          KeyResult::Event(SearchEvent::Cleared)
        }
        _ => KeyResult::NotHandled,
      };
    }

    let before = self.input.value().to_string();
    match self.input.handle_key(key) {
      InputResult::Submitted => {
        self.focused = false;
        KeyResult::Handled
      }
      InputResult::Cancelled => {
        self.focused = false;
        self.input.clear();
        KeyResult::Event(SearchEvent::Cleared)
      }
      InputResult::Edited if self.input.value() != before => {
        KeyResult::Event(SearchEvent::Changed(self.input.value().to_string()))
      }
      InputResult::Edited => KeyResult::Handled,
      InputResult::NotHandled => KeyResult::NotHandled,
    }
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    let border = if self.focused {
      Color::Yellow
    } else {
      Color::DarkGray
    };
    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border))
      .title(" Search ");

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
      return;
    }

    let line = if self.input.is_empty() && !self.focused {
      Line::from(Span::styled(
        "Press / to search movies by title",
        Style::default().fg(Color::DarkGray),
      ))
    } else {
      Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(self.input.value()),
      ])
    };
    frame.render_widget(Paragraph::new(line), inner);

    if self.focused {
      let x = inner.x + 1 + self.input.cursor() as u16;
      frame.set_cursor_position((x.min(inner.right().saturating_sub(1)), inner.y));
    }
  }
}
