use ratatui::prelude::Color;

/// Shorten to `max_chars` characters, ending in "..." when cut
pub fn truncate(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    return s.to_string();
  }
  let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
  format!("{}...", kept)
}

/// Color for a 0-10 rating
pub fn rating_color(rating: f32) -> Color {
  if rating >= 7.0 {
    Color::Green
  } else if rating >= 5.0 {
    Color::Yellow
  } else if rating > 0.0 {
    Color::Red
  } else {
    Color::DarkGray
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("Heat", 10), "Heat");
    assert_eq!(truncate("Heat", 4), "Heat");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("The Godfather Part II", 10), "The God...");
  }

  #[test]
  fn test_truncate_counts_characters() {
    assert_eq!(truncate("Le fabuleux destin d'Amélie Poulain", 27), "Le fabuleux destin d'Amé...");
  }

  #[test]
  fn test_rating_color() {
    assert_eq!(rating_color(8.4), Color::Green);
    assert_eq!(rating_color(7.0), Color::Green);
    assert_eq!(rating_color(5.5), Color::Yellow);
    assert_eq!(rating_color(3.1), Color::Red);
    assert_eq!(rating_color(0.0), Color::DarkGray);
  }
}
