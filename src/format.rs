//! Display formatting for movie fields.

use chrono::{Datelike, NaiveDate};

/// "2h 19m", or "N/A" when the runtime is unknown.
pub fn format_runtime(minutes: Option<u32>) -> String {
  match minutes {
    Some(m) if m > 0 => format!("{}h {}m", m / 60, m % 60),
    _ => "N/A".to_string(),
  }
}

/// "$63,000,000", or "Not disclosed" for zero.
pub fn format_currency(amount: u64) -> String {
  if amount == 0 {
    return "Not disclosed".to_string();
  }
  format!("${}", format_number(amount))
}

pub fn format_rating(rating: f32) -> String {
  format!("{:.1}", rating)
}

pub fn format_year(date: Option<NaiveDate>) -> String {
  date
    .map(|d| d.year().to_string())
    .unwrap_or_else(|| "N/A".to_string())
}

pub fn format_popularity(popularity: f64) -> String {
  format!("{:.0}", popularity)
}

/// Thousands separators: 1234567 -> "1,234,567"
pub fn format_number(n: u64) -> String {
  let digits = n.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_runtime() {
    assert_eq!(format_runtime(Some(139)), "2h 19m");
    assert_eq!(format_runtime(Some(45)), "0h 45m");
    assert_eq!(format_runtime(Some(0)), "N/A");
    assert_eq!(format_runtime(None), "N/A");
  }

  #[test]
  fn test_currency() {
    assert_eq!(format_currency(63_000_000), "$63,000,000");
    assert_eq!(format_currency(0), "Not disclosed");
  }

  #[test]
  fn test_number_separators() {
    assert_eq!(format_number(0), "0");
    assert_eq!(format_number(999), "999");
    assert_eq!(format_number(1000), "1,000");
    assert_eq!(format_number(100_853_753), "100,853,753");
  }

  #[test]
  fn test_rating_and_popularity() {
    assert_eq!(format_rating(8.438), "8.4");
    assert_eq!(format_rating(7.0), "7.0");
    assert_eq!(format_popularity(88.6), "89");
  }

  #[test]
  fn test_year() {
    assert_eq!(format_year(NaiveDate::from_ymd_opt(1999, 10, 15)), "1999");
    assert_eq!(format_year(None), "N/A");
  }
}
