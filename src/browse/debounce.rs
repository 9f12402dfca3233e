//! Quiet-period debouncing for typed input.

use std::time::Duration;
use tokio::time::Instant;

/// Commits a value once no newer value has arrived for `delay`.
///
/// Time is passed in explicitly; the owner calls [`Debouncer::poll`] from its
/// tick, so a commit fires at most one tick after its deadline.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
    }
  }

  /// Replace any pending value and restart the quiet period.
  pub fn input(&mut self, value: T, now: Instant) {
    self.pending = Some((value, now + self.delay));
  }

  /// Take the pending value if its quiet period has passed.
  pub fn poll(&mut self, now: Instant) -> Option<T> {
    match &self.pending {
      Some((_, deadline)) if now >= *deadline => self.pending.take().map(|(value, _)| value),
      _ => None,
    }
  }

  /// Drop the pending value without committing it.
  pub fn cancel(&mut self) {
    self.pending = None;
  }

  /// Drop the pending value and commit `value` right away.
  pub fn commit_now(&mut self, value: T) -> T {
    self.cancel();
    value
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  const DELAY: Duration = Duration::from_millis(300);

  fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
  }

  #[test]
  fn test_commits_after_quiet_period() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.input("alien", start);
    assert_eq!(debouncer.poll(start + ms(299)), None);
    assert_eq!(debouncer.poll(start + ms(300)), Some("alien"));
    // Committed once
    assert_eq!(debouncer.poll(start + ms(900)), None);
  }

  #[test]
  fn test_last_value_in_window_wins() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.input("b", start);
    debouncer.input("ba", start + ms(40));
    debouncer.input("bat", start + ms(80));
    debouncer.input("batman", start + ms(100));

    // The first deadline has passed but was superseded
    assert_eq!(debouncer.poll(start + ms(350)), None);
    assert_eq!(debouncer.poll(start + ms(399)), None);
    assert_eq!(debouncer.poll(start + ms(400)), Some("batman"));
  }

  #[test]
  fn test_cancel_drops_pending_value() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.input("dune", start);
    debouncer.cancel();

    assert_eq!(debouncer.poll(start + ms(1000)), None);
  }

  #[test]
  fn test_commit_now_supersedes_pending() {
    let start = Instant::now();
    let mut debouncer = Debouncer::new(DELAY);

    debouncer.input("dune", start);
    assert_eq!(debouncer.commit_now(""), "");
    assert_eq!(debouncer.poll(start + ms(1000)), None);
  }
}
