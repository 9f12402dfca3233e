/// What a component did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the parent to do
  Handled,
  /// Consumed, and the parent should react to this event
  Event(T),
  /// Not consumed; the parent handles it
  NotHandled,
}
