/// Outcome of offering a key event to a component.
///
/// Components return this so the owning view knows whether to keep looking
/// for a handler and whether there is an event for it to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing further to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed, parent should try next handler
  NotHandled,
}
