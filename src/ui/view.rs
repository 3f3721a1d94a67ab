/// A key hint shown in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
  pub key: &'static str,
  pub label: &'static str,
  /// Shown while the employee picker is open instead of the list hints
  pub in_picker: bool,
}

impl Shortcut {
  pub const fn list(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      in_picker: false,
    }
  }

  pub const fn picker(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      in_picker: true,
    }
  }
}

/// User intents a view hands back to the App, which forwards them to the
/// coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  /// Nothing to do
  None,
  /// Employee filter changed; `None` means the selection was cleared
  SelectEmployee(Option<String>),
  /// "View More"
  RequestMore,
  /// Flip approval on the shown row at this index
  ToggleApproval(usize),
  Retry,
  Quit,
}
