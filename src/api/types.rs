use serde::{Deserialize, Serialize};

/// An entry in the employee directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
  pub id: String,
  pub first_name: String,
  pub last_name: String,
}

impl Employee {
  /// The synthetic "All Employees" option. Selecting it clears the filter.
  pub fn all() -> Self {
    Self {
      id: String::new(),
      first_name: "All".to_string(),
      last_name: "Employees".to_string(),
    }
  }

  /// True for the "All Employees" option, which is never a real directory entry
  pub fn is_all(&self) -> bool {
    self.id.is_empty()
  }

  pub fn full_name(&self) -> String {
    format!("{} {}", self.first_name, self.last_name)
  }
}

/// A single transaction row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
  pub id: String,
  pub amount: f64,
  pub employee: Employee,
  pub merchant: String,
  pub date: String,
  pub approved: bool,
}

/// Opaque token identifying the next page of the paginated feed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cursor(pub String);

impl Cursor {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl std::fmt::Display for Cursor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

/// One page of a cursor-paginated feed. `next_page == None` means exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
  pub data: Vec<T>,
  pub next_page: Option<Cursor>,
}

impl<T> PaginatedResult<T> {
  pub fn is_exhausted(&self) -> bool {
    self.next_page.is_none()
  }
}
