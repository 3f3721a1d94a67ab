//! Serde types matching the transaction API's JSON payloads.
//!
//! Kept apart from the domain types so wire quirks (numeric or string
//! cursors, camelCase keys) stay out of the caches.

use serde::{Deserialize, Serialize};

use super::types::{Cursor, Employee, PaginatedResult, Transaction};

/// `nextPage` arrives as either a page number or an opaque string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ApiCursor {
  Number(u64),
  Text(String),
}

impl From<ApiCursor> for Cursor {
  fn from(cursor: ApiCursor) -> Self {
    match cursor {
      ApiCursor::Number(n) => Cursor(n.to_string()),
      ApiCursor::Text(s) => Cursor(s),
    }
  }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTransactionsPage {
  #[serde(default)]
  pub data: Vec<Transaction>,
  pub next_page: Option<ApiCursor>,
}

impl From<ApiTransactionsPage> for PaginatedResult<Transaction> {
  fn from(page: ApiTransactionsPage) -> Self {
    Self {
      data: page.data,
      next_page: page.next_page.map(Cursor::from),
    }
  }
}

#[derive(Debug, Serialize)]
pub struct ApiApprovalRequest {
  pub value: bool,
}

/// Layout of the bundled demo dataset
#[derive(Debug, Deserialize)]
pub struct ApiFixture {
  pub employees: Vec<Employee>,
  pub transactions: Vec<Transaction>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_numeric_cursor() {
    let page: ApiTransactionsPage =
      serde_json::from_str(r#"{"data": [], "nextPage": 2}"#).unwrap();
    let page = PaginatedResult::from(page);
    assert_eq!(page.next_page, Some(Cursor("2".to_string())));
  }

  #[test]
  fn test_string_cursor() {
    let page: ApiTransactionsPage =
      serde_json::from_str(r#"{"data": [], "nextPage": "abc"}"#).unwrap();
    let page = PaginatedResult::from(page);
    assert_eq!(page.next_page, Some(Cursor("abc".to_string())));
  }

  #[test]
  fn test_null_cursor_is_exhausted() {
    let page: ApiTransactionsPage =
      serde_json::from_str(r#"{"data": [], "nextPage": null}"#).unwrap();
    assert!(PaginatedResult::from(page).is_exhausted());
  }

  #[test]
  fn test_transaction_shape() {
    let json = r#"{
      "data": [{
        "id": "t1",
        "amount": 12.5,
        "employee": {"id": "1", "firstName": "Ada", "lastName": "Lovelace"},
        "merchant": "Acme",
        "date": "2023-03-04",
        "approved": false
      }],
      "nextPage": null
    }"#;
    let page = PaginatedResult::from(serde_json::from_str::<ApiTransactionsPage>(json).unwrap());
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].employee.first_name, "Ada");
    assert_eq!(page.data[0].amount, 12.5);
  }
}
