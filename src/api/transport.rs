//! The remote data collaborator and its failure type.

use async_trait::async_trait;
use thiserror::Error;

use super::types::{Cursor, Employee, PaginatedResult, Transaction};

/// Failures surfaced by a [`Transport`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
  /// The request never produced a response (connection, timeout, ...)
  #[error("request failed: {0}")]
  Request(String),
  /// The server answered with a non-success status
  #[error("server returned {status}: {message}")]
  Status { status: u16, message: String },
  /// The response body could not be decoded
  #[error("failed to decode response: {0}")]
  Decode(String),
  /// The task driving the request went away without answering
  #[error("request was cancelled")]
  Cancelled,
}

/// Asynchronous, fallible access to employees and transactions.
///
/// Implementations must be safe to call again after a failure; nothing in
/// the caches retries on its own.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get_employees(&self) -> Result<Vec<Employee>, TransportError>;

  /// Fetch the page identified by `cursor`, or the first page when `None`
  async fn get_transactions_page(
    &self,
    cursor: Option<Cursor>,
  ) -> Result<PaginatedResult<Transaction>, TransportError>;

  async fn get_transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Vec<Transaction>, TransportError>;

  async fn set_transaction_approval(
    &self,
    transaction_id: &str,
    value: bool,
  ) -> Result<(), TransportError>;
}
