//! In-memory transport serving the bundled demo dataset.

use crate::api::api_types::ApiFixture;
use crate::api::transport::{Transport, TransportError};
use crate::api::types::{Cursor, Employee, PaginatedResult, Transaction};
use crate::config::DemoConfig;
use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use std::sync::Mutex;
use std::time::Duration;

const BUNDLED: &str = include_str!("fixtures.json");

/// Serves employees and transactions from memory with simulated latency.
///
/// Pages are addressed by index; the cursor handed out for the next page is
/// its index as a string. Approval changes persist for the life of the value.
pub struct FixtureTransport {
  employees: Vec<Employee>,
  transactions: Mutex<Vec<Transaction>>,
  page_size: usize,
  latency: Duration,
}

impl FixtureTransport {
  pub fn new(fixture: ApiFixture, page_size: usize, latency: Duration) -> Self {
    Self {
      employees: fixture.employees,
      transactions: Mutex::new(fixture.transactions),
      page_size: page_size.max(1),
      latency,
    }
  }

  /// Load the dataset compiled into the binary
  pub fn bundled(config: &DemoConfig) -> Result<Self> {
    let fixture: ApiFixture =
      serde_json::from_str(BUNDLED).map_err(|e| eyre!("Failed to parse bundled fixtures: {}", e))?;

    Ok(Self::new(
      fixture,
      config.page_size,
      Duration::from_millis(config.latency_ms),
    ))
  }

  async fn simulate_latency(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }

  fn transactions(&self) -> std::sync::MutexGuard<'_, Vec<Transaction>> {
    self
      .transactions
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

fn bad_request(message: impl Into<String>) -> TransportError {
  TransportError::Status {
    status: 400,
    message: message.into(),
  }
}

#[async_trait]
impl Transport for FixtureTransport {
  async fn get_employees(&self) -> Result<Vec<Employee>, TransportError> {
    self.simulate_latency().await;
    Ok(self.employees.clone())
  }

  async fn get_transactions_page(
    &self,
    cursor: Option<Cursor>,
  ) -> Result<PaginatedResult<Transaction>, TransportError> {
    self.simulate_latency().await;

    let page = match cursor {
      Some(cursor) => cursor
        .as_str()
        .parse::<usize>()
        .map_err(|_| bad_request(format!("invalid page cursor {}", cursor)))?,
      None => 0,
    };

    let transactions = self.transactions();
    let start = page.saturating_mul(self.page_size).min(transactions.len());
    let end = (start + self.page_size).min(transactions.len());
    let next_page = (end < transactions.len()).then(|| Cursor((page + 1).to_string()));

    Ok(PaginatedResult {
      data: transactions[start..end].to_vec(),
      next_page,
    })
  }

  async fn get_transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Vec<Transaction>, TransportError> {
    self.simulate_latency().await;

    if employee_id.is_empty() {
      return Err(bad_request("employee id cannot be empty"));
    }

    Ok(
      self
        .transactions()
        .iter()
        .filter(|t| t.employee.id == employee_id)
        .cloned()
        .collect(),
    )
  }

  async fn set_transaction_approval(
    &self,
    transaction_id: &str,
    value: bool,
  ) -> Result<(), TransportError> {
    self.simulate_latency().await;

    let mut transactions = self.transactions();
    let transaction = transactions
      .iter_mut()
      .find(|t| t.id == transaction_id)
      .ok_or_else(|| TransportError::Status {
        status: 404,
        message: format!("no transaction {}", transaction_id),
      })?;
    transaction.approved = value;
    Ok(())
  }
}
