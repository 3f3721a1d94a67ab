//! Scripted transport for tests: canned responses, per-call latency,
//! failure injection and a log of every call made.

use crate::api::transport::{Transport, TransportError};
use crate::api::types::{Cursor, Employee, PaginatedResult, Transaction};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

pub fn employee(id: &str, first: &str, last: &str) -> Employee {
  Employee {
    id: id.to_string(),
    first_name: first.to_string(),
    last_name: last.to_string(),
  }
}

pub fn transaction(id: &str, employee_id: &str) -> Transaction {
  Transaction {
    id: id.to_string(),
    amount: 10.0,
    employee: employee(employee_id, "First", "Last"),
    merchant: "Merchant".to_string(),
    date: "2023-01-01".to_string(),
    approved: false,
  }
}

/// `count` transactions with ids `{prefix}1..={prefix}{count}`
pub fn transactions(prefix: &str, count: usize, employee_id: &str) -> Vec<Transaction> {
  (1..=count)
    .map(|i| transaction(&format!("{}{}", prefix, i), employee_id))
    .collect()
}

fn page_key(cursor: Option<&str>) -> String {
  format!("page:{}", cursor.unwrap_or("first"))
}

#[derive(Default)]
pub struct StubTransport {
  employees: Vec<Employee>,
  pages: HashMap<String, PaginatedResult<Transaction>>,
  by_employee: HashMap<String, Vec<Transaction>>,
  delays: HashMap<String, Duration>,
  failing: Mutex<HashSet<String>>,
  calls: Mutex<Vec<String>>,
}

impl StubTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
    self.employees = employees;
    self
  }

  /// Serve `rows` for the page at `cursor` (`None` = first page)
  pub fn with_page(mut self, cursor: Option<&str>, rows: Vec<Transaction>, next: Option<&str>) -> Self {
    self.pages.insert(
      page_key(cursor),
      PaginatedResult {
        data: rows,
        next_page: next.map(|c| Cursor(c.to_string())),
      },
    );
    self
  }

  pub fn with_employee_rows(mut self, employee_id: &str, rows: Vec<Transaction>) -> Self {
    self.by_employee.insert(employee_id.to_string(), rows);
    self
  }

  /// Delay the call identified by `key` ("employees", "page:first",
  /// "page:<cursor>", "employee:<id>", "approve:<id>")
  pub fn with_delay(mut self, key: &str, millis: u64) -> Self {
    self.delays.insert(key.to_string(), Duration::from_millis(millis));
    self
  }

  pub fn fail(&self, key: &str) {
    self.failing.lock().unwrap().insert(key.to_string());
  }

  pub fn heal(&self, key: &str) {
    self.failing.lock().unwrap().remove(key);
  }

  pub fn calls(&self) -> Vec<String> {
    self.calls.lock().unwrap().clone()
  }

  pub fn count(&self, key: &str) -> usize {
    self.calls().iter().filter(|c| c.as_str() == key).count()
  }

  async fn enter(&self, key: String) -> Result<(), TransportError> {
    self.calls.lock().unwrap().push(key.clone());
    if let Some(delay) = self.delays.get(&key) {
      tokio::time::sleep(*delay).await;
    }
    if self.failing.lock().unwrap().contains(&key) {
      return Err(TransportError::Request(format!("{} failed", key)));
    }
    Ok(())
  }
}

#[async_trait]
impl Transport for StubTransport {
  async fn get_employees(&self) -> Result<Vec<Employee>, TransportError> {
    self.enter("employees".to_string()).await?;
    Ok(self.employees.clone())
  }

  async fn get_transactions_page(
    &self,
    cursor: Option<Cursor>,
  ) -> Result<PaginatedResult<Transaction>, TransportError> {
    let key = page_key(cursor.as_ref().map(Cursor::as_str));
    self.enter(key.clone()).await?;
    self.pages.get(&key).cloned().ok_or(TransportError::Status {
      status: 404,
      message: key,
    })
  }

  async fn get_transactions_by_employee(
    &self,
    employee_id: &str,
  ) -> Result<Vec<Transaction>, TransportError> {
    self.enter(format!("employee:{}", employee_id)).await?;
    Ok(self.by_employee.get(employee_id).cloned().unwrap_or_default())
  }

  async fn set_transaction_approval(
    &self,
    transaction_id: &str,
    _value: bool,
  ) -> Result<(), TransportError> {
    self.enter(format!("approve:{}", transaction_id)).await
  }
}
