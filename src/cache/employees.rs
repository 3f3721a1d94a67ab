use std::sync::Arc;

use super::{InFlight, Settled};
use crate::api::transport::Transport;
use crate::api::types::Employee;

/// Fetch-once cache of the employee directory.
pub struct EmployeeDirectoryCache {
  transport: Arc<dyn Transport>,
  data: Option<Vec<Employee>>,
  in_flight: Option<InFlight<(), Vec<Employee>>>,
}

impl EmployeeDirectoryCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      data: None,
      in_flight: None,
    }
  }

  /// The directory, or `None` until the first successful fetch
  pub fn data(&self) -> Option<&[Employee]> {
    self.data.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.is_some()
  }

  /// Request the full directory. No-op while a request is outstanding.
  pub fn fetch_all(&mut self) {
    if self.is_loading() {
      return;
    }

    tracing::info!("fetching employee directory");
    let transport = Arc::clone(&self.transport);
    self.in_flight = Some(InFlight::spawn((), async move {
      transport.get_employees().await
    }));
  }

  pub fn poll(&mut self) -> Option<Settled> {
    let result = self.in_flight.as_mut()?.poll()?;
    self.in_flight = None;

    match result {
      Ok(employees) => {
        // The "All Employees" option is synthetic and never comes from the directory
        let employees: Vec<Employee> = employees.into_iter().filter(|e| !e.is_all()).collect();
        tracing::info!(employees = employees.len(), "employee directory loaded");
        self.data = Some(employees);
        Some(Settled::Applied)
      }
      Err(e) => {
        tracing::warn!(error = %e, "employee directory fetch failed");
        Some(Settled::Failed(e))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::stub::{employee, StubTransport};
  use crate::cache::settle;

  #[tokio::test]
  async fn test_fetch_all_stores_directory() {
    let stub = Arc::new(StubTransport::new().with_employees(vec![
      employee("1", "Ada", "Lovelace"),
      employee("2", "Grace", "Hopper"),
    ]));
    let mut cache = EmployeeDirectoryCache::new(stub.clone());
    assert!(cache.data().is_none());

    cache.fetch_all();
    assert!(cache.is_loading());

    assert_eq!(settle(|| cache.poll()).await, Settled::Applied);
    assert!(!cache.is_loading());
    let names: Vec<String> = cache.data().unwrap().iter().map(Employee::full_name).collect();
    assert_eq!(names, vec!["Ada Lovelace", "Grace Hopper"]);
  }

  #[tokio::test]
  async fn test_sentinel_is_stripped() {
    let stub = Arc::new(
      StubTransport::new().with_employees(vec![Employee::all(), employee("1", "Ada", "Lovelace")]),
    );
    let mut cache = EmployeeDirectoryCache::new(stub);

    cache.fetch_all();
    settle(|| cache.poll()).await;

    assert_eq!(cache.data().unwrap().len(), 1);
    assert_eq!(cache.data().unwrap()[0].id, "1");
  }

  #[tokio::test]
  async fn test_fetch_while_loading_is_noop() {
    let stub = Arc::new(StubTransport::new().with_delay("employees", 30));
    let mut cache = EmployeeDirectoryCache::new(stub.clone());

    cache.fetch_all();
    cache.fetch_all();
    settle(|| cache.poll()).await;

    assert_eq!(stub.count("employees"), 1);
  }

  #[tokio::test]
  async fn test_failure_leaves_data_and_clears_loading() {
    let stub = Arc::new(StubTransport::new().with_employees(vec![employee("1", "Ada", "Lovelace")]));
    let mut cache = EmployeeDirectoryCache::new(stub.clone());
    stub.fail("employees");

    cache.fetch_all();
    let settled = settle(|| cache.poll()).await;

    assert!(matches!(settled, Settled::Failed(_)));
    assert!(cache.data().is_none());
    assert!(!cache.is_loading());

    stub.heal("employees");
    cache.fetch_all();
    assert_eq!(settle(|| cache.poll()).await, Settled::Applied);
    assert_eq!(cache.data().unwrap().len(), 1);
  }
}
