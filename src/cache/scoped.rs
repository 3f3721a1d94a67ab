use std::sync::Arc;

use super::{InFlight, Settled};
use crate::api::transport::Transport;
use crate::api::types::Transaction;

/// Single-shot cache of one employee's transactions. No pagination: every
/// successful fetch replaces the data wholesale.
pub struct ScopedFeedCache {
  transport: Arc<dyn Transport>,
  data: Option<Vec<Transaction>>,
  in_flight: Option<InFlight<String, Vec<Transaction>>>,
}

impl ScopedFeedCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      data: None,
      in_flight: None,
    }
  }

  pub fn data(&self) -> Option<&[Transaction]> {
    self.data.as_deref()
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.is_some()
  }

  /// Request the transactions of `employee_id`.
  ///
  /// A request for a different employee that is still outstanding is
  /// abandoned; its response will never be applied.
  pub fn fetch_by_id(&mut self, employee_id: &str) {
    if let Some(request) = &self.in_flight {
      if request.key() == employee_id {
        return;
      }
      tracing::debug!(employee_id = %request.key(), "abandoning superseded request");
    }

    tracing::info!(employee_id, "fetching transactions for employee");
    let transport = Arc::clone(&self.transport);
    let id = employee_id.to_string();
    self.in_flight = Some(InFlight::spawn(employee_id.to_string(), async move {
      transport.get_transactions_by_employee(&id).await
    }));
  }

  /// Collect a finished fetch. The rows are stored only if the request was
  /// made for `active_employee`, the employee currently selected.
  pub fn poll(&mut self, active_employee: Option<&str>) -> Option<Settled> {
    let mut request = self.in_flight.take()?;
    let Some(result) = request.poll() else {
      self.in_flight = Some(request);
      return None;
    };
    let employee_id = request.key();

    match result {
      Err(e) => {
        tracing::warn!(employee_id = %employee_id, error = %e, "employee transactions fetch failed");
        Some(Settled::Failed(e))
      }
      Ok(_) if active_employee != Some(employee_id.as_str()) => {
        tracing::debug!(employee_id = %employee_id, "discarding stale employee transactions");
        Some(Settled::Discarded)
      }
      Ok(rows) => {
        tracing::info!(employee_id = %employee_id, rows = rows.len(), "employee transactions loaded");
        self.data = Some(rows);
        Some(Settled::Applied)
      }
    }
  }

  /// Reset to empty and forget any outstanding request, loading or not.
  pub fn invalidate_data(&mut self) {
    self.data = None;
    self.in_flight = None;
  }

  /// Set the approval flag on a loaded row. Returns whether the row was found.
  pub fn set_approved(&mut self, transaction_id: &str, approved: bool) -> bool {
    let Some(rows) = self.data.as_mut() else {
      return false;
    };
    match rows.iter_mut().find(|t| t.id == transaction_id) {
      Some(transaction) => {
        transaction.approved = approved;
        true
      }
      None => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::stub::{transactions, StubTransport};
  use crate::cache::settle;

  fn ids(cache: &ScopedFeedCache) -> Vec<String> {
    cache
      .data()
      .map(|rows| rows.iter().map(|t| t.id.clone()).collect())
      .unwrap_or_default()
  }

  fn two_employees() -> StubTransport {
    StubTransport::new()
      .with_employee_rows("1", transactions("one-", 2, "1"))
      .with_employee_rows("2", transactions("two-", 3, "2"))
  }

  #[tokio::test]
  async fn test_fetch_by_id() {
    let stub = Arc::new(two_employees());
    let mut cache = ScopedFeedCache::new(stub.clone());

    cache.fetch_by_id("1");
    assert!(cache.is_loading());
    assert_eq!(settle(|| cache.poll(Some("1"))).await, Settled::Applied);

    assert_eq!(ids(&cache), vec!["one-1", "one-2"]);
    assert!(!cache.is_loading());
  }

  #[tokio::test]
  async fn test_fetch_replaces_rather_than_appends() {
    let stub = Arc::new(two_employees());
    let mut cache = ScopedFeedCache::new(stub);

    cache.fetch_by_id("1");
    settle(|| cache.poll(Some("1"))).await;
    cache.fetch_by_id("2");
    settle(|| cache.poll(Some("2"))).await;

    assert_eq!(ids(&cache), vec!["two-1", "two-2", "two-3"]);
  }

  #[tokio::test]
  async fn test_response_for_other_employee_is_discarded() {
    let stub = Arc::new(two_employees());
    let mut cache = ScopedFeedCache::new(stub);

    cache.fetch_by_id("1");
    assert_eq!(settle(|| cache.poll(Some("2"))).await, Settled::Discarded);
    assert!(cache.data().is_none());

    cache.fetch_by_id("1");
    assert_eq!(settle(|| cache.poll(None)).await, Settled::Discarded);
    assert!(cache.data().is_none());
  }

  #[tokio::test]
  async fn test_superseded_request_never_lands() {
    let stub = Arc::new(
      two_employees()
        .with_delay("employee:1", 40)
        .with_delay("employee:2", 5),
    );
    let mut cache = ScopedFeedCache::new(stub.clone());

    cache.fetch_by_id("1");
    cache.fetch_by_id("2");
    assert_eq!(settle(|| cache.poll(Some("2"))).await, Settled::Applied);

    // Give the slow request time to finish; nothing may change
    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
    assert_eq!(cache.poll(Some("2")), None);
    assert_eq!(ids(&cache), vec!["two-1", "two-2", "two-3"]);
    assert_eq!(stub.calls(), vec!["employee:1", "employee:2"]);
  }

  #[tokio::test]
  async fn test_same_id_while_loading_is_noop() {
    let stub = Arc::new(two_employees().with_delay("employee:1", 20));
    let mut cache = ScopedFeedCache::new(stub.clone());

    cache.fetch_by_id("1");
    cache.fetch_by_id("1");
    settle(|| cache.poll(Some("1"))).await;

    assert_eq!(stub.count("employee:1"), 1);
  }

  #[tokio::test]
  async fn test_invalidate_while_loading() {
    let stub = Arc::new(two_employees().with_delay("employee:1", 20));
    let mut cache = ScopedFeedCache::new(stub);

    cache.fetch_by_id("1");
    cache.invalidate_data();

    assert!(!cache.is_loading());
    tokio::time::sleep(std::time::Duration::from_millis(40)).await;
    assert_eq!(cache.poll(Some("1")), None);
    assert!(cache.data().is_none());
  }

  #[tokio::test]
  async fn test_failure_keeps_previous_rows() {
    let stub = Arc::new(two_employees());
    let mut cache = ScopedFeedCache::new(stub.clone());

    cache.fetch_by_id("1");
    settle(|| cache.poll(Some("1"))).await;

    stub.fail("employee:1");
    cache.fetch_by_id("1");
    assert!(matches!(
      settle(|| cache.poll(Some("1"))).await,
      Settled::Failed(_)
    ));
    assert_eq!(ids(&cache), vec!["one-1", "one-2"]);
  }

  #[tokio::test]
  async fn test_unknown_employee_loads_empty() {
    let stub = Arc::new(two_employees());
    let mut cache = ScopedFeedCache::new(stub);

    cache.fetch_by_id("9");
    settle(|| cache.poll(Some("9"))).await;

    assert_eq!(cache.data().map(<[Transaction]>::len), Some(0));
  }
}
