use std::sync::Arc;

use super::{InFlight, Settled};
use crate::api::transport::Transport;
use crate::api::types::{Cursor, PaginatedResult, Transaction};

/// Cursor-driven accumulator for the "all transactions" feed.
///
/// States: empty (`data == None`), loading (a request is in flight), and
/// loaded. Each successful fetch after the first appends its rows to the
/// accumulated sequence and replaces the cursor. Previously loaded rows are
/// never reordered or dropped until [`invalidate_data`](Self::invalidate_data).
pub struct PaginatedFeedCache {
  transport: Arc<dyn Transport>,
  data: Option<PaginatedResult<Transaction>>,
  in_flight: Option<InFlight<Option<Cursor>, PaginatedResult<Transaction>>>,
}

impl PaginatedFeedCache {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      data: None,
      in_flight: None,
    }
  }

  pub fn data(&self) -> Option<&PaginatedResult<Transaction>> {
    self.data.as_ref()
  }

  pub fn is_loading(&self) -> bool {
    self.in_flight.is_some()
  }

  /// True once at least one page is loaded and the feed reports no next page
  pub fn is_exhausted(&self) -> bool {
    self.data.as_ref().is_some_and(PaginatedResult::is_exhausted)
  }

  /// Request the next page (or the first, when empty).
  ///
  /// Returns whether a request was dispatched. Nothing is sent while a
  /// request is outstanding or once the feed is exhausted.
  pub fn fetch_all(&mut self) -> bool {
    if self.is_loading() || self.is_exhausted() {
      return false;
    }

    let cursor = self.data.as_ref().and_then(|d| d.next_page.clone());
    tracing::info!(cursor = ?cursor, "fetching transactions page");

    let transport = Arc::clone(&self.transport);
    let request_cursor = cursor.clone();
    self.in_flight = Some(InFlight::spawn(cursor, async move {
      transport.get_transactions_page(request_cursor).await
    }));
    true
  }

  /// Collect a finished page. `active` is whether the paginated feed is
  /// still the authoritative source; if not, the page is dropped.
  pub fn poll(&mut self, active: bool) -> Option<Settled> {
    let mut request = self.in_flight.take()?;
    let Some(result) = request.poll() else {
      self.in_flight = Some(request);
      return None;
    };

    let page = match result {
      Ok(page) => page,
      Err(e) => {
        tracing::warn!(cursor = ?request.key(), error = %e, "transactions page fetch failed");
        return Some(Settled::Failed(e));
      }
    };

    let expected = self.data.as_ref().and_then(|d| d.next_page.as_ref());
    if !active || request.key().as_ref() != expected {
      tracing::debug!(cursor = ?request.key(), "discarding stale transactions page");
      return Some(Settled::Discarded);
    }

    let rows = page.data.len();
    match self.data.as_mut() {
      Some(accumulated) => {
        accumulated.data.extend(page.data);
        accumulated.next_page = page.next_page;
      }
      None => self.data = Some(page),
    }

    tracing::info!(
      rows,
      total = self.data.as_ref().map_or(0, |d| d.data.len()),
      "transactions page loaded"
    );
    Some(Settled::Applied)
  }

  /// Reset to empty and forget any outstanding request.
  pub fn invalidate_data(&mut self) {
    self.data = None;
    self.in_flight = None;
  }

  /// Set the approval flag on a loaded row. Returns whether the row was found.
  pub fn set_approved(&mut self, transaction_id: &str, approved: bool) -> bool {
    let Some(data) = self.data.as_mut() else {
      return false;
    };
    match data.data.iter_mut().find(|t| t.id == transaction_id) {
      Some(transaction) => {
        transaction.approved = approved;
        true
      }
      None => false,
    }
  }
}
