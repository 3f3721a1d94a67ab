//! Decides which transaction source is authoritative and exposes one read
//! model to the UI.
//!
//! Two modes exist: [`Mode::All`] reads the paginated feed and
//! [`Mode::ByEmployee`] reads the scoped feed. Switching mode always
//! invalidates both feeds before the new fetch is dispatched, and responses
//! are only applied if they still belong to the active mode when they land,
//! so the read model never mixes rows from the two sources.

use std::sync::Arc;

use crate::api::transport::{Transport, TransportError};
use crate::api::types::{Employee, Transaction};
use crate::cache::{EmployeeDirectoryCache, InFlight, PaginatedFeedCache, ScopedFeedCache, Settled};
use crate::config::RowsConfig;

/// Which source the read model comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  All,
  ByEmployee(String),
}

impl Mode {
  /// The empty id is the "All Employees" option
  pub fn from_selection(employee_id: &str) -> Self {
    if employee_id.is_empty() {
      Mode::All
    } else {
      Mode::ByEmployee(employee_id.to_string())
    }
  }

  pub fn employee_id(&self) -> Option<&str> {
    match self {
      Mode::All => None,
      Mode::ByEmployee(id) => Some(id.as_str()),
    }
  }
}

/// Which request a visible error came from. A later success only clears
/// an error from the same source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorSource {
  Directory,
  Feed,
  Approval,
}

/// One-shot guard for the initial load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
  NotStarted,
  Loading,
  Done,
}

pub struct ViewCoordinator {
  transport: Arc<dyn Transport>,
  employees: EmployeeDirectoryCache,
  paginated: PaginatedFeedCache,
  scoped: ScopedFeedCache,
  mode: Mode,
  init: InitState,
  rows: RowsConfig,
  rows_shown: usize,
  approval: Option<InFlight<(String, bool), ()>>,
  last_error: Option<(ErrorSource, String)>,
}

impl ViewCoordinator {
  pub fn new(transport: Arc<dyn Transport>, rows: RowsConfig) -> Self {
    Self {
      employees: EmployeeDirectoryCache::new(Arc::clone(&transport)),
      paginated: PaginatedFeedCache::new(Arc::clone(&transport)),
      scoped: ScopedFeedCache::new(Arc::clone(&transport)),
      transport,
      mode: Mode::All,
      init: InitState::NotStarted,
      rows_shown: rows.initial,
      rows,
      approval: None,
      last_error: None,
    }
  }

  /// Kick off the initial load: the employee directory and the first page
  /// of all transactions, concurrently. Fires at most once per session.
  pub fn start(&mut self) {
    if self.init != InitState::NotStarted
      || self.employees.data().is_some()
      || self.employees.is_loading()
    {
      return;
    }

    tracing::info!("initial load");
    self.init = InitState::Loading;
    self.employees.fetch_all();
    self.load_all_transactions();
  }

  /// Apply a selection from the employee filter. `None` means the selector
  /// was cleared and is ignored; the empty id selects all employees.
  pub fn select_employee(&mut self, employee_id: Option<&str>) {
    let Some(employee_id) = employee_id else {
      tracing::debug!("selection cleared, ignoring");
      return;
    };

    if self.rows.reset_on_filter_change {
      self.rows_shown = self.rows.initial;
    }

    match Mode::from_selection(employee_id) {
      Mode::All => self.load_all_transactions(),
      Mode::ByEmployee(id) => self.load_transactions_by_employee(&id),
    }
  }

  fn load_all_transactions(&mut self) {
    tracing::info!(mode = "all", "switching mode");
    self.mode = Mode::All;
    self.scoped.invalidate_data();
    // Always restart from the first page, never resume an old cursor
    self.paginated.invalidate_data();
    self.paginated.fetch_all();
  }

  fn load_transactions_by_employee(&mut self, employee_id: &str) {
    tracing::info!(mode = "by_employee", employee_id, "switching mode");
    self.mode = Mode::ByEmployee(employee_id.to_string());
    self.paginated.invalidate_data();
    self.scoped.invalidate_data();
    self.scoped.fetch_by_id(employee_id);
  }

  /// Reveal the next batch of rows, fetching another page when the window
  /// runs past what has been accumulated. Returns false if the action is
  /// not currently available.
  pub fn request_more(&mut self) -> bool {
    if !self.view_more_enabled() {
      return false;
    }

    self.rows_shown += self.rows.step;
    tracing::debug!(rows_shown = self.rows_shown, "showing more rows");
    self.fill_window();
    true
  }

  /// In all-transactions mode, request the next page once the shown window
  /// covers every accumulated row.
  fn fill_window(&mut self) {
    if self.mode != Mode::All || self.paginated.is_loading() {
      return;
    }
    let Some(loaded) = self.paginated.data().map(|d| d.data.len()) else {
      return;
    };
    if self.rows_shown >= loaded {
      self.paginated.fetch_all();
    }
  }

  /// Toggle approval on the shown row at `index`. Only one approval request
  /// may be outstanding at a time.
  pub fn toggle_approval(&mut self, index: usize) -> bool {
    if self.approval.is_some() {
      return false;
    }
    let Some(transaction) = self.visible_transactions().get(index) else {
      return false;
    };

    let id = transaction.id.clone();
    let value = !transaction.approved;
    tracing::info!(transaction_id = %id, value, "setting approval");

    let transport = Arc::clone(&self.transport);
    let request_id = id.clone();
    self.approval = Some(InFlight::spawn((id, value), async move {
      transport.set_transaction_approval(&request_id, value).await
    }));
    true
  }

  /// Clear the visible error and re-issue whatever failed.
  pub fn retry(&mut self) {
    self.last_error = None;

    if self.employees.data().is_none() && !self.employees.is_loading() {
      self.init = InitState::Loading;
      self.employees.fetch_all();
    }

    match self.mode.clone() {
      Mode::All => {
        if self.paginated.data().is_none() {
          if !self.paginated.is_loading() {
            self.load_all_transactions();
          }
        } else {
          self.fill_window();
        }
      }
      Mode::ByEmployee(id) => {
        if self.scoped.data().is_none() && !self.scoped.is_loading() {
          self.scoped.fetch_by_id(&id);
        }
      }
    }
  }

  /// Poll every outstanding request. Returns true if anything changed.
  pub fn tick(&mut self) -> bool {
    let mut changed = false;

    if let Some(settled) = self.employees.poll() {
      changed = true;
      self.init = InitState::Done;
      match settled {
        Settled::Applied => self.clear_error(ErrorSource::Directory),
        Settled::Failed(e) => self.fail(ErrorSource::Directory, "load employees", e),
        Settled::Discarded => {}
      }
    }

    if let Some(settled) = self.paginated.poll(self.mode == Mode::All) {
      changed = true;
      match settled {
        Settled::Applied => {
          self.clear_error(ErrorSource::Feed);
          self.fill_window();
        }
        Settled::Failed(e) => self.fail(ErrorSource::Feed, "load transactions", e),
        Settled::Discarded => {}
      }
    }

    if let Some(settled) = self.scoped.poll(self.mode.employee_id()) {
      changed = true;
      match settled {
        Settled::Applied => self.clear_error(ErrorSource::Feed),
        Settled::Failed(e) => self.fail(ErrorSource::Feed, "load employee transactions", e),
        Settled::Discarded => {}
      }
    }

    changed |= self.poll_approval();
    changed
  }

  fn poll_approval(&mut self) -> bool {
    let Some(mut request) = self.approval.take() else {
      return false;
    };
    let Some(result) = request.poll() else {
      self.approval = Some(request);
      return false;
    };
    let (id, value) = request.key();

    match result {
      Ok(()) => {
        // Only one of the feeds holds rows at a time
        let found = self.paginated.set_approved(id, *value) || self.scoped.set_approved(id, *value);
        tracing::info!(transaction_id = %id, value, found, "approval saved");
        self.clear_error(ErrorSource::Approval);
      }
      Err(e) => self.fail(ErrorSource::Approval, "update approval", e),
    }
    true
  }

  fn fail(&mut self, source: ErrorSource, action: &str, error: TransportError) {
    tracing::error!(action, error = %error, "request failed");
    self.last_error = Some((source, format!("Failed to {}: {}", action, error)));
  }

  fn clear_error(&mut self, source: ErrorSource) {
    if self.last_error.as_ref().is_some_and(|(s, _)| *s == source) {
      self.last_error = None;
    }
  }

  // Read model

  /// The unified read model. `None` means nothing has loaded yet, which is
  /// distinct from a loaded empty list.
  pub fn transactions(&self) -> Option<&[Transaction]> {
    self
      .paginated
      .data()
      .map(|d| d.data.as_slice())
      .or_else(|| self.scoped.data())
  }

  /// The rows inside the current window
  pub fn visible_transactions(&self) -> &[Transaction] {
    let rows = self.transactions().unwrap_or(&[]);
    &rows[..rows.len().min(self.rows_shown)]
  }

  pub fn rows_shown(&self) -> usize {
    self.rows_shown
  }

  /// Whether the "View More" control is offered at all
  pub fn show_view_more(&self) -> bool {
    self.rows_shown < self.transactions().map_or(0, <[Transaction]>::len)
  }

  /// Whether the "View More" control is offered and can be used right now
  pub fn view_more_enabled(&self) -> bool {
    self.show_view_more() && !self.paginated.is_loading()
  }

  /// The selectable employees: empty until the directory has loaded, then
  /// the "All Employees" option followed by the directory.
  pub fn employee_options(&self) -> Vec<Employee> {
    match self.employees.data() {
      Some(employees) => std::iter::once(Employee::all())
        .chain(employees.iter().cloned())
        .collect(),
      None => Vec::new(),
    }
  }

  /// The employee whose filter is active, or the "All Employees" option
  pub fn selected_employee(&self) -> Employee {
    let Some(id) = self.mode.employee_id() else {
      return Employee::all();
    };
    self
      .employees
      .data()
      .and_then(|employees| employees.iter().find(|e| e.id == id))
      .cloned()
      .unwrap_or_else(|| Employee {
        id: id.to_string(),
        first_name: id.to_string(),
        last_name: String::new(),
      })
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn init_state(&self) -> InitState {
    self.init
  }

  pub fn employees_loading(&self) -> bool {
    self.employees.is_loading()
  }

  pub fn transactions_loading(&self) -> bool {
    self.paginated.is_loading() || self.scoped.is_loading()
  }

  pub fn approval_pending(&self) -> bool {
    self.approval.is_some()
  }

  /// True when the feed has no more pages to offer
  pub fn feed_exhausted(&self) -> bool {
    match self.mode {
      Mode::All => self.paginated.is_exhausted(),
      Mode::ByEmployee(_) => self.scoped.data().is_some(),
    }
  }

  pub fn last_error(&self) -> Option<&str> {
    self.last_error.as_ref().map(|(_, message)| message.as_str())
  }

  #[cfg(test)]
  fn is_busy(&self) -> bool {
    self.employees_loading() || self.transactions_loading() || self.approval_pending()
  }

  #[cfg(test)]
  fn feeds_with_data(&self) -> usize {
    usize::from(self.paginated.data().is_some()) + usize::from(self.scoped.data().is_some())
  }
}
