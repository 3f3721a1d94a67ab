use crate::api::types::{Employee, Transaction};
use crate::coordinator::ViewCoordinator;
use crate::ui::components::{KeyResult, Select, SelectEvent, SelectItem};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{approval_color, format_amount, format_date, truncate};
use crate::ui::view::{Intent, Shortcut};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

static SHORTCUTS: [Shortcut; 8] = [
  Shortcut::list("f", "filter"),
  Shortcut::list("m", "more"),
  Shortcut::list("space", "approve"),
  Shortcut::list("r", "retry"),
  Shortcut::list("q", "quit"),
  Shortcut::picker("enter", "select"),
  Shortcut::picker("backspace", "clear"),
  Shortcut::picker("esc", "close"),
];

fn employee_option(employee: &Employee) -> SelectItem {
  SelectItem {
    value: employee.id.clone(),
    label: employee.full_name(),
  }
}

/// The transaction list: employee filter on top, the row window below it,
/// and the "View More" control underneath.
pub struct TransactionsView {
  filter: Select<Employee>,
  list_state: ListState,
}

impl TransactionsView {
  pub fn new() -> Self {
    Self {
      filter: Select::new(
        "Filter by employee",
        "Loading employees",
        employee_option,
        Some(&Employee::all()),
      ),
      list_state: ListState::default(),
    }
  }

  /// Pull the latest employee options out of the coordinator
  pub fn sync(&mut self, coordinator: &ViewCoordinator) {
    let options = coordinator.employee_options();
    if options.as_slice() != self.filter.items() {
      self.filter.set_items(options);
    }
  }

  /// True while the employee picker overlay is open
  pub fn filter_open(&self) -> bool {
    self.filter.is_open()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> Intent {
    // The filter gets first look, it swallows everything while open
    match self.filter.handle_key(key) {
      KeyResult::Event(SelectEvent::Changed(employee)) => {
        self.list_state.select(Some(0));
        return Intent::SelectEmployee(employee.map(|e| e.id));
      }
      KeyResult::Handled => return Intent::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
        Intent::None
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
        Intent::None
      }
      KeyCode::Char('m') => Intent::RequestMore,
      KeyCode::Char(' ') => match self.list_state.selected() {
        Some(index) => Intent::ToggleApproval(index),
        None => Intent::None,
      },
      KeyCode::Char('r') => Intent::Retry,
      KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
      _ => Intent::None,
    }
  }

  pub fn render(&mut self, frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Filter
        Constraint::Min(3),    // Rows
        Constraint::Length(1), // View more
      ])
      .split(area);

    self
      .filter
      .render_field(frame, chunks[0], coordinator.employees_loading());
    self.render_rows(frame, chunks[1], coordinator);
    render_view_more(frame, chunks[2], coordinator);

    self.filter.render_overlay(frame, area);
  }

  fn render_rows(&mut self, frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
    let block = Block::default()
      .title(" Transactions ")
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let Some(all_rows) = coordinator.transactions() else {
      let content = if coordinator.last_error().is_some() {
        "Failed to load transactions. Press 'r' to retry."
      } else {
        "Loading..."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    };

    if all_rows.is_empty() {
      let paragraph = Paragraph::new("No transactions.")
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let rows = coordinator.visible_transactions();
    ensure_valid_selection(&mut self.list_state, rows.len());

    let items: Vec<ListItem> = rows.iter().map(transaction_line).map(ListItem::new).collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }

  pub fn shortcuts(&self) -> &'static [Shortcut] {
    &SHORTCUTS
  }
}

impl Default for TransactionsView {
  fn default() -> Self {
    Self::new()
  }
}

fn transaction_line(transaction: &Transaction) -> Line<'static> {
  let check = if transaction.approved { "[x]" } else { "[ ]" };

  Line::from(vec![
    Span::styled(
      check,
      Style::default().fg(approval_color(transaction.approved)),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:<24}", truncate(&transaction.merchant, 24)),
      Style::default().fg(Color::Cyan),
    ),
    Span::raw(" "),
    Span::styled(
      format!("{:>12}", format_amount(transaction.amount)),
      Style::default().fg(Color::White).bold(),
    ),
    Span::raw("  "),
    Span::raw(format!(
      "{:<22}",
      truncate(&transaction.employee.full_name(), 22)
    )),
    Span::raw(" "),
    Span::styled(
      format_date(&transaction.date),
      Style::default().fg(Color::DarkGray),
    ),
  ])
}

fn render_view_more(frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
  if !coordinator.show_view_more() {
    return;
  }

  let style = if coordinator.view_more_enabled() {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  };

  let line = Line::from(vec![
    Span::styled(" <m>", style),
    Span::styled(" View More", style),
  ]);
  frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::api::stub::employee;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn view_with_employees() -> TransactionsView {
    let mut view = TransactionsView::new();
    view
      .filter
      .set_items(vec![Employee::all(), employee("1", "Ada", "Lovelace")]);
    view
  }

  #[test]
  fn test_pick_employee() {
    let mut view = view_with_employees();
    view.handle_key(key(KeyCode::Char('f')));
    view.handle_key(key(KeyCode::Down));
    assert_eq!(
      view.handle_key(key(KeyCode::Enter)),
      Intent::SelectEmployee(Some("1".to_string()))
    );
  }

  #[test]
  fn test_pick_all_employees() {
    let mut view = view_with_employees();
    view.handle_key(key(KeyCode::Char('f')));
    assert_eq!(
      view.handle_key(key(KeyCode::Enter)),
      Intent::SelectEmployee(Some(String::new()))
    );
  }

  #[test]
  fn test_clear_selection() {
    let mut view = view_with_employees();
    view.handle_key(key(KeyCode::Char('f')));
    assert_eq!(
      view.handle_key(key(KeyCode::Backspace)),
      Intent::SelectEmployee(None)
    );
  }

  #[test]
  fn test_keys_go_to_filter_while_open() {
    let mut view = view_with_employees();
    view.handle_key(key(KeyCode::Char('f')));
    assert_eq!(view.handle_key(key(KeyCode::Char('m'))), Intent::None);
    assert_eq!(view.handle_key(key(KeyCode::Char('q'))), Intent::None);
    assert_eq!(view.handle_key(key(KeyCode::Char('q'))), Intent::Quit);
  }

  #[test]
  fn test_list_intents() {
    let mut view = view_with_employees();
    assert_eq!(view.handle_key(key(KeyCode::Char('m'))), Intent::RequestMore);
    assert_eq!(view.handle_key(key(KeyCode::Char('r'))), Intent::Retry);
    assert_eq!(view.handle_key(key(KeyCode::Char(' '))), Intent::None);

    view.list_state.select(Some(2));
    assert_eq!(
      view.handle_key(key(KeyCode::Char(' '))),
      Intent::ToggleApproval(2)
    );
  }

  #[test]
  fn test_transaction_line_contents() {
    let mut transaction = crate::api::stub::transaction("t1", "1");
    transaction.approved = true;
    transaction.amount = 1234.5;
    let text: String = transaction_line(&transaction)
      .spans
      .iter()
      .map(|s| s.content.as_ref())
      .collect();

    assert!(text.starts_with("[x]"));
    assert!(text.contains("$1,234.50"));
    assert!(text.contains("First Last"));
    assert!(text.contains("Jan 01, 2023"));
  }

  #[test]
  fn test_shortcuts_split_between_list_and_picker() {
    let view = TransactionsView::new();
    let keys = |in_picker: bool| -> Vec<&str> {
      view
        .shortcuts()
        .iter()
        .filter(|s| s.in_picker == in_picker)
        .map(|s| s.key)
        .collect()
    };
    assert!(keys(false).contains(&"m"));
    assert!(!keys(false).contains(&"enter"));
    assert_eq!(keys(true), vec!["enter", "backspace", "esc"]);
  }
}
