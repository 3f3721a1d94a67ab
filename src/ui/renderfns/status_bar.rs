use crate::coordinator::{InitState, Mode, ViewCoordinator};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the status line: the last error if there is one, otherwise what is
/// loading or how much of the feed is on screen
pub fn draw_status_bar(frame: &mut Frame, area: Rect, coordinator: &ViewCoordinator) {
  let line = if let Some(error) = coordinator.last_error() {
    Line::from(vec![
      Span::styled(format!(" {} ", error), Style::default().fg(Color::Red)),
      Span::styled("<r>", Style::default().fg(Color::Cyan)),
      Span::styled(" retry", Style::default().fg(Color::DarkGray)),
    ])
  } else {
    Line::from(Span::styled(
      format!(" {}", status_text(coordinator)),
      Style::default().fg(Color::DarkGray),
    ))
  };

  frame.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

fn status_text(coordinator: &ViewCoordinator) -> String {
  let mut parts = Vec::new();

  if coordinator.init_state() == InitState::NotStarted {
    parts.push("starting...".to_string());
  }
  if coordinator.employees_loading() {
    parts.push("loading employees...".to_string());
  }
  if coordinator.transactions_loading() {
    parts.push("loading transactions...".to_string());
  }
  if coordinator.approval_pending() {
    parts.push("saving approval...".to_string());
  }

  if let Some(rows) = coordinator.transactions() {
    let shown = coordinator.visible_transactions().len();
    let suffix = if coordinator.feed_exhausted() {
      " (all loaded)"
    } else {
      ""
    };
    let source = match coordinator.mode() {
      Mode::All => "all employees",
      Mode::ByEmployee(_) => "one employee",
    };
    parts.push(format!(
      "{} of {} transactions from {}{}  window {}",
      shown,
      rows.len(),
      source,
      suffix,
      coordinator.rows_shown()
    ));
  }

  parts.join("  ")
}
