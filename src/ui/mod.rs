pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::ListState;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let filter = app.coordinator().selected_employee().full_name();
  let shortcuts = app.view().shortcuts();
  let filter_open = app.view().filter_open();
  renderfns::draw_header(frame, chunks[0], app.title(), &filter, shortcuts, filter_open);

  let (view, coordinator) = app.view_and_coordinator();
  view.render(frame, chunks[1], coordinator);

  renderfns::draw_status_bar(frame, chunks[2], app.coordinator());
}

/// Keep a list selection inside `0..len`, selecting the first row when
/// nothing is selected yet
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    Some(_) => {}
    None => state.select(Some(0)),
  }
}
