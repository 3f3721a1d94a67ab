use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Value/label pair shown for one selectable item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
  pub value: String,
  pub label: String,
}

/// How a use site turns its item type into a [`SelectItem`]
pub type ParseItem<T> = fn(&T) -> SelectItem;

/// Events emitted by the select that the parent needs to handle
#[derive(Debug, Clone, PartialEq)]
pub enum SelectEvent<T> {
  /// The selection changed. `None` means it was cleared.
  Changed(Option<T>),
}

/// Dropdown-style picker over a list of items, opened with `f`.
#[derive(Clone)]
pub struct Select<T> {
  label: &'static str,
  loading_label: &'static str,
  parse_item: ParseItem<T>,
  items: Vec<T>,
  open: bool,
  highlighted: usize,
  selected: Option<SelectItem>,
}

impl<T: Clone> Select<T> {
  pub fn new(
    label: &'static str,
    loading_label: &'static str,
    parse_item: ParseItem<T>,
    default: Option<&T>,
  ) -> Self {
    Self {
      label,
      loading_label,
      parse_item,
      items: Vec::new(),
      open: false,
      highlighted: 0,
      selected: default.map(parse_item),
    }
  }

  pub fn is_open(&self) -> bool {
    self.open
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  /// Replace the selectable items, keeping the highlight in range
  pub fn set_items(&mut self, items: Vec<T>) {
    self.items = items;
    if self.highlighted >= self.items.len() {
      self.highlighted = self.items.len().saturating_sub(1);
    }
    if self.items.is_empty() {
      self.open = false;
    }
  }

  /// Value of the current selection
  pub fn selected_value(&self) -> Option<&str> {
    self.selected.as_ref().map(|s| s.value.as_str())
  }

  /// Open the picker with the current selection highlighted. Does nothing
  /// while there is nothing to pick from.
  pub fn open(&mut self) {
    if self.items.is_empty() {
      return;
    }
    self.open = true;
    let parse = self.parse_item;
    self.highlighted = self
      .selected
      .as_ref()
      .and_then(|s| self.items.iter().position(|i| parse(i).value == s.value))
      .unwrap_or(0);
  }

  pub fn close(&mut self) {
    self.open = false;
  }

  /// Handle a key event. Call this regardless of open state - it handles
  /// opening too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<SelectEvent<T>> {
    if !self.open {
      if key.code == KeyCode::Char('f') {
        self.open();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => {
        self.close();
        KeyResult::Handled
      }
      KeyCode::Enter => {
        self.close();
        match self.items.get(self.highlighted) {
          Some(item) => {
            self.selected = Some((self.parse_item)(item));
            KeyResult::Event(SelectEvent::Changed(Some(item.clone())))
          }
          None => KeyResult::Handled,
        }
      }
      // The owner decides what clearing means, the shown value stays put
      KeyCode::Backspace | KeyCode::Delete => {
        self.close();
        KeyResult::Event(SelectEvent::Changed(None))
      }
      KeyCode::Char('j') | KeyCode::Down => {
        if !self.items.is_empty() {
          self.highlighted = (self.highlighted + 1) % self.items.len();
        }
        KeyResult::Handled
      }
      KeyCode::Char('k') | KeyCode::Up => {
        if !self.items.is_empty() {
          self.highlighted = if self.highlighted == 0 {
            self.items.len() - 1
          } else {
            self.highlighted - 1
          };
        }
        KeyResult::Handled
      }
      _ => KeyResult::Handled,
    }
  }

  /// Render the closed field: label plus the current selection
  pub fn render_field(&self, frame: &mut Frame, area: Rect, loading: bool) {
    let value = if loading {
      Span::styled(self.loading_label, Style::default().fg(Color::DarkGray).italic())
    } else {
      match &self.selected {
        Some(item) => Span::styled(item.label.clone(), Style::default().fg(Color::Yellow)),
        None => Span::styled("(none)", Style::default().fg(Color::DarkGray)),
      }
    };

    let line = Line::from(vec![
      value,
      Span::raw("  "),
      Span::styled("<f>", Style::default().fg(Color::Cyan)),
      Span::styled(" change", Style::default().fg(Color::DarkGray)),
    ]);

    let block = Block::default()
      .title(format!(" {} ", self.label))
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    frame.render_widget(Paragraph::new(line).block(block), area);
  }

  /// Render the picker overlay if open
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.open || self.items.is_empty() {
      return;
    }

    let labels: Vec<String> = self.items.iter().map(|i| (self.parse_item)(i).label).collect();

    let max_label_len = labels.iter().map(String::len).max().unwrap_or(10);
    let width = (max_label_len as u16 + 6)
      .max(self.label.len() as u16 + 6)
      .min(area.width.saturating_sub(4))
      .max(20)
      .min(area.width);
    let height = (labels.len() as u16 + 2)
      .min(area.height.saturating_sub(2))
      .max(3)
      .min(area.height);

    // Drop down from just under the field
    let x = area.x + 1;
    let y = area.y + 2;
    let overlay_area = Rect::new(x, y, width, height).intersection(area);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.label));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let selected_value = self.selected_value();
    let items: Vec<ListItem> = self
      .items
      .iter()
      .zip(labels)
      .map(|(item, label)| {
        let is_selected = Some((self.parse_item)(item).value.as_str()) == selected_value;
        let style = if is_selected {
          Style::default().fg(Color::Yellow)
        } else {
          Style::default().fg(Color::Cyan)
        };
        ListItem::new(Line::from(Span::styled(label, style)))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.highlighted));

    frame.render_stateful_widget(list, inner, &mut state);
  }
}
