use crate::ui::view::Shortcut;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar: app name, title, active filter, then the hints
/// for whichever of the list or the picker has focus
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  filter: &str,
  shortcuts: &[Shortcut],
  picker_open: bool,
) {
  let mut spans = vec![
    Span::styled(" txview ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" {} ", filter),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw(" "),
  ];

  // Keys highlighted, descriptions dimmed
  for shortcut in shortcuts.iter().filter(|s| s.in_picker == picker_open) {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Extract host from an API URL for the header
pub fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
