use chrono::NaiveDate;
use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Format an amount as dollars with thousands separators, e.g. `$1,234.50`
pub fn format_amount(amount: f64) -> String {
  let cents = (amount.abs() * 100.0).round() as u64;
  let whole = (cents / 100).to_string();

  let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
  for (i, c) in whole.chars().enumerate() {
    if i > 0 && (whole.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }

  let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
  format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Render an ISO date (`2023-03-04`) as `Mar 04, 2023`; anything else is
/// shown as-is
pub fn format_date(date: &str) -> String {
  match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
    Ok(d) => d.format("%b %d, %Y").to_string(),
    Err(_) => date.to_string(),
  }
}

/// Display color for an approval state
pub fn approval_color(approved: bool) -> Color {
  if approved {
    Color::Green
  } else {
    Color::Yellow
  }
}
