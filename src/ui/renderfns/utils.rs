use ratatui::prelude::Color;

/// Truncate to `max_len` characters, ending with "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a wallet request or payment status
pub fn status_color(status: &str) -> Color {
  match status {
    "APPROVED" | "COMPLETED" | "SUCCEEDED" | "ACTIVE" => Color::Green,
    "PENDING" | "DRAFT" => Color::Yellow,
    "REJECTED" | "FAILED" | "CANCELLED" => Color::Red,
    _ => Color::White,
  }
}

/// Signed amounts: spending in red, gains in green
pub fn amount_color(amount: f64) -> Color {
  if amount < 0.0 {
    Color::Red
  } else if amount > 0.0 {
    Color::Green
  } else {
    Color::White
  }
}
