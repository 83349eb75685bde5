use crate::api::types::{Offer, Payment, SubscriptionPlan, User, WalletRequest, WalletTransaction};
use crate::api::{ApiError, CachedBackofficeClient};
use crate::query::Query;
use crate::table::{format_currency, ABSENT};
use crate::ui::components::{KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{amount_color, status_color, truncate};
use crate::ui::view::{base_shortcuts, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use serde::Serialize;
use std::future::Future;

/// A record shown as one table row.
pub trait ListRow: Send + 'static {
  /// Column headers with their widths
  fn headers() -> &'static [(&'static str, u16)];

  fn cells(&self) -> Vec<String>;

  /// A column to tint, and the color
  fn accent(&self) -> Option<(usize, Color)> {
    None
  }
}

/// Wire name of a serde enum, e.g. `SUCCEEDED`.
fn wire_name<T: Serialize>(value: &T) -> String {
  match serde_json::to_value(value) {
    Ok(serde_json::Value::String(s)) => s,
    _ => ABSENT.to_string(),
  }
}

fn or_absent(value: Option<&str>) -> String {
  match value {
    Some(v) if !v.is_empty() => v.to_string(),
    _ => ABSENT.to_string(),
  }
}

impl ListRow for User {
  fn headers() -> &'static [(&'static str, u16)] {
    &[
      ("ID", 6),
      ("Name", 24),
      ("Email", 30),
      ("Type", 13),
      ("Plan", 8),
      ("City", 16),
      ("Category", 20),
      ("Wallet", 12),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.full_name(),
      self.email.clone(),
      self.user_type.as_ref().map(wire_name).unwrap_or_else(|| ABSENT.to_string()),
      self
        .subscription_type
        .as_ref()
        .map(wire_name)
        .unwrap_or_else(|| ABSENT.to_string()),
      or_absent(self.city.as_deref()),
      or_absent(self.category.as_deref().or(self.profession.as_deref())),
      self.wallet_balance.map(format_currency).unwrap_or_else(|| ABSENT.to_string()),
    ]
  }
}

impl ListRow for Offer {
  fn headers() -> &'static [(&'static str, u16)] {
    &[
      ("ID", 6),
      ("Title", 30),
      ("Type", 10),
      ("Status", 9),
      ("Price", 14),
      ("Start", 12),
      ("End", 12),
      ("Featured", 8),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.map(|id| id.to_string()).unwrap_or_else(|| ABSENT.to_string()),
      self.title.clone(),
      wire_name(&self.offer_type),
      wire_name(&self.status),
      format_currency(self.price),
      or_absent(Some(self.start_date.as_str())),
      or_absent(Some(self.end_date.as_str())),
      if self.is_featured { "Yes" } else { "No" }.to_string(),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((3, status_color(&wire_name(&self.status))))
  }
}

impl ListRow for SubscriptionPlan {
  fn headers() -> &'static [(&'static str, u16)] {
    &[
      ("ID", 6),
      ("Title", 24),
      ("Category", 13),
      ("Duration", 9),
      ("Price", 14),
      ("Referral", 14),
      ("Description", 40),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      self.title.clone(),
      self.category.as_ref().map(wire_name).unwrap_or_else(|| ABSENT.to_string()),
      self.duration.as_ref().map(wire_name).unwrap_or_else(|| ABSENT.to_string()),
      format_currency(self.price),
      format_currency(self.referral_reward),
      or_absent(Some(self.description.as_str())),
    ]
  }
}

impl ListRow for Payment {
  fn headers() -> &'static [(&'static str, u16)] {
    &[("ID", 6), ("Date", 22), ("Amount", 14), ("Status", 10), ("Stripe intent", 30)]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      or_absent(Some(self.payment_date.as_str())),
      format_currency(self.amount),
      wire_name(&self.status),
      or_absent(self.stripe_payment_intent_id.as_deref()),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((3, status_color(&wire_name(&self.status))))
  }
}

impl ListRow for WalletTransaction {
  fn headers() -> &'static [(&'static str, u16)] {
    &[("ID", 6), ("Date", 22), ("User", 28), ("Amount", 14), ("Description", 40)]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      or_absent(Some(self.date.as_str())),
      or_absent(self.user.as_ref().map(|u| u.email.as_str())),
      format_currency(self.amount),
      or_absent(Some(self.description.as_str())),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((3, amount_color(self.amount)))
  }
}

impl ListRow for WalletRequest {
  fn headers() -> &'static [(&'static str, u16)] {
    &[
      ("ID", 6),
      ("Created", 22),
      ("User", 28),
      ("Total", 14),
      ("Status", 10),
      ("Professionals", 40),
    ]
  }

  fn cells(&self) -> Vec<String> {
    vec![
      self.id.to_string(),
      or_absent(Some(self.created_at.as_str())),
      or_absent(self.user.as_ref().map(|u| u.email.as_str())),
      format_currency(self.total_amount),
      self.status.as_str().to_string(),
      or_absent(Some(self.professionals.as_str())),
    ]
  }

  fn accent(&self) -> Option<(usize, Color)> {
    Some((4, status_color(self.status.as_str())))
  }
}

/// Indices of the rows whose cells contain `term`, ignoring case.
pub fn filter_rows<T: ListRow>(rows: &[T], term: &str) -> Vec<usize> {
  let needle = term.to_lowercase();
  rows
    .iter()
    .enumerate()
    .filter(|(_, row)| {
      needle.is_empty()
        || row
          .cells()
          .iter()
          .any(|cell| cell.to_lowercase().contains(&needle))
    })
    .map(|(i, _)| i)
    .collect()
}

/// Read-only searchable table over one endpoint's records.
pub struct EntityListView<T: ListRow> {
  label: &'static str,
  query: Query<Vec<T>>,
  visible: Vec<usize>,
  table_state: TableState,
  search: SearchInput,
}

impl<T: ListRow> EntityListView<T> {
  pub fn new<F, Fut>(label: &'static str, fetcher: F) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>, ApiError>> + Send + 'static,
  {
    let mut query = Query::new(fetcher);
    query.start();
    Self {
      label,
      query,
      visible: Vec::new(),
      table_state: TableState::default(),
      search: SearchInput::new(),
    }
  }

  fn rows(&self) -> &[T] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  pub fn selected(&self) -> Option<&T> {
    let row = self.table_state.selected()?;
    self.rows().get(*self.visible.get(row)?)
  }

  pub fn reload(&mut self) {
    self.query.reload();
  }

  fn refresh_view(&mut self) {
    self.visible = filter_rows(self.rows(), self.search.query());
    ensure_valid_selection(&mut self.table_state, self.visible.len());
  }

  fn title(&self) -> String {
    if self.query.is_loading() {
      return format!(" {} (loading...) ", self.label);
    }
    if self.query.error().is_some() {
      return format!(" {} (error) ", self.label);
    }
    let total = self.rows().len();
    if self.search.query().is_empty() {
      format!(" {} ({}) ", self.label, total)
    } else {
      format!(
        " {} ({}/{}) [/{}] ",
        self.label,
        self.visible.len(),
        total,
        self.search.query()
      )
    }
  }
}

impl<T: ListRow> View for EntityListView<T> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(_)) => {
        self.table_state.select(Some(0));
        self.refresh_view();
        return ViewAction::None;
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => {
        let last = self.visible.len().saturating_sub(1);
        self.table_state.select(Some(last));
      }
      KeyCode::Char('r') => self.query.reload(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if self.visible.is_empty() {
      let content = match (self.query.error(), self.query.data()) {
        (Some(e), _) => format!("Failed to load: {}\nPress 'r' to retry.", e),
        (None, Some(_)) => "Nothing to show.".to_string(),
        (None, None) => "Loading...".to_string(),
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      self.search.render_overlay(frame, area);
      return;
    }

    let headers = T::headers();
    let header = Row::new(
      headers
        .iter()
        .map(|(name, _)| Cell::from(*name).style(Style::default().fg(Color::Cyan).bold())),
    );

    let rows: Vec<Row> = self
      .visible
      .iter()
      .filter_map(|&i| self.rows().get(i))
      .map(|row| {
        let accent = row.accent();
        Row::new(row.cells().into_iter().enumerate().map(|(col, text)| {
          let width = headers.get(col).map(|(_, w)| *w as usize).unwrap_or(20);
          let cell = Cell::from(truncate(&text, width));
          match accent {
            Some((accent_col, color)) if accent_col == col => cell.style(Style::default().fg(color)),
            _ => cell,
          }
        }))
      })
      .collect();

    let widths = headers.iter().map(|(_, w)| Constraint::Length(*w));
    let table = Table::new(rows, widths)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.label.to_string()
  }

  fn captures_input(&self) -> bool {
    self.search.is_active()
  }

  fn tick(&mut self) {
    if self.query.poll() {
      self.refresh_view();
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = base_shortcuts();
    shortcuts.push(ShortcutInfo::new("/", "search").with_priority(20));
    shortcuts.push(ShortcutInfo::new("r", "reload").with_priority(100));
    shortcuts
  }
}

pub fn users_view(client: &CachedBackofficeClient) -> EntityListView<User> {
  let client = client.clone();
  EntityListView::new("Users", move || {
    let client = client.clone();
    async move { client.get_all_users().await }
  })
}

pub fn professionals_view(client: &CachedBackofficeClient) -> EntityListView<User> {
  let client = client.clone();
  EntityListView::new("Professionals", move || {
    let client = client.clone();
    async move { client.get_professionals().await }
  })
}

pub fn offers_view(client: &CachedBackofficeClient) -> EntityListView<Offer> {
  let client = client.clone();
  EntityListView::new("Offers", move || {
    let client = client.clone();
    async move { client.get_all_offers().await }
  })
}

pub fn plans_view(client: &CachedBackofficeClient) -> EntityListView<SubscriptionPlan> {
  let client = client.clone();
  EntityListView::new("Plans", move || {
    let client = client.clone();
    async move { client.get_plans().await }
  })
}

pub fn payments_view(client: &CachedBackofficeClient) -> EntityListView<Payment> {
  let client = client.clone();
  EntityListView::new("Payments", move || {
    let client = client.clone();
    async move { client.get_my_payments().await }
  })
}

pub fn wallet_history_view(client: &CachedBackofficeClient) -> EntityListView<WalletTransaction> {
  let client = client.clone();
  EntityListView::new("Wallet history", move || {
    let client = client.clone();
    async move { client.get_admin_wallet_history().await }
  })
}
