use crate::api::types::{DashboardHistory, DashboardStats, MonthlyStatistics};
use crate::api::CachedBackofficeClient;
use crate::query::Query;
use crate::table::format_currency;
use crate::ui::view::{base_shortcuts, ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

type Stats = (DashboardStats, DashboardHistory);

/// Label/value pairs for the totals panel.
pub fn summary_rows(stats: &DashboardStats) -> Vec<(String, String)> {
  let mut rows = vec![
    ("Users".to_string(), stats.total_users.to_string()),
    ("Active users".to_string(), stats.active_users.to_string()),
    ("Professionals".to_string(), stats.total_professionals.to_string()),
    ("Offers".to_string(), stats.total_offers.to_string()),
    (
      "Revenue this month".to_string(),
      format_currency(stats.current_month_revenue),
    ),
    (
      "Free / Premium".to_string(),
      format!(
        "{} / {}",
        stats.users_by_subscription_type.free, stats.users_by_subscription_type.premium
      ),
    ),
  ];

  let mut categories: Vec<_> = stats.professionals_by_category.iter().collect();
  // Largest first, ties by name
  categories.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
  rows.extend(
    categories
      .into_iter()
      .map(|(category, count)| (format!("  {}", category), count.to_string())),
  );
  rows
}

fn month_label(month: &MonthlyStatistics) -> String {
  format!("{:04}-{:02}", month.year, month.month)
}

fn month_cells(month: &MonthlyStatistics) -> Vec<String> {
  vec![
    month_label(month),
    month.users.total.to_string(),
    month.users.new.to_string(),
    month.offers.active.to_string(),
    month.revenue.map(format_currency).unwrap_or_else(|| "-".to_string()),
    format_currency(month.cagnotte.total),
    if month.frozen.unwrap_or(false) { "frozen" } else { "" }.to_string(),
  ]
}

/// Platform totals and the month-by-month history.
pub struct StatisticsView {
  client: CachedBackofficeClient,
  query: Query<Stats>,
  freeze: Option<Query<()>>,
  status_line: Option<(String, Color)>,
}

impl StatisticsView {
  pub fn new(client: CachedBackofficeClient) -> Self {
    let client_for_query = client.clone();
    let mut query = Query::new(move || {
      let client = client_for_query.clone();
      async move { tokio::try_join!(client.get_dashboard(), client.get_dashboard_full()) }
    });
    query.start();

    Self {
      client,
      query,
      freeze: None,
      status_line: None,
    }
  }

  fn start_freeze(&mut self) {
    if self.freeze.is_some() {
      return;
    }
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.freeze_previous_month().await }
    });
    query.start();
    self.freeze = Some(query);
    self.status_line = Some(("Freezing previous month...".to_string(), Color::Yellow));
  }

  fn poll_freeze(&mut self) {
    let Some(freeze) = &mut self.freeze else {
      return;
    };
    if !freeze.poll() {
      return;
    }
    self.status_line = match freeze.error() {
      None => {
        self.query.reload();
        Some(("Previous month frozen".to_string(), Color::Green))
      }
      Some(e) => Some((format!("Freeze failed: {}", e), Color::Red)),
    };
    self.freeze = None;
  }

  fn render_summary(&self, frame: &mut Frame, area: Rect, stats: &DashboardStats) {
    let lines: Vec<Line> = summary_rows(stats)
      .into_iter()
      .map(|(label, value)| {
        Line::from(vec![
          Span::styled(format!("{:<28}", label), Style::default().fg(Color::Cyan)),
          Span::raw(value),
        ])
      })
      .collect();

    let block = Block::default()
      .title(" Dashboard ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(Paragraph::new(lines).block(block), area);
  }

  fn render_history(&self, frame: &mut Frame, area: Rect, history: &DashboardHistory) {
    let header = Row::new(
      ["Month", "Users", "New", "Offers", "Revenue", "Wallet", ""]
        .into_iter()
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Cyan).bold())),
    );

    let current = Row::new(month_cells(&history.current)).style(Style::default().fg(Color::Yellow));
    let rows: Vec<Row> = std::iter::once(current)
      .chain(history.history.iter().map(|m| Row::new(month_cells(m))))
      .collect();

    let widths = [
      Constraint::Length(8),
      Constraint::Length(7),
      Constraint::Length(6),
      Constraint::Length(7),
      Constraint::Length(16),
      Constraint::Length(16),
      Constraint::Length(7),
    ];
    let block = Block::default()
      .title(" Monthly history ")
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(Table::new(rows, widths).header(header).block(block), area);
  }
}

impl View for StatisticsView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('r') => self.query.reload(),
      KeyCode::Char('z') => self.start_freeze(),
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [main_area, status_area] =
      Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    match (self.query.data(), self.query.error()) {
      (Some((stats, history)), _) => {
        let [left, right] =
          Layout::horizontal([Constraint::Length(44), Constraint::Min(0)]).areas(main_area);
        self.render_summary(frame, left, stats);
        self.render_history(frame, right, history);
      }
      (None, Some(e)) => {
        let paragraph = Paragraph::new(format!("Failed to load statistics: {}", e))
          .style(Style::default().fg(Color::Red))
          .block(Block::default().borders(Borders::ALL).title(" Statistics "));
        frame.render_widget(paragraph, main_area);
      }
      _ => {
        let paragraph = Paragraph::new("Loading statistics...")
          .style(Style::default().fg(Color::DarkGray))
          .block(Block::default().borders(Borders::ALL).title(" Statistics "));
        frame.render_widget(paragraph, main_area);
      }
    }

    if let Some((text, color)) = &self.status_line {
      frame.render_widget(
        Paragraph::new(format!(" {}", text)).style(Style::default().fg(*color)),
        status_area,
      );
    }
  }

  fn breadcrumb_label(&self) -> String {
    "Statistics".to_string()
  }

  fn tick(&mut self) {
    self.query.poll();
    self.poll_freeze();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = base_shortcuts();
    shortcuts.push(ShortcutInfo::new("z", "freeze last month").with_priority(40));
    shortcuts.push(ShortcutInfo::new("r", "reload").with_priority(100));
    shortcuts
  }
}
