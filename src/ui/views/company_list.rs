use crate::api::types::Company;
use crate::api::CachedBackofficeClient;
use crate::cache::{CacheResult, CacheSource};
use crate::query::Query;
use crate::table::{
  compute_view_indices, derive_columns, format_currency, format_display, get_value,
  total_annual_revenue, ColumnKey, ViewState,
};
use crate::ui::components::{ColumnFilter, ColumnFilterEvent, KeyResult, SearchEvent, SearchInput};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::truncate;
use crate::ui::view::{base_shortcuts, ShortcutInfo, View, ViewAction};
use crate::ui::views::CompanyDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use std::sync::Arc;

const MIN_COLUMN_WIDTH: u16 = 10;
const MAX_COLUMN_WIDTH: u16 = 28;

type Companies = CacheResult<Arc<Vec<Company>>>;

fn column_width(column: &ColumnKey) -> u16 {
  // Header plus room for the sort arrow
  let wanted = column.field().chars().count() as u16 + 3;
  wanted.clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH)
}

/// First column to draw so that `cursor` is on screen, given the
/// previous offset and the available width.
fn scroll_offset(widths: &[u16], cursor: usize, offset: usize, available: u16) -> usize {
  if cursor < offset {
    return cursor;
  }
  let mut start = offset;
  loop {
    let used: u16 = widths[start..=cursor]
      .iter()
      .map(|w| w + 1)
      .fold(0u16, |acc, w| acc.saturating_add(w));
    if used <= available || start == cursor {
      return start;
    }
    start += 1;
  }
}

/// The company dashboard: every record in a searchable, filterable,
/// sortable table.
pub struct CompanyListView {
  client: CachedBackofficeClient,
  query: Query<Companies>,
  columns: Vec<ColumnKey>,
  state: ViewState,
  visible: Vec<usize>,
  table_state: TableState,
  column_cursor: usize,
  column_offset: usize,
  search: SearchInput,
  filter: ColumnFilter,
}

impl CompanyListView {
  pub fn new(client: CachedBackofficeClient) -> Self {
    let client_for_query = client.clone();
    let mut query = Query::new(move || {
      let client = client_for_query.clone();
      async move { client.get_all_companies_with_source().await }
    });
    query.start();

    Self {
      client,
      query,
      columns: Vec::new(),
      state: ViewState::default(),
      visible: Vec::new(),
      table_state: TableState::default(),
      column_cursor: 0,
      column_offset: 0,
      search: SearchInput::new(),
      filter: ColumnFilter::new(),
    }
  }

  fn records(&self) -> &[Company] {
    self
      .query
      .data()
      .map(|loaded| loaded.data.as_slice())
      .unwrap_or(&[])
  }

  fn on_loaded(&mut self) {
    self.columns = derive_columns(self.records());
    self.column_cursor = self.column_cursor.min(self.columns.len().saturating_sub(1));
    self.refresh_view();
  }

  /// Recompute the visible rows. Only called when records or view state change.
  fn refresh_view(&mut self) {
    self.visible = compute_view_indices(self.records(), &self.columns, &self.state);
    ensure_valid_selection(&mut self.table_state, self.visible.len());
  }

  fn selected_company(&self) -> Option<&Company> {
    let row = self.table_state.selected()?;
    let index = *self.visible.get(row)?;
    self.records().get(index)
  }

  fn cursor_column(&self) -> Option<&ColumnKey> {
    self.columns.get(self.column_cursor)
  }

  fn handle_overlays(&mut self, key: KeyEvent) -> bool {
    match self.filter.handle_key(key) {
      KeyResult::Event(ColumnFilterEvent::Applied(column, value)) => {
        if value.is_empty() {
          self.state.clear_filter();
        } else {
          self.state.set_filter(column, value);
        }
        self.table_state.select(Some(0));
        self.refresh_view();
        return true;
      }
      KeyResult::Event(ColumnFilterEvent::Cancelled) | KeyResult::Handled => return true,
      KeyResult::NotHandled => {}
    }

    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(term)) => {
        self.state.search = term;
        self.table_state.select(Some(0));
        self.refresh_view();
        true
      }
      KeyResult::Event(SearchEvent::Submitted) | KeyResult::Handled => true,
      KeyResult::NotHandled => false,
    }
  }

  fn title(&self) -> String {
    let loading = if self.query.is_loading() {
      " loading..."
    } else {
      ""
    };

    let Some(loaded) = self.query.data() else {
      return format!(" Companies{} ", loading);
    };

    let rows = self.visible.iter().filter_map(|&i| loaded.data.get(i));
    let mut title = format!(
      " Companies ({}/{}) [{}] total {}",
      self.visible.len(),
      loaded.data.len(),
      loaded.source.label(),
      format_currency(total_annual_revenue(rows)),
    );

    if !self.state.search.is_empty() {
      title.push_str(&format!(" [/{}]", self.state.search));
    }
    if let Some((column, value)) = self.state.active_filter() {
      title.push_str(&format!(" [{} ~ {}]", column, value));
    }
    title.push_str(loading);
    title.push(' ');
    title
  }

  fn render_placeholder(&self, frame: &mut Frame, area: Rect, block: Block) {
    let content = if let Some(e) = self.query.error() {
      format!("Failed to load companies: {}\nPress 'r' to retry.", e)
    } else if self.query.data().is_none() {
      "Loading companies...".to_string()
    } else if self.records().is_empty() {
      "No companies.".to_string()
    } else {
      "No company matches the current search and filter.".to_string()
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
  }

  fn render_table(&mut self, frame: &mut Frame, area: Rect) {
    let border_color = match self.query.source() {
      Some(CacheSource::Offline) => Color::Red,
      _ => Color::Blue,
    };
    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border_color));

    if self.visible.is_empty() || self.columns.is_empty() {
      self.render_placeholder(frame, area, block);
      return;
    }

    let widths: Vec<u16> = self.columns.iter().map(column_width).collect();
    let available = area.width.saturating_sub(4);
    self.column_offset = scroll_offset(&widths, self.column_cursor, self.column_offset, available);

    // Columns that fit from the offset on
    let mut shown = Vec::new();
    let mut used = 0u16;
    for (i, width) in widths.iter().enumerate().skip(self.column_offset) {
      if used + width + 1 > available && !shown.is_empty() {
        break;
      }
      used = used.saturating_add(width + 1);
      shown.push(i);
    }

    let header = Row::new(shown.iter().map(|&i| {
      let column = &self.columns[i];
      let arrow = self
        .state
        .sort_direction(column)
        .map(|d| format!(" {}", d.arrow()))
        .unwrap_or_default();
      let label = truncate(column.field(), widths[i] as usize - arrow.chars().count());
      let style = if i == self.column_cursor {
        Style::default().fg(Color::Black).bg(Color::Yellow).bold()
      } else {
        Style::default().fg(Color::Cyan).bold()
      };
      Cell::from(format!("{}{}", label, arrow)).style(style)
    }));

    let records = self.records();
    let rows: Vec<Row> = self
      .visible
      .iter()
      .filter_map(|&index| records.get(index))
      .map(|record| {
        Row::new(shown.iter().map(|&i| {
          let text = format_display(get_value(record, &self.columns[i]));
          let cell = Cell::from(truncate(&text, widths[i] as usize));
          if i == self.column_cursor {
            cell.style(Style::default().fg(Color::Yellow))
          } else {
            cell
          }
        }))
      })
      .collect();

    let constraints: Vec<Constraint> = shown.iter().map(|&i| Constraint::Length(widths[i])).collect();
    let table = Table::new(rows, constraints)
      .header(header)
      .block(block)
      .row_highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, &mut self.table_state);
  }
}

impl View for CompanyListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    if self.handle_overlays(key) {
      return ViewAction::None;
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
      KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
      KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
      KeyCode::Char('G') | KeyCode::End => {
        let last = self.visible.len().saturating_sub(1);
        self.table_state.select(Some(last));
      }
      KeyCode::PageDown => self.table_state.scroll_down_by(20),
      KeyCode::PageUp => self.table_state.scroll_up_by(20),
      KeyCode::Char('h') | KeyCode::Left => {
        self.column_cursor = self.column_cursor.saturating_sub(1);
      }
      KeyCode::Char('l') | KeyCode::Right => {
        if self.column_cursor + 1 < self.columns.len() {
          self.column_cursor += 1;
        }
      }
      KeyCode::Char('f') => {
        if !self.columns.is_empty() {
          self.filter.show(self.columns.clone());
        }
      }
      KeyCode::Char('F') => {
        self.state.clear_filter();
        self.refresh_view();
      }
      KeyCode::Char('s') => {
        if let Some(column) = self.cursor_column().cloned() {
          self.state.toggle_sort(&column);
          self.refresh_view();
        }
      }
      KeyCode::Char('c') => {
        self.state.clear();
        self.search.clear();
        self.table_state.select(Some(0));
        self.refresh_view();
      }
      KeyCode::Char('r') => self.query.reload(),
      KeyCode::Enter => {
        if let Some(id) = self.selected_company().and_then(Company::id) {
          return ViewAction::Push(Box::new(CompanyDetailView::new(id, self.client.clone())));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_table(frame, area);
    self.search.render_overlay(frame, area);
    self.filter.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Companies".to_string()
  }

  fn context(&self) -> Option<String> {
    let label = self.query.source()?.label();
    Some(match self.query.cached_at() {
      Some(at) => format!("{} since {}", label, at.format("%H:%M")),
      None => label.to_string(),
    })
  }

  fn captures_input(&self) -> bool {
    self.search.is_active() || self.filter.is_active()
  }

  fn tick(&mut self) {
    if self.query.poll() && self.query.error().is_none() {
      self.on_loaded();
    }
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = base_shortcuts();
    shortcuts.extend([
      ShortcutInfo::new("/", "search").with_priority(20),
      ShortcutInfo::new("f", "filter").with_priority(40),
      ShortcutInfo::new("s", "sort").with_priority(50),
      ShortcutInfo::new("h/l", "column").with_priority(60),
      ShortcutInfo::new("r", "reload").with_priority(100),
    ]);
    if self.state.active_filter().is_some() {
      shortcuts.push(ShortcutInfo::new("F", "unfilter").with_priority(41));
    }
    if self.state.has_active_filters() {
      shortcuts.push(ShortcutInfo::new("c", "clear").with_priority(70));
    }
    shortcuts
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_column_width_bounds() {
    assert_eq!(column_width(&ColumnKey::Top("id".to_string())), MIN_COLUMN_WIDTH);
    assert_eq!(
      column_width(&ColumnKey::Top("a".repeat(80))),
      MAX_COLUMN_WIDTH
    );
  }

  #[test]
  fn test_scroll_offset_follows_cursor() {
    let widths = [10, 10, 10, 10];
    // Everything fits
    assert_eq!(scroll_offset(&widths, 3, 0, 44), 0);
    // Only two fit: cursor at 3 needs offset 2
    assert_eq!(scroll_offset(&widths, 3, 0, 22), 2);
    // Moving left of the window snaps the offset to the cursor
    assert_eq!(scroll_offset(&widths, 1, 2, 22), 1);
    // A column wider than the screen is still shown alone
    assert_eq!(scroll_offset(&widths, 2, 0, 5), 2);
  }
}
