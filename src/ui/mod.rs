pub mod components;
pub mod renderfns;
pub mod view;
pub mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::{ListState, Paragraph, TableState};

/// Main draw function: header, current view, footer, then overlays.
pub fn draw(frame: &mut Frame, app: &mut App) {
  let [header_area, content_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  let title = app.title().to_string();
  let host = app.host().to_string();
  let breadcrumb = app.breadcrumb();
  let message = app.message().map(str::to_string);

  match app.current_view_mut() {
    Some(view) => {
      let context = view.context();
      let shortcuts = view.shortcuts();
      renderfns::draw_header(
        frame,
        header_area,
        &title,
        &host,
        context.as_deref(),
        &shortcuts,
      );
      view.render(frame, content_area);
    }
    None => {
      renderfns::draw_header(frame, header_area, &title, &host, None, &[]);
      frame.render_widget(
        Paragraph::new("Nothing to show. Type :companies").style(Style::default().fg(Color::DarkGray)),
        content_area,
      );
    }
  }

  renderfns::draw_footer(frame, footer_area, &breadcrumb, message.as_deref());

  app.command().render_overlay(frame, content_area);
}

/// Selection state shared by lists and tables.
pub trait Selection {
  fn selected(&self) -> Option<usize>;
  fn select(&mut self, index: Option<usize>);
}

impl Selection for ListState {
  fn selected(&self) -> Option<usize> {
    ListState::selected(self)
  }

  fn select(&mut self, index: Option<usize>) {
    ListState::select(self, index);
  }
}

impl Selection for TableState {
  fn selected(&self) -> Option<usize> {
    TableState::selected(self)
  }

  fn select(&mut self, index: Option<usize>) {
    TableState::select(self, index);
  }
}

/// Keep the selection inside `0..len`, selecting the first row when
/// nothing is selected and clearing it when there are no rows.
pub fn ensure_valid_selection<S: Selection>(state: &mut S, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i >= len => state.select(Some(len - 1)),
    None => state.select(Some(0)),
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ensure_valid_selection_selects_first() {
    let mut state = ListState::default();
    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));
  }

  #[test]
  fn test_ensure_valid_selection_clamps() {
    let mut state = TableState::default();
    state.select(Some(10));
    ensure_valid_selection(&mut state, 4);
    assert_eq!(state.selected(), Some(3));
  }

  #[test]
  fn test_ensure_valid_selection_clears_when_empty() {
    let mut state = ListState::default();
    state.select(Some(2));
    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }
}
