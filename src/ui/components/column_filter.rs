use super::input::{InputResult, TextInput};
use super::picker::{Picker, PickerEvent};
use super::KeyResult;
use crate::table::ColumnKey;
use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnFilterEvent {
  /// Column and value chosen. An empty value means "no filter".
  Applied(ColumnKey, String),
  Cancelled,
}

#[derive(Debug, Clone, Default)]
enum Stage {
  #[default]
  Hidden,
  Column,
  Value(ColumnKey),
}

/// Two-step column filter: pick a column, then type the value.
#[derive(Debug, Clone, Default)]
pub struct ColumnFilter {
  stage: Stage,
  columns: Picker<ColumnKey>,
  value: TextInput,
}

impl ColumnFilter {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    !matches!(self.stage, Stage::Hidden)
  }

  /// Start with the column picker over `columns`.
  pub fn show(&mut self, columns: Vec<ColumnKey>) {
    self.columns.show("Filter column", columns);
    self.value.clear();
    self.stage = Stage::Column;
  }

  fn hide(&mut self) {
    self.stage = Stage::Hidden;
    self.columns.hide();
    self.value.clear();
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<ColumnFilterEvent> {
    match &self.stage {
      Stage::Hidden => KeyResult::NotHandled,
      Stage::Column => match self.columns.handle_key(key) {
        KeyResult::Event(PickerEvent::Selected(column)) => {
          self.stage = Stage::Value(column);
          KeyResult::Handled
        }
        KeyResult::Event(PickerEvent::Cancelled) => {
          self.hide();
          KeyResult::Event(ColumnFilterEvent::Cancelled)
        }
        _ => KeyResult::Handled,
      },
      Stage::Value(column) => {
        let column = column.clone();
        match self.value.handle_key(key) {
          InputResult::Submitted(value) => {
            self.hide();
            KeyResult::Event(ColumnFilterEvent::Applied(column, value))
          }
          InputResult::Cancelled => {
            self.hide();
            KeyResult::Event(ColumnFilterEvent::Cancelled)
          }
          InputResult::Consumed | InputResult::NotHandled => KeyResult::Handled,
        }
      }
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    match &self.stage {
      Stage::Hidden => {}
      Stage::Column => self.columns.render_overlay(frame, area),
      Stage::Value(column) => {
        let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
        let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3.min(area.height));

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Yellow))
          .title(format!(" {} contains ", column));

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let (before, after) = self.value.split_at_cursor();
        let line = Line::from(vec![
          Span::raw(before),
          Span::styled("_", Style::default().fg(Color::Yellow)),
          Span::raw(after),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
      }
    }
  }
}
