use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::api::types::WalletRequestStatus;
use crate::table::ColumnKey;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Something that can be listed in a [`Picker`].
pub trait PickerItem: Clone {
  fn label(&self) -> String;
}

impl PickerItem for ColumnKey {
  fn label(&self) -> String {
    self.to_string()
  }
}

impl PickerItem for WalletRequestStatus {
  fn label(&self) -> String {
    self.as_str().to_string()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent<T> {
  Selected(T),
  Cancelled,
}

/// Centered overlay list. Typing narrows the choices.
#[derive(Debug, Clone)]
pub struct Picker<T> {
  active: bool,
  title: String,
  items: Vec<T>,
  narrow: TextInput,
  selected: usize,
}

impl<T> Default for Picker<T> {
  fn default() -> Self {
    Self {
      active: false,
      title: String::new(),
      items: Vec::new(),
      narrow: TextInput::new(),
      selected: 0,
    }
  }
}

impl<T: PickerItem> Picker<T> {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn show(&mut self, title: impl Into<String>, items: Vec<T>) {
    self.active = true;
    self.title = title.into();
    self.items = items;
    self.narrow.clear();
    self.selected = 0;
  }

  pub fn hide(&mut self) {
    self.active = false;
    self.items.clear();
    self.narrow.clear();
    self.selected = 0;
  }

  /// Items matching the narrowing text, in their original order.
  fn visible(&self) -> Vec<&T> {
    let needle = self.narrow.value().to_lowercase();
    self
      .items
      .iter()
      .filter(|item| needle.is_empty() || item.label().to_lowercase().contains(&needle))
      .collect()
  }

  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<PickerEvent<T>> {
    if !self.active {
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.hide();
        KeyResult::Event(PickerEvent::Cancelled)
      }
      KeyCode::Enter => {
        let picked = self.visible().get(self.selected).map(|item| (*item).clone());
        self.hide();
        match picked {
          Some(item) => KeyResult::Event(PickerEvent::Selected(item)),
          None => KeyResult::Event(PickerEvent::Cancelled),
        }
      }
      KeyCode::Down | KeyCode::Tab => {
        let count = self.visible().len();
        if count > 0 {
          self.selected = (self.selected + 1) % count;
        }
        KeyResult::Handled
      }
      KeyCode::Up | KeyCode::BackTab => {
        let count = self.visible().len();
        if count > 0 {
          self.selected = (self.selected + count - 1) % count;
        }
        KeyResult::Handled
      }
      _ => {
        if let InputResult::Consumed = self.narrow.handle_key(key) {
          self.selected = 0;
        }
        KeyResult::Handled
      }
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let visible = self.visible();
    let longest = self
      .items
      .iter()
      .map(|item| item.label().chars().count())
      .max()
      .unwrap_or(10)
      .max(self.title.chars().count());

    let width = (longest as u16 + 6).clamp(20, area.width.saturating_sub(4).max(20));
    let height = (visible.len() as u16 + 3).clamp(4, area.height.saturating_sub(4).max(4));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let overlay_area = Rect::new(x, y, width.min(area.width), height.min(area.height));

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" {} ", self.title));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let [narrow_area, list_area] =
      Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let narrow_line = Line::from(vec![
      Span::styled("> ", Style::default().fg(Color::Yellow)),
      Span::raw(self.narrow.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(narrow_line), narrow_area);

    let items: Vec<ListItem> = visible
      .iter()
      .map(|item| ListItem::new(Span::styled(item.label(), Style::default().fg(Color::Cyan))))
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected));
    frame.render_stateful_widget(list, list_area, &mut state);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_inactive_passes_keys_through() {
    let mut picker: Picker<WalletRequestStatus> = Picker::new();
    assert_eq!(picker.handle_key(key(KeyCode::Enter)), KeyResult::NotHandled);
  }

  #[test]
  fn test_select_with_arrows() {
    let mut picker = Picker::new();
    picker.show("Status", WalletRequestStatus::ALL.to_vec());
    picker.handle_key(key(KeyCode::Down));
    picker.handle_key(key(KeyCode::Down));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected(WalletRequestStatus::Rejected))
    );
    assert!(!picker.is_active());
  }

  #[test]
  fn test_up_wraps_to_last() {
    let mut picker = Picker::new();
    picker.show("Status", WalletRequestStatus::ALL.to_vec());
    picker.handle_key(key(KeyCode::Up));
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected(WalletRequestStatus::Completed))
    );
  }

  #[test]
  fn test_typing_narrows_choices() {
    let mut picker = Picker::new();
    picker.show(
      "Column",
      vec![
        ColumnKey::Top("name".to_string()),
        ColumnKey::Top("city".to_string()),
      ],
    );
    for c in "CIT".chars() {
      picker.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Selected(ColumnKey::Top("city".to_string())))
    );
  }

  #[test]
  fn test_no_match_cancels() {
    let mut picker = Picker::new();
    picker.show("Status", WalletRequestStatus::ALL.to_vec());
    for c in "zz".chars() {
      picker.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(
      picker.handle_key(key(KeyCode::Enter)),
      KeyResult::Event(PickerEvent::Cancelled)
    );
  }
}
