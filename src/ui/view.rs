use crossterm::event::KeyEvent;
use ratatui::prelude::*;

/// A keyboard shortcut hint for display in the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutInfo {
  pub key: &'static str,
  pub label: &'static str,
  pub priority: u8, // Lower = shown first
}

impl ShortcutInfo {
  pub const fn new(key: &'static str, label: &'static str) -> Self {
    Self {
      key,
      label,
      priority: 100,
    }
  }

  pub const fn with_priority(mut self, priority: u8) -> Self {
    self.priority = priority;
    self
  }
}

/// Shortcuts every view shares
pub fn base_shortcuts() -> Vec<ShortcutInfo> {
  vec![
    ShortcutInfo::new(":", "command").with_priority(10),
    ShortcutInfo::new("q", "back").with_priority(30),
  ]
}

/// Actions that a view can request in response to user input
pub enum ViewAction {
  /// No action needed
  None,
  /// Push a new view onto the stack
  Push(Box<dyn View>),
  /// Pop current view from stack (go back)
  Pop,
}

/// Trait for view behavior
///
/// Views own their input modes (search, pickers) and return actions for
/// the App to execute: App → View → Components.
///
/// Views that load data use `Query<T>` and poll it in `tick()`.
pub trait View {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction;

  fn render(&mut self, frame: &mut Frame, area: Rect);

  fn breadcrumb_label(&self) -> String;

  /// Extra header context, e.g. the cache source of the loaded data
  fn context(&self) -> Option<String> {
    None
  }

  /// True while an overlay takes text input, so `:` is typed, not a command
  fn captures_input(&self) -> bool {
    false
  }

  /// Called on each tick to poll async queries
  fn tick(&mut self) {}

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    base_shortcuts()
  }
}
