use crate::api::types::{WalletRequest, WalletRequestStatus};
use crate::api::CachedBackofficeClient;
use crate::query::Query;
use crate::ui::components::{KeyResult, Picker, PickerEvent};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::EntityListView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Admin wallet requests, with status updates.
pub struct WalletRequestsView {
  client: CachedBackofficeClient,
  list: EntityListView<WalletRequest>,
  picker: Picker<WalletRequestStatus>,
  /// Request the picker was opened for
  target: Option<i64>,
  update: Option<Query<WalletRequest>>,
  status_line: Option<(String, Color)>,
}

impl WalletRequestsView {
  pub fn new(client: CachedBackofficeClient) -> Self {
    let client_for_query = client.clone();
    let list = EntityListView::new("Wallet requests", move || {
      let client = client_for_query.clone();
      async move { client.get_admin_wallet_requests().await }
    });

    Self {
      client,
      list,
      picker: Picker::new(),
      target: None,
      update: None,
      status_line: None,
    }
  }

  fn start_update(&mut self, request_id: i64, status: WalletRequestStatus) {
    let client = self.client.clone();
    let mut query = Query::new(move || {
      let client = client.clone();
      async move { client.update_wallet_request_status(request_id, status).await }
    });
    query.start();
    self.update = Some(query);
    self.status_line = Some((
      format!("Setting request #{} to {}...", request_id, status),
      Color::Yellow,
    ));
  }

  fn poll_update(&mut self) {
    let Some(update) = &mut self.update else {
      return;
    };
    if !update.poll() {
      return;
    }
    match (update.error(), update.data()) {
      (Some(e), _) => {
        self.status_line = Some((format!("Update failed: {}", e), Color::Red));
      }
      (None, Some(request)) => {
        self.status_line = Some((
          format!("Request #{} is now {}", request.id, request.status),
          Color::Green,
        ));
        self.list.reload();
      }
      (None, None) => return,
    }
    self.update = None;
  }
}

impl View for WalletRequestsView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match self.picker.handle_key(key) {
      KeyResult::Event(PickerEvent::Selected(status)) => {
        if let Some(id) = self.target.take() {
          self.start_update(id, status);
        }
        return ViewAction::None;
      }
      KeyResult::Event(PickerEvent::Cancelled) => {
        self.target = None;
        return ViewAction::None;
      }
      KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    if key.code == KeyCode::Char('a') && !self.list.captures_input() {
      if let Some(request) = self.list.selected() {
        let title = format!("Request #{} ({})", request.id, request.status);
        self.target = Some(request.id);
        self.picker.show(title, WalletRequestStatus::ALL.to_vec());
      }
      return ViewAction::None;
    }

    self.list.handle_key(key)
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let [list_area, status_area] =
      Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    self.list.render(frame, list_area);

    if let Some((text, color)) = &self.status_line {
      frame.render_widget(
        Paragraph::new(format!(" {}", text)).style(Style::default().fg(*color)),
        status_area,
      );
    }

    self.picker.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    self.list.breadcrumb_label()
  }

  fn captures_input(&self) -> bool {
    self.picker.is_active() || self.list.captures_input()
  }

  fn tick(&mut self) {
    self.list.tick();
    self.poll_update();
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    let mut shortcuts = self.list.shortcuts();
    shortcuts.push(ShortcutInfo::new("a", "set status").with_priority(40));
    shortcuts
  }
}
