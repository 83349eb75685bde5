use crate::api::{BackofficeClient, CachedBackofficeClient, FileTokenStore};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::{
  offers_view, payments_view, plans_view, professionals_view, users_view, wallet_history_view,
  CompanyListView, StatisticsView, WalletRequestsView,
};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_TITLE: &str = "backoffice";

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,
  command: CommandInput,
  client: CachedBackofficeClient,
  config: Config,
  /// One-line feedback in the footer, cleared on the next key
  message: Option<String>,
  should_quit: bool,
}

impl App {
  pub fn new(config: Config) -> Result<Self> {
    let tokens = Arc::new(FileTokenStore::open()?);
    let inner = BackofficeClient::new(&config.api, tokens)?;
    let client = CachedBackofficeClient::new(inner, config.cache.freshness());

    let root: Box<dyn View> = Box::new(CompanyListView::new(client.clone()));

    Ok(Self {
      view_stack: vec![root],
      command: CommandInput::new(),
      client,
      config,
      message: None,
      should_quit: false,
    })
  }

  pub fn title(&self) -> &str {
    self.config.title.as_deref().unwrap_or(DEFAULT_TITLE)
  }

  pub fn host(&self) -> &str {
    self.client.host()
  }

  pub fn message(&self) -> Option<&str> {
    self.message.as_deref()
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect()
  }

  pub async fn run(&mut self) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(Event::Key(key)) => self.handle_key(key),
        Some(Event::Tick) => {
          if let Some(view) = self.view_stack.last_mut() {
            view.tick();
          }
        }
        Some(Event::Resize) => {}
        None => break,
      }
    }

    info!("exiting");
    Ok(())
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    self.message = None;

    // The palette only opens when the view is not taking text input
    let view_captures = self
      .view_stack
      .last()
      .is_some_and(|view| view.captures_input());
    if self.command.is_active() || !view_captures {
      match self.command.handle_key(key) {
        KeyResult::Event(CommandEvent::Submitted(cmd)) => {
          self.execute_command(&cmd);
          return;
        }
        result if result.is_consumed() => return,
        _ => {}
      }
    }

    let Some(view) = self.view_stack.last_mut() else {
      return;
    };
    match view.handle_key(key) {
      ViewAction::None => {}
      ViewAction::Push(next) => {
        debug!(view = %next.breadcrumb_label(), "push view");
        self.view_stack.push(next);
      }
      ViewAction::Pop => {
        // The root view stays
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        }
      }
    }
  }

  /// Build the root view for a command name, if it names one.
  fn root_view(&self, name: &str) -> Option<Box<dyn View>> {
    let client = &self.client;
    let view: Box<dyn View> = match name {
      "companies" => Box::new(CompanyListView::new(client.clone())),
      "users" => Box::new(users_view(client)),
      "professionals" => Box::new(professionals_view(client)),
      "offers" => Box::new(offers_view(client)),
      "plans" => Box::new(plans_view(client)),
      "payments" => Box::new(payments_view(client)),
      "wallet" => Box::new(WalletRequestsView::new(client.clone())),
      "history" => Box::new(wallet_history_view(client)),
      "stats" => Box::new(StatisticsView::new(client.clone())),
      _ => return None,
    };
    Some(view)
  }

  fn execute_command(&mut self, cmd: &str) {
    if cmd == "quit" {
      self.should_quit = true;
      return;
    }

    match self.root_view(cmd) {
      Some(view) => {
        info!(command = cmd, "switch root view");
        self.view_stack.clear();
        self.view_stack.push(view);
      }
      None => {
        self.message = Some(format!("Unknown command: {}", cmd));
      }
    }
  }
}
