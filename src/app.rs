use crate::api::client::HttpTransport;
use crate::api::fixture::FixtureTransport;
use crate::api::transport::Transport;
use crate::config::Config;
use crate::coordinator::ViewCoordinator;
use crate::event::{Event, EventHandler};
use crate::ui;
use crate::ui::renderfns::extract_domain;
use crate::ui::view::Intent;
use crate::ui::views::TransactionsView;
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

/// Main application state
pub struct App {
  /// Owner of all remote data
  coordinator: ViewCoordinator,

  /// The transaction list screen
  view: TransactionsView,

  /// Header title
  title: String,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  /// Build the app on top of the HTTP transport, or the bundled fixtures
  /// when `demo` is set
  pub fn new(config: Config, demo: bool) -> Result<Self> {
    let (transport, default_title): (Arc<dyn Transport>, String) = if demo {
      tracing::info!(page_size = config.demo.page_size, "using demo transport");
      (
        Arc::new(FixtureTransport::bundled(&config.demo)?),
        "demo".to_string(),
      )
    } else {
      let transport = HttpTransport::new(&config.api)?;
      let host = config
        .api
        .url
        .as_deref()
        .map(extract_domain)
        .unwrap_or_default()
        .to_string();
      tracing::info!(%host, "using http transport");
      (Arc::new(transport), host)
    };

    Ok(Self::with_transport(
      transport,
      config.title.clone().unwrap_or(default_title),
      &config,
    ))
  }

  pub fn with_transport(transport: Arc<dyn Transport>, title: String, config: &Config) -> Self {
    Self {
      coordinator: ViewCoordinator::new(transport, config.rows.clone()),
      view: TransactionsView::new(),
      title,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = self.main_loop().await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(&mut self) -> Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let mut events = EventHandler::new(Duration::from_millis(100));

    // Initial data load
    self.coordinator.start();

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        if self.coordinator.tick() {
          self.view.sync(&self.coordinator);
        }
      }
      Event::Resize => {} // Redraw happens on the next loop iteration
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let intent = self.view.handle_key(key);
    self.apply(intent);
  }

  fn apply(&mut self, intent: Intent) {
    match intent {
      Intent::None => {}
      Intent::SelectEmployee(id) => self.coordinator.select_employee(id.as_deref()),
      Intent::RequestMore => {
        self.coordinator.request_more();
      }
      Intent::ToggleApproval(index) => {
        self.coordinator.toggle_approval(index);
      }
      Intent::Retry => self.coordinator.retry(),
      Intent::Quit => self.should_quit = true,
    }
  }

  // Accessors for UI rendering
  pub fn coordinator(&self) -> &ViewCoordinator {
    &self.coordinator
  }

  pub fn view(&self) -> &TransactionsView {
    &self.view
  }

  pub fn view_and_coordinator(&mut self) -> (&mut TransactionsView, &ViewCoordinator) {
    (&mut self.view, &self.coordinator)
  }

  pub fn title(&self) -> &str {
    &self.title
  }
}
