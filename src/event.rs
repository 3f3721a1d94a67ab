use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Terminal resized; redraw
  Resize,
  /// Periodic tick for polling in-flight requests
  Tick,
}

/// Event handler that produces events from terminal input and a tick timer
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // crossterm's poll/read block, so they get a thread of their own
    tokio::task::spawn_blocking(move || {
      let mut last_tick = Instant::now();
      loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).unwrap_or(false) {
          let event = match event::read() {
            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            Ok(CrosstermEvent::Resize(_, _)) => Some(Event::Resize),
            _ => None,
          };
          if let Some(event) = event {
            if tx.send(event).is_err() {
              break;
            }
          }
        }

        if last_tick.elapsed() >= tick_rate {
          if tx.send(Event::Tick).is_err() {
            break;
          }
          last_tick = Instant::now();
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
