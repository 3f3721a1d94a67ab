//! Handle for one outstanding transport request.
//!
//! The request runs on its own tokio task and reports back over a channel,
//! so the owner never blocks: it polls from the event loop tick. Dropping
//! the handle drops the receiver, and whatever the task eventually sends
//! goes nowhere. That is how superseded requests are discarded.

use crate::api::transport::TransportError;
use std::future::Future;
use tokio::sync::mpsc;

pub struct InFlight<K, T> {
  key: K,
  receiver: mpsc::UnboundedReceiver<Result<T, TransportError>>,
}

impl<K, T: Send + 'static> InFlight<K, T> {
  /// Spawn `future` and tag it with `key`, the request parameters it was
  /// dispatched with.
  pub fn spawn<F>(key: K, future: F) -> Self
  where
    F: Future<Output = Result<T, TransportError>> + Send + 'static,
  {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
      // Ignore send errors - the handle may have been dropped
      let _ = tx.send(future.await);
    });

    Self { key, receiver: rx }
  }

  pub fn key(&self) -> &K {
    &self.key
  }

  /// Check for the outcome without blocking.
  pub fn poll(&mut self) -> Option<Result<T, TransportError>> {
    match self.receiver.try_recv() {
      Ok(result) => Some(result),
      Err(mpsc::error::TryRecvError::Empty) => None,
      // Task ended without sending (panicked or runtime shutting down)
      Err(mpsc::error::TryRecvError::Disconnected) => Some(Err(TransportError::Cancelled)),
    }
  }
}

impl<K: std::fmt::Debug, T> std::fmt::Debug for InFlight<K, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("InFlight")
      .field("key", &self.key)
      .finish_non_exhaustive()
  }
}
