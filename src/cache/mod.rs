//! Client-side state containers for the three remote data sources.
//!
//! Each cache owns at most one in-flight request and is driven by polling
//! from the event loop. Caches never decide which source is authoritative;
//! the coordinator does that and tells each cache, at poll time, whether a
//! finished response still belongs to the active mode.

mod employees;
mod in_flight;
mod paginated;
mod scoped;

pub use employees::EmployeeDirectoryCache;
pub use in_flight::InFlight;
pub use paginated::PaginatedFeedCache;
pub use scoped::ScopedFeedCache;

use crate::api::transport::TransportError;

/// What happened to a request that finished since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
  /// The response was stored
  Applied,
  /// The response no longer matched the active mode and was dropped
  Discarded,
  /// The transport failed; cached data is unchanged
  Failed(TransportError),
}

#[cfg(test)]
pub(crate) async fn settle<F>(mut poll: F) -> Settled
where
  F: FnMut() -> Option<Settled>,
{
  for _ in 0..500 {
    if let Some(settled) = poll() {
      return settled;
    }
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
  }
  panic!("request never settled");
}
