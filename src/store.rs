//! Shared token store contract and the built-in in-memory implementation.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::token::CsrfToken;

/// Process-wide cell holding the last known CSRF token.
///
/// Implementations are plain accessors: they never fail and never block across `.await`
/// points. Readers must never observe a partially written value.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the current shared value, if any.
	fn read(&self) -> Option<CsrfToken>;

	/// Overwrites the shared value; every later [`read`](TokenStore::read) observes it.
	fn write(&self, token: CsrfToken);

	/// Resets the shared value to unset, starting a new acquisition cycle.
	fn invalidate(&self);
}
