//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{_prelude::*, store::TokenStore, token::CsrfToken};

type TokenCell = Arc<RwLock<Option<CsrfToken>>>;

/// Shared token cell; clones observe and mutate the same value.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(TokenCell);
impl MemoryStore {
	/// Creates a store that already holds `token`, e.g. one rendered into the page by the server.
	pub fn seeded(token: impl Into<CsrfToken>) -> Self {
		let store = Self::default();

		store.write(token.into());

		store
	}
}
impl TokenStore for MemoryStore {
	fn read(&self) -> Option<CsrfToken> {
		self.0.read().clone()
	}

	fn write(&self, token: CsrfToken) {
		// Empty tokens are indistinguishable from unset ones.
		*self.0.write() = if token.is_empty() { None } else { Some(token) };
	}

	fn invalidate(&self) {
		self.0.write().take();
	}
}
