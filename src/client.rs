//! Application-facing handle bundling the shared coordinator, a fetcher, and the endpoint
//! configuration.
//!
//! Create one [`CsrfClient`] at startup and clone it into every consumer; clones share the same
//! store, in-flight slot, and counters.

// self
use crate::{
	_prelude::*,
	config::CsrfEndpoint,
	consumer::FormSubmission,
	coordinator::{CoordinatorMetrics, TokenCoordinator},
	fetch::TokenFetcher,
	store::TokenStore,
	token::{self, CsrfToken},
};
#[cfg(feature = "reqwest")] use crate::{error::ConfigError, http::ReqwestFetcher};

/// Shared CSRF handle injected into consumers.
#[derive(Clone)]
pub struct CsrfClient {
	/// Single-flight coordinator guarding the shared store.
	pub coordinator: TokenCoordinator,
	/// Fetcher invoked when the store holds no valid token.
	pub fetcher: Arc<dyn TokenFetcher>,
	/// Token route and the names the server expects tokens under.
	pub endpoint: CsrfEndpoint,
}
impl CsrfClient {
	/// Creates a client that reuses the caller-provided fetcher.
	pub fn with_fetcher(
		store: Arc<dyn TokenStore>,
		endpoint: CsrfEndpoint,
		fetcher: Arc<dyn TokenFetcher>,
	) -> Self {
		Self { coordinator: TokenCoordinator::new(store), fetcher, endpoint }
	}

	/// Ensures the shared store holds a valid token.
	pub async fn ensure_token(&self) -> Result<()> {
		self.coordinator.ensure_token(self.fetcher.as_ref()).await
	}

	/// Ensures a valid token, then re-reads it from the store.
	///
	/// Fails with [`Error::TokenUnavailable`] when the store was invalidated in between.
	pub async fn token(&self) -> Result<CsrfToken> {
		self.ensure_token().await?;

		self.coordinator
			.read()
			.filter(|current| token::is_valid(Some(current)))
			.ok_or(Error::TokenUnavailable)
	}

	/// Returns the stored token without touching the network.
	pub fn current(&self) -> Option<CsrfToken> {
		self.coordinator.read()
	}

	/// Adopts a server-rendered token; see [`TokenCoordinator::observe`].
	pub fn observe(&self, candidate: &CsrfToken) -> bool {
		self.coordinator.observe(candidate)
	}

	/// Drops the shared token so the next acquisition fetches again.
	pub fn invalidate(&self) {
		self.coordinator.invalidate();
	}

	/// Returns the acquisition counters.
	pub fn metrics(&self) -> &CoordinatorMetrics {
		self.coordinator.metrics()
	}

	/// Starts a form submission targeting `action` with this client's field names.
	pub fn form(&self, action: Url) -> FormSubmission {
		FormSubmission::new(action, &self.endpoint)
	}
}
#[cfg(feature = "reqwest")]
impl CsrfClient {
	/// Creates a client that fetches tokens from `endpoint` with its own reqwest client.
	///
	/// Use [`ReqwestFetcher::http_client`] on the returned fetcher to submit forms through the
	/// same cookie jar.
	pub fn new(
		store: Arc<dyn TokenStore>,
		endpoint: CsrfEndpoint,
	) -> Result<(Self, ReqwestFetcher)> {
		endpoint.validate().map_err(ConfigError::from)?;

		let fetcher = ReqwestFetcher::new(endpoint.clone())?;
		let client = Self::with_fetcher(store, endpoint, Arc::new(fetcher.clone()));

		Ok((client, fetcher))
	}
}
impl Debug for CsrfClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CsrfClient")
			.field("coordinator", &self.coordinator)
			.field("endpoint", &self.endpoint)
			.finish()
	}
}
