//! Reqwest-backed fetcher for the HTTP token route.
//!
//! The server issues tokens under the double-submit cookie pattern, so the reqwest client used
//! here must keep its cookie store and should be the same client that later submits forms.
//! [`ReqwestFetcher::new`] builds such a client; [`ReqwestFetcher::with_client`] accepts a
//! caller-configured one.

// crates.io
use reqwest::header::{ACCEPT, HeaderValue};
// self
use crate::{
	_prelude::*,
	config::CsrfEndpoint,
	error::{ConfigError, FetchError},
	fetch::{FetchFuture, TokenFetcher},
	token::TokenIssue,
};

/// Fetches tokens from [`CsrfEndpoint::route`] with a GET request.
#[derive(Clone, Debug)]
pub struct ReqwestFetcher {
	client: ReqwestClient,
	endpoint: CsrfEndpoint,
}
impl ReqwestFetcher {
	/// Builds a fetcher with its own cookie-keeping reqwest client.
	pub fn new(endpoint: CsrfEndpoint) -> Result<Self> {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.build()
			.map_err(ConfigError::from)?;

		Ok(Self::with_client(endpoint, client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(endpoint: CsrfEndpoint, client: ReqwestClient) -> Self {
		Self { client, endpoint }
	}

	/// Returns the reqwest client so form submissions share the token's cookie jar.
	pub fn http_client(&self) -> &ReqwestClient {
		&self.client
	}

	/// Returns the endpoint this fetcher talks to.
	pub fn endpoint(&self) -> &CsrfEndpoint {
		&self.endpoint
	}

	/// Calls the token route and returns the full response body.
	pub async fn fetch_issue(&self) -> Result<TokenIssue, FetchError> {
		let mut request = self
			.client
			.get(self.endpoint.route.clone())
			.header(ACCEPT, HeaderValue::from_static("application/json"));

		if let Some(timeout) = self.endpoint.request_timeout {
			request = request.timeout(timeout);
		}

		let response = request.send().await?;
		let status = response.status();

		if !status.is_success() {
			return Err(FetchError::Status { status: status.as_u16() });
		}

		let body = response.bytes().await?;

		parse_issue(&body)
	}
}
impl TokenFetcher for ReqwestFetcher {
	fn fetch(&self) -> FetchFuture<'_> {
		Box::pin(async move { self.fetch_issue().await.map(|issue| issue.token) })
	}
}

fn parse_issue(body: &[u8]) -> Result<TokenIssue, FetchError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| FetchError::Parse { source })
}
