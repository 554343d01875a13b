//! Crate-level error types shared by the coordinator, fetchers, and consumers.

// self
use crate::{_prelude::*, config::EndpointError};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The fetch started by this caller failed; retrying is the caller's decision.
	#[error("CSRF token acquisition failed.")]
	FetchFailed(
		#[from]
		#[source]
		FetchError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The store was invalidated between acquisition and use.
	#[error("CSRF token was invalidated before it could be used.")]
	TokenUnavailable,
}

/// Failures surfaced by a [`TokenFetcher`](crate::fetch::TokenFetcher).
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token route.")]
	Transport {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token route answered with a non-success status.
	#[error("Token route responded with HTTP status {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
	},
	/// Token route responded with malformed JSON.
	#[error("Token route returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Fetch settled but produced an empty token.
	#[error("Token route returned an empty token.")]
	EmptyToken,
	/// Custom fetcher rejected the request.
	#[error("Token fetcher rejected the request: {message}.")]
	Rejected {
		/// Fetcher-supplied reason string.
		message: String,
	},
}
impl FetchError {
	/// Wraps a transport-specific network error.
	pub fn transport(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Transport { source: Box::new(src) }
	}

	/// Builds a [`FetchError::Rejected`] from any message.
	pub fn rejected(message: impl Into<String>) -> Self {
		Self::Rejected { message: message.into() }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for FetchError {
	fn from(e: ReqwestError) -> Self {
		Self::transport(e)
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Endpoint configuration failed validation.
	#[error(transparent)]
	Endpoint(#[from] EndpointError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
