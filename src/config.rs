//! Token route configuration shared by fetchers and consumers.
//!
//! [`CsrfEndpoint`] is `serde`-friendly so it can live inside an application's own config file;
//! values loaded that way should go through [`CsrfEndpoint::validate`] before use.

/// Builder API for assembling endpoints.
pub mod builder;

pub use builder::*;

// self
use crate::_prelude::*;

/// Validated description of where tokens come from and how the server expects them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrfEndpoint {
	/// Route returning a [`TokenIssue`](crate::token::TokenIssue) JSON body.
	pub route: Url,
	/// Request header carrying the token on non-form requests.
	pub header_name: String,
	/// Form field carrying the token on form submissions.
	pub field_name: String,
	/// Form field telling the server it may omit inline tokens from rendered HTML.
	pub omit_field_name: String,
	/// Optional per-request transport timeout applied by HTTP fetchers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub request_timeout: Option<Duration>,
	/// Permits plain HTTP routes (local development).
	#[serde(default)]
	pub allow_http: bool,
}
impl CsrfEndpoint {
	/// Default header name used by the server's CSRF middleware.
	pub const DEFAULT_HEADER_NAME: &'static str = "X-CSRF-Token";
	/// Default form field name used by the server's CSRF middleware.
	pub const DEFAULT_FIELD_NAME: &'static str = "gorilla.csrf.Token";
	/// Default name of the inline-omission form field.
	pub const DEFAULT_OMIT_FIELD_NAME: &'static str = "omit-csrf-token";

	/// Creates a new builder with the default header and field names.
	pub fn builder() -> CsrfEndpointBuilder {
		CsrfEndpointBuilder::new()
	}
}
