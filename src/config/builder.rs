// self
use crate::{_prelude::*, config::CsrfEndpoint};

/// Errors raised while constructing or validating endpoints.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum EndpointError {
	/// Token route is mandatory.
	#[error("Missing token route.")]
	MissingRoute,
	/// Token route must use HTTPS unless plain HTTP is explicitly allowed.
	#[error("The token route must use HTTPS: {url}.")]
	InsecureRoute {
		/// Route URL that failed validation.
		url: String,
	},
	/// Token route uses a scheme other than HTTP(S).
	#[error("The token route uses an unsupported scheme: {scheme}.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Header or field names must be non-empty HTTP tokens.
	#[error("The {kind} name `{name}` is not a valid HTTP token.")]
	InvalidName {
		/// Which name failed validation.
		kind: &'static str,
		/// Name that failed validation.
		name: String,
	},
}

/// Builder for [`CsrfEndpoint`] values.
#[derive(Debug)]
pub struct CsrfEndpointBuilder {
	/// Token route.
	pub route: Option<Url>,
	/// Request header name.
	pub header_name: String,
	/// Form field name.
	pub field_name: String,
	/// Inline-omission form field name.
	pub omit_field_name: String,
	/// Optional transport timeout.
	pub request_timeout: Option<Duration>,
	/// Plain HTTP toggle.
	pub allow_http: bool,
}
impl CsrfEndpointBuilder {
	/// Creates a builder seeded with the default names.
	pub fn new() -> Self {
		Self {
			route: None,
			header_name: CsrfEndpoint::DEFAULT_HEADER_NAME.into(),
			field_name: CsrfEndpoint::DEFAULT_FIELD_NAME.into(),
			omit_field_name: CsrfEndpoint::DEFAULT_OMIT_FIELD_NAME.into(),
			request_timeout: None,
			allow_http: false,
		}
	}

	/// Sets the token route.
	pub fn route(mut self, url: Url) -> Self {
		self.route = Some(url);

		self
	}

	/// Overrides the request header name.
	pub fn header_name(mut self, name: impl Into<String>) -> Self {
		self.header_name = name.into();

		self
	}

	/// Overrides the form field name.
	pub fn field_name(mut self, name: impl Into<String>) -> Self {
		self.field_name = name.into();

		self
	}

	/// Overrides the inline-omission form field name.
	pub fn omit_field_name(mut self, name: impl Into<String>) -> Self {
		self.omit_field_name = name.into();

		self
	}

	/// Sets a per-request transport timeout.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = Some(timeout);

		self
	}

	/// Allows or rejects plain HTTP routes.
	pub fn allow_http(mut self, allow: bool) -> Self {
		self.allow_http = allow;

		self
	}

	/// Consumes the builder and validates the resulting endpoint.
	pub fn build(self) -> Result<CsrfEndpoint, EndpointError> {
		let route = self.route.ok_or(EndpointError::MissingRoute)?;
		let endpoint = CsrfEndpoint {
			route,
			header_name: self.header_name,
			field_name: self.field_name,
			omit_field_name: self.omit_field_name,
			request_timeout: self.request_timeout,
			allow_http: self.allow_http,
		};

		endpoint.validate()?;

		Ok(endpoint)
	}
}
impl Default for CsrfEndpointBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl CsrfEndpoint {
	/// Validates invariants for the endpoint.
	pub fn validate(&self) -> Result<(), EndpointError> {
		validate_route(&self.route, self.allow_http)?;
		validate_name("header", &self.header_name)?;
		validate_name("field", &self.field_name)?;
		validate_name("omit field", &self.omit_field_name)?;

		Ok(())
	}
}

fn validate_route(url: &Url, allow_http: bool) -> Result<(), EndpointError> {
	match url.scheme() {
		"https" => Ok(()),
		"http" if allow_http => Ok(()),
		"http" => Err(EndpointError::InsecureRoute { url: url.to_string() }),
		scheme => Err(EndpointError::UnsupportedScheme { scheme: scheme.into() }),
	}
}

fn validate_name(kind: &'static str, name: &str) -> Result<(), EndpointError> {
	if !name.is_empty() && name.bytes().all(is_token_byte) {
		Ok(())
	} else {
		Err(EndpointError::InvalidName { kind, name: name.into() })
	}
}

// RFC 9110 `tchar`.
fn is_token_byte(b: u8) -> bool {
	b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
