//! Form submission adapter.
//!
//! A form may already carry a token rendered by the server; that value is adopted into the shared
//! store so other consumers reuse it. Otherwise the token is acquired before submission and
//! written into the configured field.

// crates.io
use url::form_urlencoded::Serializer;
// self
use crate::{_prelude::*, client::CsrfClient, config::CsrfEndpoint, token::CsrfToken};

/// Form awaiting a CSRF token.
#[derive(Clone)]
pub struct FormSubmission {
	action: Url,
	fields: Vec<(String, String)>,
	token_field: String,
	omit_field: String,
}
impl FormSubmission {
	/// Creates an empty form posting to `action` using the endpoint's field names.
	pub fn new(action: Url, endpoint: &CsrfEndpoint) -> Self {
		Self {
			action,
			fields: Vec::new(),
			token_field: endpoint.field_name.clone(),
			omit_field: endpoint.omit_field_name.clone(),
		}
	}

	/// Appends a form field.
	pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.push((name.into(), value.into()));

		self
	}

	/// Sets the token field to a value rendered into the page by the server.
	pub fn rendered_token(mut self, token: impl Into<CsrfToken>) -> Self {
		let token = token.into();

		set_field(&mut self.fields, &self.token_field, token.expose());

		self
	}

	/// Returns the token field's current value, if any.
	pub fn token_value(&self) -> Option<&str> {
		self.fields
			.iter()
			.find(|(name, _)| name == &self.token_field)
			.map(|(_, value)| value.as_str())
	}

	/// Returns `true` when the token field holds a non-empty value.
	pub fn has_valid_token(&self) -> bool {
		self.token_value().is_some_and(|value| !value.is_empty())
	}

	/// Shares a server-rendered token with every other consumer; returns whether it was adopted.
	pub fn adopt_rendered_token(&self, client: &CsrfClient) -> bool {
		match self.token_value() {
			Some(value) => client.observe(&CsrfToken::new(value)),
			None => false,
		}
	}

	/// Acquires a token and fills the token and inline-omission fields.
	pub async fn prepare(mut self, client: &CsrfClient) -> Result<PreparedForm> {
		self.adopt_rendered_token(client);

		let token = client.token().await?;

		set_field(&mut self.fields, &self.token_field, token.expose());
		set_field(&mut self.fields, &self.omit_field, "true");

		Ok(PreparedForm { action: self.action, fields: self.fields })
	}
}
impl Debug for FormSubmission {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FormSubmission")
			.field("action", &self.action.as_str())
			.field("fields", &field_names(&self.fields))
			.field("has_valid_token", &self.has_valid_token())
			.finish()
	}
}

/// Form whose token field has been filled and which is ready to submit.
#[derive(Clone)]
pub struct PreparedForm {
	action: Url,
	fields: Vec<(String, String)>,
}
impl PreparedForm {
	/// Returns the submission target.
	pub fn action(&self) -> &Url {
		&self.action
	}

	/// Returns the ordered form fields, including the token.
	pub fn fields(&self) -> &[(String, String)] {
		&self.fields
	}

	/// Encodes the fields as `application/x-www-form-urlencoded`.
	pub fn encode(&self) -> String {
		let mut serializer = Serializer::new(String::new());

		serializer.extend_pairs(self.fields.iter());

		serializer.finish()
	}

	/// Builds a POST request through `http`, which should share the token route's cookie jar.
	#[cfg(feature = "reqwest")]
	pub fn into_request(self, http: &ReqwestClient) -> reqwest::RequestBuilder {
		let body = self.encode();

		http.post(self.action)
			.header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
			.body(body)
	}
}
impl Debug for PreparedForm {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PreparedForm")
			.field("action", &self.action.as_str())
			.field("fields", &field_names(&self.fields))
			.finish()
	}
}

fn set_field(fields: &mut Vec<(String, String)>, name: &str, value: &str) {
	match fields.iter_mut().find(|(existing, _)| existing == name) {
		Some((_, slot)) => *slot = value.to_owned(),
		None => fields.push((name.to_owned(), value.to_owned())),
	}
}

fn field_names(fields: &[(String, String)]) -> Vec<&str> {
	fields.iter().map(|(name, _)| name.as_str()).collect()
}
