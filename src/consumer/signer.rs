//! Request signing contracts that attach the shared token to outgoing requests.

// self
use crate::{_prelude::*, client::CsrfClient, config::CsrfEndpoint, token::CsrfToken};

/// Describes how to attach a [`CsrfToken`] to an outbound request without constraining the
/// HTTP client type.
pub trait TokenSigner<Request>
where
	Self: Send + Sync,
{
	/// Consumes the request and returns it carrying `token`.
	fn attach_token(&self, request: Request, token: &CsrfToken) -> Request;
}

/// Attaches tokens under the endpoint's request header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderSigner {
	header_name: String,
}
impl HeaderSigner {
	/// Creates a signer using [`CsrfEndpoint::header_name`].
	pub fn new(endpoint: &CsrfEndpoint) -> Self {
		Self { header_name: endpoint.header_name.clone() }
	}

	/// Returns the header the token is attached under.
	pub fn header_name(&self) -> &str {
		&self.header_name
	}

	/// Acquires the shared token and attaches it to `request`.
	pub async fn sign<Request>(&self, client: &CsrfClient, request: Request) -> Result<Request>
	where
		Self: TokenSigner<Request>,
	{
		let token = client.token().await?;

		Ok(self.attach_token(request, &token))
	}
}
impl TokenSigner<BTreeMap<String, String>> for HeaderSigner {
	fn attach_token(
		&self,
		mut headers: BTreeMap<String, String>,
		token: &CsrfToken,
	) -> BTreeMap<String, String> {
		headers.insert(self.header_name.clone(), token.expose().to_owned());

		headers
	}
}
#[cfg(feature = "reqwest")]
impl TokenSigner<reqwest::RequestBuilder> for HeaderSigner {
	fn attach_token(
		&self,
		request: reqwest::RequestBuilder,
		token: &CsrfToken,
	) -> reqwest::RequestBuilder {
		// Invalid header bytes surface when the request is sent.
		request.header(self.header_name.as_str(), token.expose())
	}
}
