//! Streaming channel subscription adapter.
//!
//! Channels that require CSRF protection carry the token inside their subscription identifier.
//! The identifier is serialized as camelCase JSON and sent inside a `subscribe` command.

// self
use crate::{_prelude::*, client::CsrfClient, token::CsrfToken};

/// Channel subscription awaiting its identifier.
#[derive(Clone, Debug)]
pub struct ChannelSubscription {
	channel: String,
	name: String,
	integrity: Option<String>,
	requires_csrf: bool,
	rendered_token: Option<CsrfToken>,
}
impl ChannelSubscription {
	/// Creates a subscription for `channel`/`name` that does not carry a token.
	pub fn new(channel: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			channel: channel.into(),
			name: name.into(),
			integrity: None,
			requires_csrf: false,
			rendered_token: None,
		}
	}

	/// Sets the integrity value signed by the server for this stream.
	pub fn integrity(mut self, integrity: impl Into<String>) -> Self {
		self.integrity = Some(integrity.into());

		self
	}

	/// Requires a CSRF token in the identifier.
	pub fn require_csrf(mut self) -> Self {
		self.requires_csrf = true;

		self
	}

	/// Supplies a token rendered alongside the stream by the server; implies [`require_csrf`].
	///
	/// [`require_csrf`]: ChannelSubscription::require_csrf
	pub fn rendered_token(mut self, token: impl Into<CsrfToken>) -> Self {
		self.requires_csrf = true;
		self.rendered_token = Some(token.into());

		self
	}

	/// Builds the identifier, acquiring a token first when the channel requires one.
	pub async fn prepare(self, client: &CsrfClient) -> Result<ChannelIdentifier> {
		let csrf_token = if self.requires_csrf {
			if let Some(rendered) = self.rendered_token.as_ref() {
				client.observe(rendered);
			}

			Some(client.token().await?)
		} else {
			None
		};

		Ok(ChannelIdentifier {
			channel: self.channel,
			name: self.name,
			integrity: self.integrity,
			csrf_token,
		})
	}
}

/// Subscription identifier sent to the streaming server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIdentifier {
	/// Channel class name.
	pub channel: String,
	/// Stream name within the channel.
	pub name: String,
	/// Server-signed integrity value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub integrity: Option<String>,
	/// CSRF token, for channels that require one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub csrf_token: Option<CsrfToken>,
}
impl ChannelIdentifier {
	/// Serializes the identifier as JSON.
	pub fn to_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string(self)
	}

	/// Wraps the identifier in a `subscribe` command.
	pub fn subscribe_command(&self) -> Result<SubscribeCommand, serde_json::Error> {
		Ok(SubscribeCommand { command: "subscribe".into(), identifier: self.to_json()? })
	}
}

/// Command frame carrying a JSON-encoded identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeCommand {
	/// Command verb.
	pub command: String,
	/// JSON-encoded [`ChannelIdentifier`].
	pub identifier: String,
}
