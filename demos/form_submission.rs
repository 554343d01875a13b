//! Demonstrates a form submission and a channel subscription sharing one CSRF token fetched
//! from a mock token route.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use csrf_singleflight::{
	client::CsrfClient,
	config::CsrfEndpoint,
	consumer::ChannelSubscription,
	store::{MemoryStore, TokenStore},
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/csrf");
			then.status(200)
				.header("content-type", "application/json")
				.header("set-cookie", "_gorilla_csrf=demo-cookie; Path=/")
				.body(
					"{\"headerName\":\"X-CSRF-Token\",\"fieldName\":\"gorilla.csrf.Token\",\"token\":\"demo-token\"}",
				);
		})
		.await;
	let session_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/sessions")
				.header("cookie", "_gorilla_csrf=demo-cookie")
				.body_includes("gorilla.csrf.Token=demo-token");
			then.status(200);
		})
		.await;
	let store: Arc<dyn TokenStore> = Arc::new(MemoryStore::default());
	let endpoint = CsrfEndpoint::builder()
		.route(Url::parse(&server.url("/csrf"))?)
		.allow_http(true)
		.build()?;
	let (client, fetcher) = CsrfClient::new(store, endpoint)?;
	let action = Url::parse(&server.url("/sessions"))?;
	let (form, identifier) = tokio::join!(
		client.form(action).field("email", "demo@example.com").prepare(&client),
		ChannelSubscription::new("VideoChannel", "camera-1").require_csrf().prepare(&client),
	);
	let form = form?;
	let command = identifier?.subscribe_command()?;

	println!("Form body: {}.", form.encode());
	println!("Subscribe command identifier: {}.", command.identifier);
	println!("Token route calls: {}.", client.metrics().fetches());

	let response = form.into_request(fetcher.http_client()).send().await?.error_for_status()?;

	println!("Form submission status: {}.", response.status());

	token_mock.assert_async().await;
	session_mock.assert_async().await;

	Ok(())
}
