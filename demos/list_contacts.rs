//! Lists every contact on a list against a local mock of Listrak using the default reqwest
//! transport.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use listrak::{
	ListrakClient,
	api::ContactQuery,
	auth::{Credentials, SystemClock},
	config::ClientConfig,
	http::ReqwestHttpClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/OAuth2/Token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let contacts_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/email/v1/List/7/Contact");
			then.status(200).header("content-type", "application/json").body(
				"{\"status\":200,\"data\":[{\"emailAddress\":\"ada@example.com\"},\
				 {\"emailAddress\":\"grace@example.com\"}],\"nextPageCursor\":null}",
			);
		})
		.await;
	let config = ClientConfig::builder()
		.token_endpoint(server.url("/OAuth2/Token"))
		.api_base(server.base_url())
		.allow_insecure_endpoints(true)
		.build()?;
	let client = ListrakClient::with_http_client(
		config,
		Credentials::new("demo-client", "super-secret"),
		ReqwestHttpClient::without_redirects()?,
		Arc::new(SystemClock),
	)
	.await?;
	let contacts = client.contacts().get_all_contacts(7, &ContactQuery::default()).await?;

	for contact in &contacts {
		println!("Contact: {}.", contact.email_address.as_deref().unwrap_or("<unknown>"));
	}

	token_mock.assert_async().await;
	contacts_mock.assert_async().await;

	Ok(())
}
