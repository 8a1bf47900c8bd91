#![cfg(feature = "reqwest")]

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use listrak::{
	TokenManager,
	auth::{Credentials, SystemClock},
	error::{AuthError, Error},
	http::ReqwestHttpClient,
	url::Url,
};

async fn token_manager(server: &MockServer) -> listrak::Result<TokenManager<ReqwestHttpClient>> {
	TokenManager::with_http_client(
		Credentials::new("client-id", "client-secret"),
		Url::parse(&server.url("/OAuth2/Token")).expect("Mock token endpoint should parse."),
		ReqwestHttpClient::without_redirects().expect("Reqwest client should build."),
		Arc::new(SystemClock),
	)
	.await
}

#[tokio::test]
async fn posts_form_encoded_client_credentials() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/OAuth2/Token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"T1\",\"token_type\":\"Bearer\",\"expires_in\":3600}",
			);
		})
		.await;
	let manager = token_manager(&server).await.expect("Initial token fetch should succeed.");
	let token = manager.get_token().await.expect("Fresh token should be returned.");

	assert_eq!(token.expose(), "T1");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn rejected_credentials_report_status_and_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/OAuth2/Token");
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"invalid_client\",\"error_description\":\"Unknown client.\"}");
		})
		.await;
	let err = token_manager(&server).await.expect_err("Rejected credentials should fail.");

	match err {
		Error::Auth(AuthError::Rejected { status, body }) => {
			assert_eq!(status, Some(401));
			assert!(body.contains("Unknown client."));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	mock.assert_async().await;
}

#[tokio::test]
async fn non_oauth_error_bodies_are_still_rejections() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/OAuth2/Token");
			then.status(503).header("content-type", "text/plain").body("Service unavailable");
		})
		.await;

	let err = token_manager(&server).await.expect_err("Unavailable endpoint should fail.");

	assert!(matches!(err, Error::Auth(_)));
	assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn token_without_access_token_is_malformed() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/OAuth2/Token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await;

	let err = token_manager(&server).await.expect_err("Malformed token bodies should fail.");

	match err {
		Error::Auth(AuthError::MalformedResponse { status, .. }) => assert_eq!(status, Some(200)),
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn created_reply_without_token_type_is_accepted() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/OAuth2/Token");
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"T1\",\"expires_in\":3600}");
		})
		.await;

	let manager = token_manager(&server).await.expect("A 201 token reply should be accepted.");
	let token = manager.get_token().await.expect("Fresh token should be returned.");

	assert_eq!(token.expose(), "T1");
}
