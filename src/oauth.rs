//! Client-credentials exchange built on the `oauth2` crate.

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError,
	RequestTokenError, TokenResponse, TokenUrl,
	basic::{BasicClient, BasicErrorResponse, BasicRequestTokenError},
};
// self
use crate::{
	_prelude::*,
	auth::{Clock, Credentials, TokenState},
	error::{AuthError, ConfigError, JsonPathError},
	http::{self, HttpTransport, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;
type FacadeTokenResponse = oauth2::basic::BasicTokenResponse;

/// Performs the `client_credentials` grant and stamps the resulting state with `clock`.
///
/// Listrak expects `client_id` and `client_secret` as form fields next to `grant_type`, so the
/// client is configured for request-body authentication.
pub(crate) async fn exchange_client_credentials<C>(
	credentials: &Credentials,
	token_endpoint: &Url,
	http_client: &C,
	clock: &dyn Clock,
) -> Result<TokenState>
where
	C: ?Sized + HttpTransport,
{
	let oauth_client = configure(credentials, token_endpoint)?;
	let meta = ResponseMetadataSlot::default();
	let instrumented = http_client.with_metadata(meta.clone());
	let result = oauth_client.exchange_client_credentials().request_async(&instrumented).await;
	let reply = match result {
		Ok(response) => TokenReply::from_standard(&response),
		Err(err) => recover_reply(meta.take(), err)?,
	};

	map_token_response(reply, clock.now())
}

/// Members of a token endpoint reply that the client reads.
///
/// Listrak may omit `token_type`, which `oauth2`'s standard response requires, so a reply the
/// standard parser refuses is read again into this shape.
#[derive(Debug, Deserialize)]
struct TokenReply {
	access_token: String,
	#[serde(default)]
	expires_in: Option<u64>,
}
impl TokenReply {
	fn from_standard(response: &FacadeTokenResponse) -> Self {
		Self {
			access_token: response.access_token().secret().to_owned(),
			expires_in: response.expires_in().map(|lifetime| lifetime.as_secs()),
		}
	}

	fn parse(body: &[u8]) -> Result<Self, JsonPathError> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut deserializer)
	}
}

/// Salvages a token from a 2xx reply that `oauth2` refused, otherwise maps the failure.
///
/// `oauth2` only accepts status 200 and a body carrying `token_type`; any other 2xx reply ends
/// up as a parse failure even when it holds a usable token.
fn recover_reply<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Result<TokenReply>
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.as_ref().and_then(|value| value.status);

	match err {
		RequestTokenError::Parse(_, body) if is_success(status) => TokenReply::parse(&body)
			.map_err(|source| AuthError::MalformedResponse { source, status }.into()),
		err => Err(map_request_error(meta, err)),
	}
}

fn configure(credentials: &Credentials, token_endpoint: &Url) -> Result<ConfiguredBasicClient> {
	let token_url = TokenUrl::new(token_endpoint.to_string())
		.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;

	Ok(BasicClient::new(ClientId::new(credentials.client_id().to_owned()))
		.set_client_secret(ClientSecret::new(credentials.client_secret().expose().to_owned()))
		.set_token_uri(token_url)
		.set_auth_type(AuthType::RequestBody))
}

fn map_token_response(reply: TokenReply, issued_at: OffsetDateTime) -> Result<TokenState> {
	let expires_in = reply.expires_in.ok_or(AuthError::MissingExpiresIn)?;
	let expires_in = i64::try_from(expires_in).map_err(|_| AuthError::ExpiresInOutOfRange)?;
	let expires_in = Duration::seconds(expires_in);

	if issued_at.checked_add(expires_in).is_none() {
		return Err(AuthError::ExpiresInOutOfRange.into());
	}

	Ok(TokenState::issue(reply.access_token, issued_at, expires_in))
}

fn map_request_error<E>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	let status = meta.as_ref().and_then(|value| value.status);
	let error_body = meta.and_then(|value| value.error_body);

	match err {
		RequestTokenError::ServerResponse(response) => AuthError::Rejected {
			status,
			body: error_body.unwrap_or_else(|| describe_server_error(&response)),
		}
		.into(),
		RequestTokenError::Request(error) => http::map_client_error(error),
		// Non-success bodies that are not OAuth error documents land here as parse failures.
		RequestTokenError::Parse(source, body) => match error_body {
			Some(error_body) => AuthError::Rejected { status, body: error_body }.into(),
			None if is_failure(status) =>
				AuthError::Rejected { status, body: String::from_utf8_lossy(&body).into_owned() }
					.into(),
			None => AuthError::MalformedResponse { source, status }.into(),
		},
		RequestTokenError::Other(message) => match error_body {
			Some(body) => AuthError::Rejected { status, body }.into(),
			None => AuthError::UnexpectedResponse { message, status }.into(),
		},
	}
}

fn describe_server_error(response: &BasicErrorResponse) -> String {
	serde_json::to_string(response).unwrap_or_else(|_| response.error().as_ref().to_owned())
}

fn is_failure(status: Option<u16>) -> bool {
	status.is_some_and(|code| !(200..300).contains(&code))
}

fn is_success(status: Option<u16>) -> bool {
	status.is_some_and(|code| (200..300).contains(&code))
}

#[cfg(test)]
mod tests {
	// crates.io
	use oauth2::basic::BasicErrorResponseType;
	use time::macros;
	// self
	use super::*;

	fn reply(body: &str) -> TokenReply {
		TokenReply::parse(body.as_bytes()).expect("Token reply fixture should deserialize.")
	}

	fn parse_failure(body: &[u8]) -> BasicRequestTokenError<HttpClientError<std::io::Error>> {
		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let source = serde_path_to_error::deserialize::<_, BasicErrorResponse>(&mut deserializer)
			.expect_err("Fixture should not parse as an OAuth error document.");

		RequestTokenError::Parse(source, body.to_vec())
	}

	#[test]
	fn configures_request_body_client() {
		let credentials = Credentials::new("client", "secret");
		let endpoint = Url::parse("https://auth.listrak.com/OAuth2/Token")
			.expect("Token endpoint fixture should parse.");

		assert!(configure(&credentials, &endpoint).is_ok());
	}

	#[test]
	fn token_response_sets_expiry_from_issue_instant() {
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let state = map_token_response(
			reply(r#"{"access_token":"T1","token_type":"Bearer","expires_in":3600}"#),
			issued,
		)
		.expect("Well-formed token responses should map.");

		assert_eq!(state.access_token().expose(), "T1");
		assert_eq!(state.expires_at(), macros::datetime!(2025-01-01 01:00 UTC));
	}

	#[test]
	fn token_response_without_token_type_maps() {
		let state = map_token_response(
			reply(r#"{"access_token":"T1","expires_in":3600}"#),
			macros::datetime!(2025-01-01 00:00 UTC),
		)
		.expect("Replies without token_type should map.");

		assert_eq!(state.access_token().expose(), "T1");
		assert_eq!(state.expires_at(), macros::datetime!(2025-01-01 01:00 UTC));
	}

	#[test]
	fn token_response_without_expires_in_is_rejected() {
		let err = map_token_response(
			reply(r#"{"access_token":"T1","token_type":"Bearer"}"#),
			macros::datetime!(2025-01-01 00:00 UTC),
		)
		.expect_err("Responses without expires_in should be rejected.");

		assert!(matches!(err, Error::Auth(AuthError::MissingExpiresIn)));
	}

	#[test]
	fn token_reply_with_numeric_access_token_reports_path() {
		let err = TokenReply::parse(br#"{"access_token":7,"expires_in":3600}"#)
			.expect_err("Non-string access tokens should be rejected.");

		assert_eq!(err.path().to_string(), "access_token");
	}

	#[test]
	fn created_reply_is_recovered() {
		let body = br#"{"access_token":"T1","expires_in":3600}"#;
		let recovered = recover_reply(
			Some(ResponseMetadata::from_response(201, body)),
			parse_failure(body),
		)
		.expect("A 201 reply carrying a token should be accepted.");

		assert_eq!(recovered.access_token, "T1");
		assert_eq!(recovered.expires_in, Some(3600));
	}

	#[test]
	fn success_reply_without_token_is_malformed() {
		let body = br#"{"expires_in":3600}"#;
		let err = recover_reply(
			Some(ResponseMetadata::from_response(200, body)),
			parse_failure(body),
		)
		.expect_err("A reply without access_token should be rejected.");

		match err {
			Error::Auth(AuthError::MalformedResponse { status, .. }) =>
				assert_eq!(status, Some(200)),
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn failure_reply_is_not_recovered() {
		let body = br#"{"access_token":"T1","expires_in":3600}"#;
		let err = recover_reply(
			Some(ResponseMetadata::from_response(500, body)),
			parse_failure(body),
		)
		.expect_err("Failure statuses should never yield a token.");

		match err {
			Error::Auth(AuthError::Rejected { status, body }) => {
				assert_eq!(status, Some(500));
				assert!(body.contains("T1"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn server_error_prefers_captured_body() {
		let meta = ResponseMetadata::from_response(401, b"{\"error\":\"invalid_client\"}");
		let response = BasicErrorResponse::new(BasicErrorResponseType::InvalidClient, None, None);
		let err = map_request_error::<std::io::Error>(
			Some(meta),
			RequestTokenError::ServerResponse(response),
		);

		match err {
			Error::Auth(AuthError::Rejected { status, body }) => {
				assert_eq!(status, Some(401));
				assert_eq!(body, "{\"error\":\"invalid_client\"}");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn server_error_without_metadata_serializes_response() {
		let response = BasicErrorResponse::new(BasicErrorResponseType::InvalidClient, None, None);
		let err =
			map_request_error::<std::io::Error>(None, RequestTokenError::ServerResponse(response));

		match err {
			Error::Auth(AuthError::Rejected { status, body }) => {
				assert_eq!(status, None);
				assert!(body.contains("invalid_client"));
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}
}
