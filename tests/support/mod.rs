#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	future::Future,
	pin::Pin,
	sync::{Arc, Mutex},
};
// crates.io
use time::{OffsetDateTime, macros::datetime};
// self
use listrak::{
	ListrakClient, TokenManager,
	auth::{Credentials, ManualClock},
	config::ClientConfig,
	http::{HttpTransport, ResponseMetadata, ResponseMetadataSlot},
	oauth2::{
		AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse,
		http::{
			HeaderValue, StatusCode,
			header::{AUTHORIZATION, CONTENT_TYPE},
		},
	},
	url::Url,
};

pub const TOKEN_URL: &str = "https://auth.test/OAuth2/Token";
pub const API_BASE: &str = "https://api.test";
pub const T0: OffsetDateTime = datetime!(2025-01-01 00:00 UTC);

/// One request seen by [`ScriptedHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
	pub method: String,
	pub uri: String,
	pub authorization: Option<String>,
	pub body: String,
}
impl RecordedRequest {
	pub fn is_token_request(&self) -> bool {
		self.uri == TOKEN_URL
	}
}

#[derive(Default)]
struct Script {
	responses: Mutex<VecDeque<(u16, String)>>,
	requests: Mutex<Vec<RecordedRequest>>,
}

/// In-process transport answering from a FIFO script and recording every request.
#[derive(Clone, Default)]
pub struct ScriptedHttpClient(Arc<Script>);
impl ScriptedHttpClient {
	pub fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
		self.0
			.responses
			.lock()
			.expect("Script lock should not be poisoned.")
			.push_back((status, body.into()));

		self
	}

	pub fn token(&self, access_token: &str, expires_in: u64) -> &Self {
		self.respond(200, token_body(access_token, expires_in))
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.0.requests.lock().expect("Script lock should not be poisoned.").clone()
	}

	pub fn token_requests(&self) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(RecordedRequest::is_token_request).collect()
	}

	pub fn api_requests(&self) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(|request| !request.is_token_request()).collect()
	}
}
impl HttpTransport for ScriptedHttpClient {
	type Handle = ScriptedHandle;
	type TransportError = std::io::Error;

	fn with_metadata(&self, slot: ResponseMetadataSlot) -> Self::Handle {
		ScriptedHandle { script: Arc::clone(&self.0), slot }
	}
}

pub struct ScriptedHandle {
	script: Arc<Script>,
	slot: ResponseMetadataSlot,
}
impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
	type Error = HttpClientError<std::io::Error>;
	type Future = Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send>>;

	fn call(&'c self, request: HttpRequest) -> Self::Future {
		Box::pin(async move {
			self.slot.take();

			let recorded = RecordedRequest {
				method: request.method().to_string(),
				uri: request.uri().to_string(),
				authorization: request
					.headers()
					.get(AUTHORIZATION)
					.and_then(|value| value.to_str().ok())
					.map(str::to_owned),
				body: String::from_utf8_lossy(request.body()).into_owned(),
			};

			self.script
				.requests
				.lock()
				.expect("Script lock should not be poisoned.")
				.push(recorded);

			let next = self
				.script
				.responses
				.lock()
				.expect("Script lock should not be poisoned.")
				.pop_front();
			let (status, body) =
				next.ok_or_else(|| HttpClientError::Other("No scripted response left.".into()))?;

			self.slot.store(ResponseMetadata::from_response(status, body.as_bytes()));

			let mut response = HttpResponse::new(body.into_bytes());

			*response.status_mut() =
				StatusCode::from_u16(status).expect("Scripted status should be valid.");
			response
				.headers_mut()
				.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

			Ok(response)
		})
	}
}

pub fn token_body(access_token: &str, expires_in: u64) -> String {
	format!(
		r#"{{"access_token":"{access_token}","token_type":"Bearer","expires_in":{expires_in}}}"#
	)
}

pub fn credentials() -> Credentials {
	Credentials::new("client-id", "client-secret")
}

pub fn config() -> ClientConfig {
	ClientConfig::builder()
		.token_endpoint(TOKEN_URL)
		.api_base(API_BASE)
		.build()
		.expect("Scripted client configuration should build.")
}

pub async fn token_manager(
	http: &ScriptedHttpClient,
	clock: &ManualClock,
) -> listrak::Result<TokenManager<ScriptedHttpClient>> {
	let token_endpoint = Url::parse(TOKEN_URL).expect("Token endpoint fixture should parse.");

	TokenManager::with_http_client(
		credentials(),
		token_endpoint,
		http.clone(),
		Arc::new(clock.clone()),
	)
	.await
}

pub async fn client(
	http: &ScriptedHttpClient,
	config: ClientConfig,
) -> ListrakClient<ScriptedHttpClient> {
	ListrakClient::with_http_client(
		config,
		credentials(),
		http.clone(),
		Arc::new(ManualClock::new(T0)),
	)
	.await
	.expect("Scripted client should obtain its initial token.")
}
