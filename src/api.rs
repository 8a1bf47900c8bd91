//! Listrak Email API resource endpoints.
//!
//! [`ListrakClient`] pairs a [`TokenManager`] with the shared transport and hands out borrowed
//! endpoint groups mirroring Listrak's resource tags: [`lists`](ListrakClient::lists),
//! [`list_imports`](ListrakClient::list_imports), [`contacts`](ListrakClient::contacts),
//! [`segmentation_fields`](ListrakClient::segmentation_fields), and
//! [`segmentation_field_groups`](ListrakClient::segmentation_field_groups). Every operation asks
//! the token manager for a fresh bearer token and issues a single request (contact listing issues
//! one per page).

pub mod contact;
pub mod list;
pub mod list_import;
pub mod segmentation_field;
pub mod segmentation_field_group;

pub use contact::*;
pub use list::*;
pub use list_import::*;
pub use segmentation_field::*;
pub use segmentation_field_group::*;

// crates.io
use oauth2::{
	HttpRequest, HttpResponse,
	http::{
		Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
// self
use crate::{
	_prelude::*,
	auth::{Clock, Credentials, TokenManager},
	config::ClientConfig,
	error::{ApiError, ConfigError},
	http::{self, HttpTransport},
	obs::{self, OperationKind},
};
#[cfg(feature = "reqwest")] use crate::{auth::SystemClock, http::ReqwestHttpClient};

const CONTENT_TYPE_JSON: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestListrakClient = ListrakClient<ReqwestHttpClient>;

/// Extra JSON members preserved on resource models.
pub type ExtraFields = BTreeMap<String, serde_json::Value>;

/// Entry point for the Listrak Email API.
pub struct ListrakClient<C>
where
	C: ?Sized + HttpTransport,
{
	tokens: TokenManager<C>,
	config: ClientConfig,
}
impl<C> ListrakClient<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a client over the provided transport and performs the initial token fetch.
	pub async fn with_http_client(
		config: ClientConfig,
		credentials: Credentials,
		http_client: impl Into<Arc<C>>,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let tokens = TokenManager::with_http_client(
			credentials,
			config.token_endpoint.clone(),
			http_client,
			clock,
		)
		.await?;

		Ok(Self::from_token_manager(config, tokens))
	}

	/// Wraps an existing token manager.
	pub fn from_token_manager(config: ClientConfig, tokens: TokenManager<C>) -> Self {
		Self { tokens, config }
	}

	/// Returns the token manager backing this client.
	pub fn token_manager(&self) -> &TokenManager<C> {
		&self.tokens
	}

	/// Returns the active configuration.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// List endpoints.
	pub fn lists(&self) -> ListEndpoint<'_, C> {
		ListEndpoint { client: self }
	}

	/// List import endpoints.
	pub fn list_imports(&self) -> ListImportEndpoint<'_, C> {
		ListImportEndpoint { client: self }
	}

	/// Contact endpoints.
	pub fn contacts(&self) -> ContactEndpoint<'_, C> {
		ContactEndpoint { client: self }
	}

	/// Profile field endpoints.
	pub fn segmentation_fields(&self) -> SegmentationFieldEndpoint<'_, C> {
		SegmentationFieldEndpoint { client: self }
	}

	/// Profile field group endpoints.
	pub fn segmentation_field_groups(&self) -> SegmentationFieldGroupEndpoint<'_, C> {
		SegmentationFieldGroupEndpoint { client: self }
	}

	/// Builds `{api_base}/email/v1/List/{segments...}`.
	pub(crate) fn list_url<I, S>(&self, segments: I) -> Result<Url>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.config.api_base.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::ApiBaseNotHierarchical {
				url: self.config.api_base.to_string(),
			})?
			.pop_if_empty()
			.extend(["email", "v1", "List"])
			.extend(segments);

		Ok(url)
	}

	/// Sends one authorized request and returns the success response.
	pub(crate) async fn send(
		&self,
		operation: &'static str,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<HttpResponse> {
		obs::observe(OperationKind::Api, operation, async move {
			let token = self.tokens.get_token().await?;
			let request = build_request(method, &url, &token.bearer_header(), body)?;
			let response = http::execute(self.tokens.http_client().as_ref(), request).await?;
			let status = response.status();

			if !status.is_success() {
				return Err(ApiError::new(
					status.as_u16(),
					String::from_utf8_lossy(response.body()).into_owned(),
				)
				.into());
			}

			Ok(response)
		})
		.await
	}

	/// Sends a request and decodes the JSON response body.
	pub(crate) async fn send_json<T>(
		&self,
		operation: &'static str,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(operation, method, url, body).await?;

		decode(&response)
	}
}
#[cfg(feature = "reqwest")]
impl ListrakClient<ReqwestHttpClient> {
	/// Creates a client against Listrak's production hosts and fetches a token.
	pub async fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		Self::with_http_client(
			ClientConfig::listrak()?,
			Credentials::new(client_id, client_secret),
			ReqwestHttpClient::without_redirects()?,
			Arc::new(SystemClock),
		)
		.await
	}
}
impl<C> Debug for ListrakClient<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ListrakClient")
			.field("tokens", &self.tokens)
			.field("config", &self.config)
			.finish()
	}
}

/// One page of a cursor-paginated collection.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub data: Vec<T>,
	/// Cursor for the next page; `None` on the last page.
	#[serde(default)]
	pub next_page_cursor: Option<String>,
}

/// Answer to a create/update call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCreated {
	/// Status echoed in the body.
	#[serde(default)]
	pub status: Option<u16>,
	/// Identifier of the created or updated resource.
	pub resource_id: String,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
	data: T,
}

/// Unwraps the `data` member of a Listrak response.
pub(crate) fn decode_data<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	decode::<DataEnvelope<T>>(response).map(|envelope| envelope.data)
}

/// Appends query pairs, leaving the URL untouched when there are none.
pub(crate) fn with_query<'a, I>(mut url: Url, pairs: I) -> Url
where
	I: IntoIterator<Item = (&'a str, String)>,
{
	let mut pairs = pairs.into_iter().peekable();

	if pairs.peek().is_some() {
		url.query_pairs_mut().extend_pairs(pairs);
	}

	url
}

/// Serializes a request body as JSON.
pub(crate) fn encode<T>(body: &T) -> Result<Vec<u8>>
where
	T: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|e| ConfigError::from(e).into())
}

fn decode<T>(response: &HttpResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(response.body());

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| Error::Decode { source, status: response.status().as_u16() })
}

fn build_request(
	method: Method,
	url: &Url,
	authorization: &str,
	body: Option<Vec<u8>>,
) -> Result<HttpRequest> {
	let mut builder = oauth2::http::Request::builder()
		.method(method)
		.uri(url.as_str())
		.header(AUTHORIZATION, authorization)
		.header(ACCEPT, CONTENT_TYPE_JSON);

	if body.is_some() {
		builder = builder.header(CONTENT_TYPE, CONTENT_TYPE_JSON);
	}

	builder.body(body.unwrap_or_default()).map_err(|e| ConfigError::from(e).into())
}
