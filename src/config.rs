//! Endpoint configuration and validation for [`ListrakClient`](crate::ListrakClient).
//!
//! [`ClientConfig`] defaults to Listrak's production hosts. Use [`ClientConfig::builder`] to point
//! the client at a different token endpoint or API base (staging hosts, local mocks) and to cap
//! cursor pagination with [`ClientConfigBuilder::max_pages`].

// self
use crate::{_prelude::*, error::ConfigError};

/// Production OAuth 2.0 token endpoint.
pub const LISTRAK_TOKEN_ENDPOINT: &str = "https://auth.listrak.com/OAuth2/Token";
/// Production REST API base.
pub const LISTRAK_API_BASE: &str = "https://api.listrak.com";

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// OAuth 2.0 token endpoint used for the client-credentials grant.
	pub token_endpoint: Url,
	/// Base URL that resource paths (`/email/v1/...`) are appended to.
	pub api_base: Url,
	/// Optional ceiling on pages fetched by a single cursor-following call.
	pub max_pages: Option<NonZeroUsize>,
}
impl ClientConfig {
	/// Returns a builder seeded with Listrak's production endpoints.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Returns the production configuration without a page ceiling.
	pub fn listrak() -> Result<Self, ConfigError> {
		Self::builder().build()
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Clone, Debug, Default)]
pub struct ClientConfigBuilder {
	token_endpoint: Option<String>,
	api_base: Option<String>,
	max_pages: Option<NonZeroUsize>,
	allow_insecure_endpoints: bool,
}
impl ClientConfigBuilder {
	/// Overrides the token endpoint.
	pub fn token_endpoint(mut self, url: impl Into<String>) -> Self {
		self.token_endpoint = Some(url.into());

		self
	}

	/// Overrides the API base.
	pub fn api_base(mut self, url: impl Into<String>) -> Self {
		self.api_base = Some(url.into());

		self
	}

	/// Caps the number of pages a cursor-following call may request.
	pub fn max_pages(mut self, limit: NonZeroUsize) -> Self {
		self.max_pages = Some(limit);

		self
	}

	/// Accepts plain `http` endpoints (local mock servers).
	pub fn allow_insecure_endpoints(mut self, allow: bool) -> Self {
		self.allow_insecure_endpoints = allow;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let token_endpoint = parse_endpoint(
			"token",
			self.token_endpoint.as_deref().unwrap_or(LISTRAK_TOKEN_ENDPOINT),
			self.allow_insecure_endpoints,
		)?;
		let api_base = parse_endpoint(
			"api",
			self.api_base.as_deref().unwrap_or(LISTRAK_API_BASE),
			self.allow_insecure_endpoints,
		)?;

		if api_base.cannot_be_a_base() {
			return Err(ConfigError::ApiBaseNotHierarchical { url: api_base.to_string() });
		}

		Ok(ClientConfig { token_endpoint, api_base, max_pages: self.max_pages })
	}
}

fn parse_endpoint(
	name: &'static str,
	raw: &str,
	allow_insecure: bool,
) -> Result<Url, ConfigError> {
	let url =
		Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint { endpoint: name, source })?;

	match url.scheme() {
		"https" => Ok(url),
		"http" if allow_insecure => Ok(url),
		_ => Err(ConfigError::InsecureEndpoint { endpoint: name, url: url.to_string() }),
	}
}
