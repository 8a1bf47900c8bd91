//! Bearer token lifecycle: eager fetch on construction, refresh-on-expiry on demand.
//!
//! [`TokenManager`] owns the [`Credentials`] and the current [`TokenState`]. The state is only
//! ever replaced wholesale by a successful token response; a failed refresh reports an
//! [`AuthError`](crate::AuthError) to the caller that triggered it and leaves the previous state
//! in place. The check-and-refresh runs under an async mutex, so concurrent callers that observe
//! an expired token piggy-back on a single token request.

// self
use crate::{
	_prelude::*,
	auth::{Clock, Credentials, Secret, TokenState},
	http::HttpTransport,
	oauth,
	obs::{self, OperationKind},
};
#[cfg(feature = "reqwest")]
use crate::{
	auth::SystemClock, config::LISTRAK_TOKEN_ENDPOINT, error::ConfigError,
	http::ReqwestHttpClient,
};

#[cfg(feature = "reqwest")]
/// Token manager specialized for the crate's default reqwest transport.
pub type ReqwestTokenManager = TokenManager<ReqwestHttpClient>;

/// Keeps a single valid bearer token for all downstream API calls.
pub struct TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	credentials: Credentials,
	token_endpoint: Url,
	http_client: Arc<C>,
	clock: Arc<dyn Clock>,
	state: AsyncMutex<TokenState>,
}
impl<C> TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	/// Creates a manager over the provided transport and performs the initial token fetch.
	pub async fn with_http_client(
		credentials: Credentials,
		token_endpoint: Url,
		http_client: impl Into<Arc<C>>,
		clock: Arc<dyn Clock>,
	) -> Result<Self> {
		let http_client = http_client.into();
		let initial =
			fetch_token(&credentials, &token_endpoint, http_client.as_ref(), clock.as_ref())
				.await?;

		obs::event!(
			debug,
			client_id = credentials.client_id(),
			expires_at = %initial.expires_at(),
			"Obtained initial Listrak token."
		);

		Ok(Self {
			credentials,
			token_endpoint,
			http_client,
			clock,
			state: AsyncMutex::new(initial),
		})
	}

	/// Returns the current bearer token, refreshing it first when it has expired.
	pub async fn get_token(&self) -> Result<Secret> {
		let mut state = self.state.lock().await;
		let now = self.clock.now();

		if state.is_expired_at(now) {
			obs::event!(
				info,
				expired_at = %state.expires_at(),
				"Listrak token expired, requesting a new one."
			);

			*state = self.fetch().await?;
		}

		Ok(state.access_token().clone())
	}

	/// Fetches a new token regardless of the current expiry and returns it.
	///
	/// Useful after a resource call was rejected with HTTP 401 before the recorded expiry.
	pub async fn refresh(&self) -> Result<Secret> {
		let mut state = self.state.lock().await;

		*state = self.fetch().await?;

		Ok(state.access_token().clone())
	}

	/// Returns a copy of the held state without refreshing it.
	pub async fn snapshot(&self) -> TokenState {
		self.state.lock().await.clone()
	}

	/// Returns the shared transport handle.
	pub fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	/// Returns the clock used for expiry decisions.
	pub fn clock(&self) -> &Arc<dyn Clock> {
		&self.clock
	}

	async fn fetch(&self) -> Result<TokenState> {
		fetch_token(
			&self.credentials,
			&self.token_endpoint,
			self.http_client.as_ref(),
			self.clock.as_ref(),
		)
		.await
	}
}
#[cfg(feature = "reqwest")]
impl TokenManager<ReqwestHttpClient> {
	/// Creates a manager against Listrak's production token endpoint and fetches a token.
	pub async fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
	) -> Result<Self> {
		let token_endpoint = Url::parse(LISTRAK_TOKEN_ENDPOINT)
			.map_err(|source| ConfigError::InvalidEndpoint { endpoint: "token", source })?;

		Self::with_http_client(
			Credentials::new(client_id, client_secret),
			token_endpoint,
			ReqwestHttpClient::without_redirects()?,
			Arc::new(SystemClock),
		)
		.await
	}
}
impl<C> Debug for TokenManager<C>
where
	C: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("credentials", &self.credentials)
			.field("token_endpoint", &self.token_endpoint.as_str())
			.finish()
	}
}

async fn fetch_token<C>(
	credentials: &Credentials,
	token_endpoint: &Url,
	http_client: &C,
	clock: &dyn Clock,
) -> Result<TokenState>
where
	C: ?Sized + HttpTransport,
{
	obs::observe(
		OperationKind::Token,
		"fetch_token",
		oauth::exchange_client_credentials(credentials, token_endpoint, http_client, clock),
	)
	.await
}
