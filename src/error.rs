//! Client-level error types shared by the token manager and the resource endpoints.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Structured JSON failure annotated with the path of the offending field.
pub type JsonPathError = serde_path_to_error::Error<serde_json::Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token endpoint failure; no usable access token could be obtained.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Resource endpoint answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// Local configuration or request construction problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, IO).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Resource endpoint returned a success status with a body of the wrong shape.
	#[error("Listrak API returned malformed JSON (status {status}).")]
	Decode {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
		/// HTTP status code of the response.
		status: u16,
	},
	/// Cursor pagination hit the configured page ceiling before the cursor ran out.
	#[error("Pagination stopped after reaching the {limit}-page ceiling.")]
	PageLimitExceeded {
		/// Configured ceiling.
		limit: NonZeroUsize,
	},
}
impl Error {
	/// Returns the HTTP status attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Auth(e) => e.status(),
			Self::Api(e) => Some(e.status),
			Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Token endpoint failures.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint rejected the request: {body}.")]
	Rejected {
		/// HTTP status code, when the transport recorded one.
		status: Option<u16>,
		/// Raw response body.
		body: String,
	},
	/// Token endpoint answered successfully but the body could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: JsonPathError,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint returned something the OAuth client could not interpret.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	UnexpectedResponse {
		/// Description of the unexpected response.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
}
impl AuthError {
	/// Returns the HTTP status reported by the token endpoint, if known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::MalformedResponse { status, .. }
			| Self::UnexpectedResponse { status, .. } => *status,
			Self::MissingExpiresIn | Self::ExpiresInOutOfRange => None,
		}
	}
}

/// Non-success answer from a resource endpoint.
#[derive(Debug, ThisError)]
#[error("Listrak API returned HTTP {status}: {}", .message.as_deref().unwrap_or(.body.as_str()))]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
	/// Listrak `error` field, when the body is an error envelope.
	pub error: Option<String>,
	/// Listrak `message` field, when the body is an error envelope.
	pub message: Option<String>,
}
impl ApiError {
	/// Builds an error from a status and raw body, lifting Listrak's error envelope when present.
	pub fn new(status: u16, body: impl Into<String>) -> Self {
		#[derive(Deserialize)]
		struct Envelope {
			error: Option<String>,
			message: Option<String>,
		}

		let body = body.into();
		let (error, message) = serde_json::from_str::<Envelope>(&body)
			.map(|envelope| (envelope.error, envelope.message))
			.unwrap_or_default();

		Self { status, body, error, message }
	}
}

/// Configuration and request construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[from] serde_json::Error),
	/// An endpoint URL could not be parsed.
	#[error("The {endpoint} endpoint is not a valid URL.")]
	InvalidEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// An endpoint uses a scheme other than HTTP(S), or plain HTTP without opting in.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// API base URL cannot carry path segments.
	#[error("The API base URL cannot be used as a base: {url}.")]
	ApiBaseNotHierarchical {
		/// Offending URL.
		url: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling Listrak.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling Listrak.")]
	Io(#[from] std::io::Error),
	/// HTTP client failure that carries only a message.
	#[error("HTTP client error occurred while calling Listrak: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
