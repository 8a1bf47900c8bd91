//! Bearer token state and its expiry status.

// self
use crate::{_prelude::*, auth::Secret};

/// Lifecycle status of the held token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
	/// `now < expires_at`.
	Valid,
	/// `now >= expires_at`; the next [`get_token`](crate::TokenManager::get_token) refreshes.
	Expired,
}

/// Access token plus the instants it was issued and expires.
///
/// Values are only minted from a successful token response, so `expires_at` is always
/// `issued_at + expires_in` as reported by the server.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenState {
	access_token: Secret,
	issued_at: OffsetDateTime,
	expires_at: OffsetDateTime,
}
impl TokenState {
	pub(crate) fn issue(
		access_token: impl Into<String>,
		issued_at: OffsetDateTime,
		expires_in: Duration,
	) -> Self {
		let expires_at = issued_at + expires_in;

		Self { access_token: Secret::new(access_token), issued_at, expires_at }
	}

	/// Bearer token value.
	pub fn access_token(&self) -> &Secret {
		&self.access_token
	}

	/// Instant the token response was processed.
	pub fn issued_at(&self) -> OffsetDateTime {
		self.issued_at
	}

	/// Instant from which the token is treated as expired.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.expires_at
	}

	/// Computes the status at a given instant.
	pub fn status_at(&self, instant: OffsetDateTime) -> TokenStatus {
		if instant >= self.expires_at { TokenStatus::Expired } else { TokenStatus::Valid }
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		matches!(self.status_at(instant), TokenStatus::Expired)
	}
}
impl Debug for TokenState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenState")
			.field("access_token", &"<redacted>")
			.field("issued_at", &self.issued_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}
