//! Redaction wrapper for client secrets and bearer tokens.

// self
use crate::_prelude::*;

/// Credential string that never shows up in `Debug` or `Display` output.
///
/// Client secrets and access tokens are held in this type from the moment they enter the crate
/// until they are written into a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(Box<str>);
impl Secret {
	/// Wraps a credential string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into().into_boxed_str())
	}

	/// Returns the raw value. Keep it out of logs.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Renders the value as an `Authorization` header value.
	pub(crate) fn bearer_header(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl From<String> for Secret {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Secret(<redacted>)")
	}
}
impl Display for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
