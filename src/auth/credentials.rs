//! Client-credentials pair issued by Listrak for an integration.

// self
use crate::{_prelude::*, auth::Secret};

/// OAuth 2.0 client identifier and secret.
#[derive(Clone)]
pub struct Credentials {
	client_id: String,
	client_secret: Secret,
}
impl Credentials {
	/// Creates a credentials pair.
	pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
		Self { client_id: client_id.into(), client_secret: Secret::new(client_secret) }
	}

	/// Returns the client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Returns the client secret.
	pub fn client_secret(&self) -> &Secret {
		&self.client_secret
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &self.client_secret)
			.finish()
	}
}
