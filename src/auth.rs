//! OAuth 2.0 client-credentials authentication: credentials, clocks, token state, and the
//! [`TokenManager`] that keeps a bearer token fresh.

pub mod clock;
pub mod credentials;
pub mod manager;
pub mod secret;
pub mod token;

pub use clock::*;
pub use credentials::*;
pub use manager::*;
pub use secret::*;
pub use token::*;
