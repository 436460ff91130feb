//! Authentication for the Flair API.
//!
//! - [`AccessToken`]: A bearer credential with its expiry
//! - [`exchange_client_credentials`]: The OAuth 2.0 client credentials grant
//!
//! [`FlairClient`](crate::FlairClient) calls the exchange on first use and
//! caches the token for its lifetime. Tokens are never refreshed; when
//! [`AccessToken::expired`] reports `true` or a request fails with 401,
//! build a new client.

pub mod client_credentials;
pub mod token;

pub use client_credentials::{exchange_client_credentials, TOKEN_PATH};
pub use token::{AccessToken, AccessTokenResponse};
