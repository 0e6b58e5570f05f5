//! Credentials for the Bitlum exchange API
//!
//! This crate turns a user's macaroon or bearer token into the
//! `Authorization` header sent with each GraphQL request.
//!
//! Macaroons are decoded once and attenuated per request with a nonce and a
//! timestamp caveat, which the exchange uses to reject replayed requests.
//!
//! # Example
//!
//! ```no_run
//! use bitlum_auth::{Authenticator, Credentials};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!
//!     // Header for an operation that requires the user's identity
//!     if let Some(header) = creds.authorization(true)? {
//!         println!("Authorization: {}...", &header[..16.min(header.len())]);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
pub mod macaroon;

pub use credentials::{
    Authenticator, BearerToken, Credentials, MacaroonAuth, JWT_ENV, MACAROON_ENV,
};
pub use error::{AuthError, AuthResult};
pub use macaroon::{Caveat, Macaroon};
