//! Client for the Bitlum exchange GraphQL API
//!
//! This crate provides an authenticated client for market data, account
//! balances, market orders, and blockchain / lightning payments.
//!
//! # Features
//!
//! - **Market Data**: Market statistics, tickers, depth, deals
//! - **Account**: User info, balances, deposit history, API tokens
//! - **Trading**: Market orders
//! - **Funding**: Blockchain and lightning withdrawals, lightning invoices
//!
//! # Authentication
//!
//! Requests carry either a static bearer token or a macaroon. A macaroon is
//! attenuated with a fresh nonce and timestamp for every authenticated
//! request; public operations are sent without credentials.
//!
//! # Example
//!
//! ```no_run
//! use bitlum_client::BitlumClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads BITLUM_URL, BITLUM_MACAROON and BITLUM_JWT
//!     let client = BitlumClient::from_env()?;
//!
//!     let depth = client.depth("BTCETH", 50, 0.00000001).await?;
//!     println!("Best ask: {:?}", depth.best_ask());
//!
//!     let me = client.me().await?;
//!     println!("Logged in as {}", me.email);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Errors
//!
//! Every operation makes exactly one HTTP attempt. Failures are reported as
//! [`ClientError`], naming the stage that failed. When the exchange reports
//! errors alongside data, the data is kept in the error and can be read
//! with [`ClientError::partial_data`].

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod transport;

// Re-export main types
pub use client::{BitlumClient, ClientConfig, URL_ENV};
pub use envelope::{decode_field, extract_error, ErrorLocation, ExchangeError, Request, ResponseError};
pub use error::{ClientError, ClientResult};
pub use transport::{GraphQlTransport, Transport};

// Re-export credentials and domain types
pub use bitlum_auth::{Authenticator, Credentials};
pub use bitlum_types::*;
