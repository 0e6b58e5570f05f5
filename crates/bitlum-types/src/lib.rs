//! Shared types for the Bitlum exchange API
//!
//! This crate provides the domain shapes decoded from the exchange's GraphQL
//! responses. It has minimal dependencies and can be used independently.
//!
//! # Key Types
//!
//! - [`MarketStatus`], [`Ticker`], [`Depth`], [`MarketDeal`] - Market data
//! - [`Order`], [`OrderSide`] - Market orders
//! - [`Me`], [`Account`], [`Deposit`] - Account state and history
//! - [`Withdrawal`], [`Info`], [`LightningNodeInfo`] - Payments
//!
//! Monetary values are [`Decimal`]s. They are decoded from JSON strings or
//! numbers and encoded back as strings, which is what the API expects for
//! amount arguments.

pub mod account;
pub mod de;
pub mod market;
pub mod order;
pub mod payment;

// Re-export commonly used types
pub use account::*;
pub use market::*;
pub use order::*;
pub use payment::*;

// Re-export rust_decimal for users
pub use rust_decimal::Decimal;
