//! Exchange operations grouped by area
//!
//! Every operation is a static GraphQL document plus a variables struct.
//! The result is read from a single root field of the response `data`.

pub mod account;
pub mod funding;
pub mod market;
pub mod trading;

pub use account::AccountEndpoints;
pub use funding::FundingEndpoints;
pub use market::MarketEndpoints;
pub use trading::TradingEndpoints;

use serde::de::DeserializeOwned;

use crate::envelope::{decode_field, Request};
use crate::error::ClientResult;
use crate::transport::Transport;

/// Send `request` and decode the root `field` of the response
pub(crate) async fn perform<T>(
    transport: &dyn Transport,
    authenticated: bool,
    request: &Request,
    field: &str,
) -> ClientResult<T>
where
    T: DeserializeOwned + Default,
{
    let body = transport.execute(authenticated, request).await?;
    decode_field(&body, field)
}
