//! Trading endpoints for market orders
//!
//! These endpoints require authentication.

use bitlum_types::{Decimal, Order, OrderSide};
use serde::Serialize;
use tracing::{debug, instrument};

use super::perform;
use crate::envelope::Request;
use crate::error::ClientResult;
use crate::transport::Transport;

const ORDER_QUERY: &str = r#"
query GetOrder($id: Int!) {
  order(id: $id) {
    id
    status
    dealStock
    dealMoney
    amount
    price
  }
}
"#;

const CREATE_MARKET_ORDER_MUTATION: &str = r#"
mutation CreateMarketOrder($market: Market!, $amount: String!, $side: MarketSide!) {
  createMarketOrder(amount: $amount, market: $market, side: $side) {
    id
    status
    amount
    price
    dealStock
    dealMoney
    left
  }
}
"#;

#[derive(Serialize)]
struct OrderVariables {
    id: i64,
}

#[derive(Serialize)]
struct CreateOrderVariables<'a> {
    market: &'a str,
    amount: Decimal,
    side: OrderSide,
}

/// Trading endpoints for market orders
pub struct TradingEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> TradingEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Get an order by ID
    #[instrument(skip(self))]
    pub async fn order(&self, id: i64) -> ClientResult<Order> {
        debug!("Fetching order {}", id);

        let request = Request::new(ORDER_QUERY, &OrderVariables { id })?;
        perform(self.transport, true, &request, "order").await
    }

    /// Place a market order
    ///
    /// # Arguments
    /// * `market` - Market (e.g., "BTCETH")
    /// * `amount` - Amount of the market's right asset to trade
    /// * `side` - [`OrderSide::Bid`] buys the right asset with the left one,
    ///   [`OrderSide::Ask`] sells it
    #[instrument(skip(self))]
    pub async fn create_market_order(
        &self,
        market: &str,
        amount: Decimal,
        side: OrderSide,
    ) -> ClientResult<Order> {
        debug!("Creating {} order on {} for {}", side, market, amount);

        let request = Request::new(
            CREATE_MARKET_ORDER_MUTATION,
            &CreateOrderVariables {
                market,
                amount,
                side,
            },
        )?;
        perform(self.transport, true, &request, "createMarketOrder").await
    }

    /// Place a bid market order (alias of [`create_order_bid`](Self::create_order_bid))
    pub async fn create_order(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.create_order_bid(market, amount).await
    }

    /// Sell the market's right asset for its left one
    ///
    /// E.g. on BTCETH this sells ETH for BTC.
    pub async fn create_order_ask(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.create_market_order(market, amount, OrderSide::Ask).await
    }

    /// Buy the market's right asset with its left one
    ///
    /// E.g. on BTCETH this buys ETH using BTC.
    pub async fn create_order_bid(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.create_market_order(market, amount, OrderSide::Bid).await
    }
}
