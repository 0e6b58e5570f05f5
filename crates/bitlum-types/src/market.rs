//! Market data types: statuses, tickers, depth and deals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::de;

/// Markets currently traded on the exchange
///
/// The left asset of a market is the money, the right one is the stock:
/// in `BTCETH` BTC is used to buy or sell ETH.
pub const SUPPORTED_MARKETS: [&str; 4] = ["BTCETH", "BTCBCH", "BTCDASH", "BTCLTC"];

/// Market state over a requested period of time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarketStatus {
    /// Market name, e.g. `BTCETH`
    pub market: String,
    /// Right asset of the market, sold by asks and bought by bids
    pub stock: String,
    /// Left asset of the market, bought by asks and sold by bids
    pub money: String,
    /// Price of the first trade in the period
    #[serde(deserialize_with = "de::decimal")]
    pub open: Decimal,
    /// Price of the final trade in the period
    #[serde(deserialize_with = "de::decimal")]
    pub close: Decimal,
    /// Highest traded price in the period
    #[serde(deserialize_with = "de::decimal")]
    pub high: Decimal,
    /// Price of the most recently executed order
    #[serde(deserialize_with = "de::decimal")]
    pub last: Decimal,
    /// Lowest traded price in the period
    #[serde(deserialize_with = "de::decimal")]
    pub low: Decimal,
    /// Traded stock volume, estimated in market money
    #[serde(deserialize_with = "de::decimal")]
    pub volume: Decimal,
    /// Difference between open and last, in percent
    #[serde(deserialize_with = "de::decimal")]
    pub change_last: Decimal,
    /// Difference between open and high, in percent
    #[serde(deserialize_with = "de::decimal")]
    pub change_high: Decimal,
    /// Difference between open and low, in percent
    #[serde(deserialize_with = "de::decimal")]
    pub change_low: Decimal,
    /// Lowest price the stock can be bought for right now
    #[serde(deserialize_with = "de::decimal")]
    pub best_ask: Decimal,
    /// Highest price the stock can be sold for right now
    #[serde(deserialize_with = "de::decimal")]
    pub best_bid: Decimal,
}

impl MarketStatus {
    /// Spread between the best ask and the best bid
    pub fn spread(&self) -> Option<Decimal> {
        if self.best_ask.is_zero() || self.best_bid.is_zero() {
            return None;
        }
        self.best_ask.checked_sub(self.best_bid)
    }
}

/// Last price summary of a market
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Ticker {
    pub market: String,
    #[serde(deserialize_with = "de::decimal")]
    pub last: Decimal,
    #[serde(deserialize_with = "de::decimal")]
    pub change_last: Decimal,
}

/// Order to sell stock at a given minimum price within the given volume
///
/// The price is in money units: an ask in `BTCETH` sells ETH for BTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ask {
    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,
    #[serde(deserialize_with = "de::decimal")]
    pub volume: Decimal,
}

/// Order to buy stock at a given maximum price within the given volume
///
/// The price is in money units: a bid in `BTCETH` buys ETH with BTC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bid {
    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,
    #[serde(deserialize_with = "de::decimal")]
    pub volume: Decimal,
}

/// Limited lists of asks and bids in benefit order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Depth {
    /// Top asks by increasing price
    pub asks: Vec<Ask>,
    /// Top bids by decreasing price
    pub bids: Vec<Bid>,
}

impl Depth {
    /// Lowest ask, if any
    pub fn best_ask(&self) -> Option<&Ask> {
        self.asks.first()
    }

    /// Highest bid, if any
    pub fn best_bid(&self) -> Option<&Bid> {
        self.bids.first()
    }

    /// Mid price between the best ask and the best bid
    pub fn mid_price(&self) -> Option<Decimal> {
        let ask = self.best_ask()?;
        let bid = self.best_bid()?;
        ask.price.checked_add(bid.price)?.checked_div(Decimal::TWO)
    }
}

/// Result of matching two opposite orders with the same price
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketDeal {
    pub id: i32,
    /// Market the deal was closed on
    pub market: String,
    /// Deal time as a unix timestamp with fractional seconds
    pub time: f64,
    /// Total amount of money spent on the deal
    #[serde(deserialize_with = "de::decimal")]
    pub amount: Decimal,
    /// Stock price the deal was closed with
    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,
    /// Either `ask` or `bid`
    #[serde(rename = "type")]
    pub deal_type: String,
}
