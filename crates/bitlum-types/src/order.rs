//! Exchange orders

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::de;

/// Market order side
///
/// A bid spends the market money (left asset) to buy the stock (right
/// asset); an ask sells the stock for money. In `BTCETH` a bid buys ETH
/// using BTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Ask,
    #[default]
    Bid,
}

impl OrderSide {
    /// Returns the side name as used in API requests
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ask => "ask",
            Self::Bid => "bid",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order to buy or sell stock
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Order {
    /// Exchange specific order ID
    pub id: i64,

    /// Order status: pending, finished or canceled
    pub status: String,

    /// Amount of money or stock depending on the order side
    #[serde(deserialize_with = "de::decimal")]
    pub amount: Decimal,

    /// Price of one stock unit in money
    #[serde(deserialize_with = "de::decimal")]
    pub price: Decimal,

    /// Money involved in the order so far
    #[serde(deserialize_with = "de::decimal")]
    pub deal_money: Decimal,

    /// Stock involved in the order so far
    #[serde(deserialize_with = "de::decimal")]
    pub deal_stock: Decimal,

    /// Funds left in the market without being handled
    #[serde(deserialize_with = "de::decimal")]
    pub left: Decimal,
}

impl Order {
    pub fn is_finished(&self) -> bool {
        self.status == "finished"
    }

    /// Average execution price, when anything has been dealt
    pub fn average_price(&self) -> Option<Decimal> {
        if self.deal_stock.is_zero() {
            None
        } else {
            Some(self.deal_money / self.deal_stock)
        }
    }
}
