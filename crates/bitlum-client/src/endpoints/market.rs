//! Public market data
//!
//! These operations don't require authentication.

use bitlum_types::{Depth, Info, MarketDeal, MarketStatus, Ticker};
use serde::Serialize;
use tracing::{debug, instrument};

use super::perform;
use crate::envelope::Request;
use crate::error::{ClientError, ClientResult};
use crate::transport::Transport;

const MARKETS_QUERY: &str = r#"
query Markets($markets: [Market!]!, $period: Int) {
  markets(markets: $markets, period: $period) {
    market
    stock
    money
    open
    close
    high
    last
    low
    volume
    changeLast
    changeHigh
    changeLow
    bestAsk
    bestBid
  }
}
"#;

const TICKERS_QUERY: &str = r#"
query GetMarketInfo($markets: [Market!]) {
  markets(markets: $markets) {
    market
    last
    changeLast
  }
}
"#;

const DEPTH_QUERY: &str = r#"
query GetBestAskBid($market: Market!, $limit: Int, $interval: Float) {
  depth(market: $market, limit: $limit, interval: $interval) {
    asks {
      price
      volume
    }
    bids {
      price
      volume
    }
  }
}
"#;

const DEALS_QUERY: &str = r#"
query Deals($markets: [Market!]!, $limit: Int) {
  deals(markets: $markets, limit: $limit) {
    id
    market
    time
    amount
    price
    type
  }
}
"#;

const INFO_QUERY: &str = r#"
query Info {
  info {
    network
    time
    lightning {
      host
      port
      minAmount
      maxAmount
      identityPubkey
      alias
      numPendingChannels
      numActiveChannels
      numPeers
      blockHeight
      blockHash
      syncedToChain
      asset
    }
  }
}
"#;

#[derive(Serialize)]
struct MarketsVariables<'a> {
    markets: &'a [&'a str],
    period: i32,
}

#[derive(Serialize)]
struct TickersVariables<'a> {
    markets: &'a [&'a str],
}

#[derive(Serialize)]
struct DepthVariables<'a> {
    market: &'a str,
    limit: u32,
    interval: f64,
}

#[derive(Serialize)]
struct DealsVariables<'a> {
    markets: &'a [&'a str],
    limit: i32,
}

/// Public market data operations
pub struct MarketEndpoints<'a> {
    transport: &'a dyn Transport,
}

impl<'a> MarketEndpoints<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Get market statistics over a period
    ///
    /// # Arguments
    /// * `markets` - Markets to report (e.g., ["BTCETH"])
    /// * `period` - Period in seconds the statistics cover
    #[instrument(skip(self))]
    pub async fn markets(&self, markets: &[&str], period: i32) -> ClientResult<Vec<MarketStatus>> {
        debug!("Fetching status of {} markets", markets.len());

        let request = Request::new(MARKETS_QUERY, &MarketsVariables { markets, period })?;
        perform(self.transport, false, &request, "markets").await
    }

    /// Get the last price and its 24h change for each market
    ///
    /// At least one market is required.
    #[instrument(skip(self))]
    pub async fn tickers(&self, markets: &[&str]) -> ClientResult<Vec<Ticker>> {
        if markets.is_empty() {
            return Err(ClientError::InvalidParameter(
                "not empty markets expected".to_string(),
            ));
        }

        debug!("Fetching tickers for {} markets", markets.len());

        let request = Request::new(TICKERS_QUERY, &TickersVariables { markets })?;
        perform(self.transport, false, &request, "markets").await
    }

    /// Get aggregated orderbook depth
    ///
    /// # Arguments
    /// * `market` - Market (e.g., "BTCETH")
    /// * `limit` - Maximum number of asks and bids
    /// * `interval` - Price step the levels are merged by
    #[instrument(skip(self))]
    pub async fn depth(&self, market: &str, limit: u32, interval: f64) -> ClientResult<Depth> {
        debug!("Fetching depth for {}", market);

        let request = Request::new(
            DEPTH_QUERY,
            &DepthVariables {
                market,
                limit,
                interval,
            },
        )?;
        perform(self.transport, false, &request, "depth").await
    }

    /// Get the latest completed deals
    #[instrument(skip(self))]
    pub async fn deals(&self, markets: &[&str], limit: i32) -> ClientResult<Vec<MarketDeal>> {
        debug!("Fetching deals for {} markets", markets.len());

        let request = Request::new(DEALS_QUERY, &DealsVariables { markets, limit })?;
        perform(self.transport, false, &request, "deals").await
    }

    /// Get the service's network and lightning node state
    #[instrument(skip(self))]
    pub async fn info(&self) -> ClientResult<Info> {
        debug!("Fetching service info");

        let request = Request::without_variables(INFO_QUERY);
        perform(self.transport, false, &request, "info").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_depth_variables() {
        let vars = serde_json::to_value(DepthVariables {
            market: "BTCETH",
            limit: 50,
            interval: 0.00000001,
        })
        .unwrap();

        assert_eq!(
            vars,
            json!({"market": "BTCETH", "limit": 50, "interval": 0.00000001})
        );
    }

    #[test]
    fn test_queries_select_their_fields() {
        assert!(MARKETS_QUERY.contains("markets(markets: $markets, period: $period)"));
        assert!(TICKERS_QUERY.contains("markets(markets: $markets)"));
        assert!(DEPTH_QUERY.contains("depth(market: $market"));
        assert!(DEALS_QUERY.contains("deals(markets: $markets, limit: $limit)"));
        assert!(INFO_QUERY.contains("identityPubkey"));
    }
}
