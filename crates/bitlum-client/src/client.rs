//! Main exchange client implementation

use bitlum_auth::{Credentials, JWT_ENV, MACAROON_ENV};
use bitlum_types::{
    Account, Decimal, Deposit, Depth, Info, MarketDeal, MarketStatus, Me, Order, Ticker,
    Withdrawal, SUPPORTED_MARKETS,
};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::endpoints::{AccountEndpoints, FundingEndpoints, MarketEndpoints, TradingEndpoints};
use crate::error::{ClientError, ClientResult};
use crate::transport::{GraphQlTransport, Transport};

/// Environment variable holding the GraphQL endpoint URL
pub const URL_ENV: &str = "BITLUM_URL";

/// Default user agent
const DEFAULT_USER_AGENT: &str = concat!("bitlum-client/", env!("CARGO_PKG_VERSION"));

/// Bitlum exchange client
///
/// Wraps the exchange's GraphQL API. Cloning is cheap and clones share the
/// connection pool and the credentials' nonce counter, so one client can be
/// used from any number of tasks.
///
/// # Example
///
/// ```no_run
/// use bitlum_client::BitlumClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = BitlumClient::new(
///         "https://exchange.example.com/graphql",
///         Some("0201066269746c756d..."),
///         None,
///     )?;
///
///     // Public market data
///     let tickers = client.tickers(&["BTCETH", "BTCLTC"]).await?;
///
///     // Account data, sent with a freshly derived macaroon
///     let accounts = client.accounts(&["BTC", "ETH"]).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct BitlumClient {
    transport: Arc<dyn Transport>,
}

impl BitlumClient {
    /// Create a client for the endpoint at `url`
    ///
    /// Either a hex encoded macaroon or a JWT is required. The macaroon is
    /// decoded immediately; when both are given the JWT is used.
    pub fn new(
        url: impl Into<String>,
        macaroon: Option<&str>,
        jwt: Option<&str>,
    ) -> ClientResult<Self> {
        let mut config = ClientConfig::new(url);
        config.macaroon = macaroon.map(str::to_string);
        config.jwt = jwt.map(str::to_string);
        Self::with_config(config)
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ClientConfig) -> ClientResult<Self> {
        let credentials = Credentials::new(config.macaroon.as_deref(), config.jwt.as_deref())?;
        let user_agent = config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let transport =
            GraphQlTransport::new(config.url, Arc::new(credentials), config.timeout, user_agent)?;

        info!(url = %transport.url(), "Created Bitlum client");

        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Create a client from environment variables
    ///
    /// Reads `BITLUM_URL`, `BITLUM_MACAROON` and `BITLUM_JWT`.
    pub fn from_env() -> ClientResult<Self> {
        Self::with_config(ClientConfig::from_env()?)
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Markets supported by the exchange
    pub fn supported_markets(&self) -> Vec<String> {
        SUPPORTED_MARKETS.iter().map(|m| m.to_string()).collect()
    }

    // ========================================================================
    // Market Endpoints
    // ========================================================================

    /// Get market endpoints
    pub fn market(&self) -> MarketEndpoints<'_> {
        MarketEndpoints::new(self.transport.as_ref())
    }

    /// Get market statistics over `period` seconds
    pub async fn markets(&self, markets: &[&str], period: i32) -> ClientResult<Vec<MarketStatus>> {
        self.market().markets(markets, period).await
    }

    /// Get last price and 24h change of each market
    pub async fn tickers(&self, markets: &[&str]) -> ClientResult<Vec<Ticker>> {
        self.market().tickers(markets).await
    }

    /// Get orderbook depth of a market
    pub async fn depth(&self, market: &str, limit: u32, interval: f64) -> ClientResult<Depth> {
        self.market().depth(market, limit, interval).await
    }

    /// Get latest completed deals
    pub async fn deals(&self, markets: &[&str], limit: i32) -> ClientResult<Vec<MarketDeal>> {
        self.market().deals(markets, limit).await
    }

    /// Get service network and lightning node info
    pub async fn info(&self) -> ClientResult<Info> {
        self.market().info().await
    }

    // ========================================================================
    // Account Endpoints
    // ========================================================================

    /// Get account endpoints
    pub fn account(&self) -> AccountEndpoints<'_> {
        AccountEndpoints::new(self.transport.as_ref())
    }

    pub async fn me(&self) -> ClientResult<Me> {
        self.account().me().await
    }

    pub async fn user_id(&self) -> ClientResult<String> {
        self.account().user_id().await
    }

    /// Get balances of the given assets
    pub async fn accounts(&self, assets: &[&str]) -> ClientResult<Vec<Account>> {
        self.account().accounts(assets).await
    }

    /// Get deposit history of an asset
    pub async fn deposits(&self, asset: &str, offset: i64, limit: i64) -> ClientResult<Vec<Deposit>> {
        self.account().deposits(asset, offset, limit).await
    }

    pub async fn issue_api_token(&self) -> ClientResult<String> {
        self.account().issue_api_token().await
    }

    // ========================================================================
    // Trading Endpoints
    // ========================================================================

    /// Get trading endpoints
    pub fn trading(&self) -> TradingEndpoints<'_> {
        TradingEndpoints::new(self.transport.as_ref())
    }

    /// Get an order by ID
    pub async fn order(&self, id: i64) -> ClientResult<Order> {
        self.trading().order(id).await
    }

    /// Place a bid market order
    pub async fn create_order(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.trading().create_order(market, amount).await
    }

    /// Place an ask market order
    pub async fn create_order_ask(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.trading().create_order_ask(market, amount).await
    }

    /// Place a bid market order
    pub async fn create_order_bid(&self, market: &str, amount: Decimal) -> ClientResult<Order> {
        self.trading().create_order_bid(market, amount).await
    }

    // ========================================================================
    // Funding Endpoints
    // ========================================================================

    /// Get funding endpoints
    pub fn funding(&self) -> FundingEndpoints<'_> {
        FundingEndpoints::new(self.transport.as_ref())
    }

    /// Withdraw funds to a blockchain address
    pub async fn withdraw(
        &self,
        asset: &str,
        amount: Decimal,
        address: &str,
    ) -> ClientResult<Withdrawal> {
        self.funding().withdraw(asset, amount, address).await
    }

    /// Check that a lightning node is reachable from the exchange
    pub async fn lightning_node_reachable(
        &self,
        asset: &str,
        identity_pubkey: &str,
    ) -> ClientResult<bool> {
        self.funding()
            .lightning_node_reachable(asset, identity_pubkey)
            .await
    }

    /// Create a lightning invoice for a deposit
    pub async fn lightning_create_invoice(
        &self,
        asset: &str,
        amount: Decimal,
    ) -> ClientResult<String> {
        self.funding().lightning_create_invoice(asset, amount).await
    }

    /// Withdraw funds by paying a lightning invoice
    pub async fn lightning_withdraw(&self, asset: &str, invoice: &str) -> ClientResult<Withdrawal> {
        self.funding().lightning_withdraw(asset, invoice).await
    }
}

impl fmt::Debug for BitlumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitlumClient")
            .field("transport", &self.transport)
            .finish()
    }
}

/// Client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    pub url: String,
    /// Hex encoded root macaroon
    pub macaroon: Option<String>,
    /// Bearer token, used instead of the macaroon when set
    pub jwt: Option<String>,
    /// Whole-request timeout; none by default
    pub timeout: Option<Duration>,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the endpoint at `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            macaroon: None,
            jwt: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Load the configuration from environment variables
    ///
    /// `BITLUM_URL` is required. `BITLUM_MACAROON` and `BITLUM_JWT` are
    /// picked up when set; credentials are validated when the client is
    /// built.
    pub fn from_env() -> ClientResult<Self> {
        let url = std::env::var(URL_ENV)
            .map_err(|_| ClientError::EnvVarNotSet(URL_ENV.to_string()))?;

        let mut config = Self::new(url);
        config.macaroon = std::env::var(MACAROON_ENV).ok();
        config.jwt = std::env::var(JWT_ENV).ok();
        Ok(config)
    }

    /// Set macaroon
    pub fn with_macaroon(mut self, macaroon: impl Into<String>) -> Self {
        self.macaroon = Some(macaroon.into());
        self
    }

    /// Set bearer token
    pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |s: &Option<String>| s.as_ref().map(|_| "[REDACTED]");

        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("macaroon", &redact(&self.macaroon))
            .field("jwt", &redact(&self.jwt))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
