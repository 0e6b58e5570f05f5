//! HTTP transport for GraphQL requests
//!
//! A [`Transport`] performs exactly one POST per call and hands back the raw
//! response body. Interpreting the GraphQL envelope is left to the caller,
//! which keeps the transport trivially replaceable in tests.

use async_trait::async_trait;
use bitlum_auth::{AuthError, Authenticator};
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{redirect, Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::envelope::Request;
use crate::error::{ClientError, ClientResult};

/// Sends a GraphQL request and returns the raw response body
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Perform a single request
    ///
    /// `authenticated` is passed to the credentials, which decide whether an
    /// `Authorization` header is attached.
    async fn execute(&self, authenticated: bool, request: &Request) -> ClientResult<Vec<u8>>;
}

/// Transport talking to the exchange's GraphQL endpoint over HTTP
///
/// Cloning is cheap; clones share the connection pool and credentials.
/// Redirects are never followed and no timeout applies unless one is set.
#[derive(Clone)]
pub struct GraphQlTransport {
    http_client: Client,
    url: String,
    authenticator: Arc<dyn Authenticator>,
}

impl GraphQlTransport {
    pub fn new(
        url: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> ClientResult<Self> {
        let mut builder = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(user_agent);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http_client = builder.build().map_err(ClientError::HttpClient)?;
        Ok(Self::with_http_client(url, authenticator, http_client))
    }

    /// Use a preconfigured HTTP client
    pub fn with_http_client(
        url: impl Into<String>,
        authenticator: Arc<dyn Authenticator>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            url: url.into(),
            authenticator,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn authorization_header(&self, authenticated: bool) -> ClientResult<Option<HeaderValue>> {
        let Some(value) = self.authenticator.authorization(authenticated)? else {
            return Ok(None);
        };

        let mut header = HeaderValue::from_str(&value).map_err(|_| {
            AuthError::InvalidCredential("credential is not a valid header value".to_string())
        })?;
        header.set_sensitive(true);
        Ok(Some(header))
    }
}

#[async_trait]
impl Transport for GraphQlTransport {
    #[instrument(skip(self, request))]
    async fn execute(&self, authenticated: bool, request: &Request) -> ClientResult<Vec<u8>> {
        let body = request.to_json()?;

        let mut http_request = self
            .http_client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(header) = self.authorization_header(authenticated)? {
            http_request = http_request.header(AUTHORIZATION, header);
        }

        debug!(bytes = body.len(), "Sending GraphQL request");

        let response = http_request
            .body(body)
            .send()
            .await
            .map_err(ClientError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!(%status, "Unexpected response status");
            return Err(ClientError::HttpStatus { status });
        }

        let body = response.bytes().await.map_err(ClientError::BodyRead)?;
        debug!(bytes = body.len(), "Received GraphQL response");

        Ok(body.to_vec())
    }
}

impl fmt::Debug for GraphQlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQlTransport")
            .field("url", &self.url)
            .field("authenticator", &self.authenticator)
            .finish()
    }
}
