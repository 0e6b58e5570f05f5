//! Request credentials for the Bitlum API
//!
//! Two kinds of credentials are supported:
//!
//! - [`BearerToken`] - a static JWT sent verbatim with every request
//! - [`MacaroonAuth`] - a root macaroon that is attenuated per request with
//!   a fresh nonce and timestamp, so a captured header cannot be replayed
//!
//! # Security
//!
//! Tokens and macaroon signatures are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use chrono::{SecondsFormat, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::error::{AuthError, AuthResult};
use crate::macaroon::Macaroon;

/// Environment variable holding the hex encoded root macaroon
pub const MACAROON_ENV: &str = "BITLUM_MACAROON";

/// Environment variable holding the bearer token
pub const JWT_ENV: &str = "BITLUM_JWT";

/// Produces the `Authorization` header value for a request
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// Header value for the next request, or `None` to send it anonymously
    ///
    /// `authenticated` tells whether the operation requires the user's
    /// identity; public operations pass `false`.
    fn authorization(&self, authenticated: bool) -> AuthResult<Option<String>>;
}

/// Static bearer token (JWT)
pub struct BearerToken {
    token: SecretString,
}

impl BearerToken {
    pub fn new(token: impl Into<String>) -> AuthResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(Self {
            token: SecretString::from(token),
        })
    }
}

impl Authenticator for BearerToken {
    fn authorization(&self, _authenticated: bool) -> AuthResult<Option<String>> {
        Ok(Some(format!("Bearer {}", self.token.expose_secret())))
    }
}

impl Clone for BearerToken {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.token.expose_secret().to_string()),
        }
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerToken")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Root macaroon with a per-instance nonce counter
///
/// Every authenticated request gets a derived macaroon carrying two extra
/// first-party caveats, `nonce <n>` and `time <now>`. Nonces start at 1 and
/// strictly increase for the lifetime of the instance. A nonce is consumed
/// even if deriving the token afterwards fails.
#[derive(Debug)]
pub struct MacaroonAuth {
    root: Macaroon,
    nonce: AtomicU64,
}

impl MacaroonAuth {
    /// Decode a root macaroon from its hex (or base64) form
    pub fn new(macaroon: &str) -> AuthResult<Self> {
        Ok(Self::from_macaroon(Macaroon::decode(macaroon)?))
    }

    pub fn from_macaroon(root: Macaroon) -> Self {
        Self {
            root,
            nonce: AtomicU64::new(0),
        }
    }

    /// The undecorated root macaroon
    pub fn root(&self) -> &Macaroon {
        &self.root
    }

    /// Reserve the next nonce
    pub fn next_nonce(&self) -> AuthResult<u64> {
        self.nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_add(1))
            .map(|previous| previous + 1)
            .map_err(|_| AuthError::Derivation("nonce counter exhausted".to_string()))
    }

    /// Most recently reserved nonce (0 before the first request)
    pub fn last_nonce(&self) -> u64 {
        self.nonce.load(Ordering::SeqCst)
    }

    /// Derive a single-use macaroon for the next request
    pub fn derive(&self) -> AuthResult<Macaroon> {
        let nonce = self.next_nonce()?;
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);

        let mut macaroon = self.root.clone();
        macaroon.add_first_party_caveat(format!("nonce {}", nonce))?;
        macaroon.add_first_party_caveat(format!("time {}", now))?;

        trace!(nonce, "Derived request macaroon");
        Ok(macaroon)
    }
}

impl Authenticator for MacaroonAuth {
    fn authorization(&self, authenticated: bool) -> AuthResult<Option<String>> {
        if !authenticated {
            return Ok(None);
        }

        let macaroon = self.derive()?;
        Ok(Some(format!("Macaroon {}", macaroon.encode_hex())))
    }
}

/// Credentials selected from a macaroon and/or a bearer token
#[derive(Debug)]
pub enum Credentials {
    Bearer(BearerToken),
    Macaroon(MacaroonAuth),
}

impl Credentials {
    /// Build credentials from the optional macaroon and bearer token
    ///
    /// Empty strings count as absent. A supplied macaroon is always decoded,
    /// so a malformed one is rejected even when a bearer token takes
    /// precedence over it.
    pub fn new(macaroon: Option<&str>, jwt: Option<&str>) -> AuthResult<Self> {
        let macaroon = macaroon
            .filter(|m| !m.is_empty())
            .map(MacaroonAuth::new)
            .transpose()?;

        match (jwt.filter(|t| !t.is_empty()), macaroon) {
            (Some(jwt), _) => Self::bearer(jwt),
            (None, Some(macaroon)) => Ok(Self::Macaroon(macaroon)),
            (None, None) => Err(AuthError::MissingCredentials),
        }
    }

    pub fn bearer(token: impl Into<String>) -> AuthResult<Self> {
        BearerToken::new(token).map(Self::Bearer)
    }

    pub fn macaroon(macaroon: &str) -> AuthResult<Self> {
        MacaroonAuth::new(macaroon).map(Self::Macaroon)
    }

    /// Create credentials from environment variables
    ///
    /// Reads `BITLUM_MACAROON` and `BITLUM_JWT`; at least one must be set.
    pub fn from_env() -> AuthResult<Self> {
        let macaroon = std::env::var(MACAROON_ENV).ok();
        let jwt = std::env::var(JWT_ENV).ok();

        if macaroon.is_none() && jwt.is_none() {
            return Err(AuthError::EnvVarNotSet(format!(
                "{} or {}",
                MACAROON_ENV, JWT_ENV
            )));
        }

        Self::new(macaroon.as_deref(), jwt.as_deref())
    }

    pub fn is_bearer(&self) -> bool {
        matches!(self, Self::Bearer(_))
    }
}

impl Authenticator for Credentials {
    fn authorization(&self, authenticated: bool) -> AuthResult<Option<String>> {
        match self {
            Self::Bearer(token) => token.authorization(authenticated),
            Self::Macaroon(macaroon) => macaroon.authorization(authenticated),
        }
    }
}
