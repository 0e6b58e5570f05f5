//! Error types for authentication operations

/// Errors that can occur while building or deriving credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credential could not be decoded at construction time
    #[error("Invalid credentials: {0}")]
    InvalidCredential(String),

    /// Per-request token could not be derived from the root credential
    #[error("Failed to derive request token: {0}")]
    Derivation(String),

    /// Neither a macaroon nor a bearer token was supplied
    #[error("Either a macaroon or a bearer token is required")]
    MissingCredentials,

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
