//! Error types for Clef authentication.
//!
//! Only two failures are ever visible to an end user: `"State mismatch"` and
//! `"Clef error"`. Everything the Clef API reports is a [`ProviderError`],
//! which is logged by the strategy and then collapsed into
//! [`AuthError::ProviderExchange`].

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Error taxonomy for the Clef strategy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    // ═══════════════════════════════════════════════════════════
    // Authentication Errors (401)
    // ═══════════════════════════════════════════════════════════

    /// The `state` query parameter or the state cookie is missing, or the
    /// two values differ.
    #[error("State mismatch")]
    StateMismatch,

    /// The Clef API failed to exchange a login code or logout token.
    ///
    /// The underlying [`ProviderError`] is logged, never carried here.
    #[error("Clef error")]
    ProviderExchange,

    // ═══════════════════════════════════════════════════════════
    // Setup Errors
    // ═══════════════════════════════════════════════════════════

    /// Strategy configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// The operating system's secure random source failed.
    #[error("Secure random source failed: {0}")]
    RandomSource(String),
}

impl AuthError {
    /// Returns `true` if this error should be reported as HTTP 401.
    ///
    /// # Examples
    ///
    /// ```
    /// # use clef_auth::AuthError;
    /// assert!(AuthError::StateMismatch.is_unauthorized());
    /// assert!(AuthError::ProviderExchange.is_unauthorized());
    /// assert!(!AuthError::RandomSource("unavailable".to_string()).is_unauthorized());
    /// ```
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::StateMismatch | Self::ProviderExchange)
    }
}

/// Configuration validation failures.
///
/// These are fatal at setup: a strategy is never constructed from an
/// invalid configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// The cookie name is not a valid RFC 6265 token.
    #[error("invalid cookie name {0:?}")]
    InvalidCookieName(String),

    /// An environment variable holds an unparseable value.
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnvVar {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Failures reported by a [`ClefClient`](crate::providers::ClefClient).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Clef request failed: {0}")]
    Transport(String),

    /// Clef answered but refused the exchange.
    #[error("Clef rejected the request: {0}")]
    Rejected(String),

    /// Clef answered with a body we could not understand.
    #[error("Malformed Clef response: {0}")]
    MalformedResponse(String),

    /// The exchange did not finish before the configured deadline.
    #[error("Clef exchange timed out")]
    Timeout,
}
