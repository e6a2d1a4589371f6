//! Clef authentication strategy.
//!
//! Implements the request evaluation state machine:
//!
//! ```text
//! GET  /login?code=..&state=S  + cookie S  → exchange_login_code   → Credentials(user)
//! GET  /login?state=S          + cookie T  → StateMismatch (no Clef call)
//! POST /logout {logout_token}              → exchange_logout_token → Credentials { id }
//! ```
//!
//! Pipelines with separate authenticate and payload hooks call
//! [`ClefStrategy::authenticate`] and then [`ClefStrategy::payload`]; everything
//! else calls [`ClefStrategy::evaluate`].

use crate::config::ClefConfig;
use crate::constants::DEFAULT_EXCHANGE_TIMEOUT;
use crate::error::{AuthError, ProviderError, Result};
use crate::providers::{ClefApiClient, ClefClient};
use crate::state::{AuthRequest, Credentials, LogoutPayload};
use http::Method;
use std::future::Future;
use std::time::Duration;

/// Authentication strategy backed by Clef.
///
/// Holds the validated configuration and the exchange client. It has no
/// mutable state, so one instance (usually behind an `Arc`) serves every
/// request concurrently.
#[derive(Debug)]
pub struct ClefStrategy<C = ClefApiClient> {
    config: ClefConfig,
    client: C,
    exchange_timeout: Option<Duration>,
}

impl ClefStrategy<ClefApiClient> {
    /// Build a strategy that talks to the Clef API.
    ///
    /// Exchanges are bounded by [`DEFAULT_EXCHANGE_TIMEOUT`]; override it
    /// with [`with_exchange_timeout`](Self::with_exchange_timeout).
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if the configuration is invalid.
    pub fn from_config(config: ClefConfig) -> Result<Self> {
        let client = ClefApiClient::initialize(config.app_id.clone(), &config.app_secret);
        Ok(Self::new(config, client)?.with_exchange_timeout(DEFAULT_EXCHANGE_TIMEOUT))
    }
}

impl<C> ClefStrategy<C> {
    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &ClefConfig {
        &self.config
    }

    /// Deadline applied to each exchange, if any.
    #[must_use]
    pub const fn exchange_timeout(&self) -> Option<Duration> {
        self.exchange_timeout
    }
}

impl<C: ClefClient> ClefStrategy<C> {
    /// Build a strategy with a custom exchange client.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] if the configuration is invalid.
    /// No strategy exists until this succeeds.
    pub fn new(config: ClefConfig, client: C) -> Result<Self> {
        config.validate()?;

        tracing::debug!(
            app_id = %config.app_id,
            cookie_name = %config.cookie_name,
            "Clef strategy configured"
        );

        Ok(Self {
            config,
            client,
            exchange_timeout: None,
        })
    }

    /// Fail exchanges that take longer than `timeout`.
    ///
    /// Strategies built with [`new`](Self::new) have no deadline: a stalled
    /// Clef call stalls its request until the transport gives up.
    #[must_use]
    pub const fn with_exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = Some(timeout);
        self
    }

    /// Authenticate phase.
    ///
    /// A `POST` is a logout: it yields empty credentials and leaves the
    /// exchange to [`payload`](Self::payload). Every other method is a login
    /// callback.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StateMismatch`] or [`AuthError::ProviderExchange`]
    /// for a failed login.
    pub async fn authenticate(&self, request: &AuthRequest) -> Result<Credentials> {
        if request.method == Method::POST {
            return Ok(Credentials::empty());
        }

        self.login(request).await
    }

    /// Payload phase of a logout: exchange the posted logout token.
    ///
    /// No state comparison happens here.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ProviderExchange`] if the token is missing or
    /// Clef cannot resolve it.
    pub async fn payload(&self, payload: &LogoutPayload) -> Result<Credentials> {
        let Some(logout_token) = payload.logout_token.as_deref() else {
            tracing::error!("Clef logout request has no logout_token");
            return Err(AuthError::ProviderExchange);
        };

        let user_id = self
            .exchange("logout", self.client.exchange_logout_token(logout_token))
            .await?;

        Ok(Credentials::from_id(user_id))
    }

    /// Both phases in one call.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::StateMismatch`] or [`AuthError::ProviderExchange`].
    pub async fn evaluate(&self, request: &AuthRequest) -> Result<Credentials> {
        if request.method == Method::POST {
            let payload = request.payload.clone().unwrap_or_default();
            return self.payload(&payload).await;
        }

        self.login(request).await
    }

    async fn login(&self, request: &AuthRequest) -> Result<Credentials> {
        self.verify_state(request)?;

        let code = request.code_param().unwrap_or_default();
        let user = self
            .exchange("login", self.client.exchange_login_code(code))
            .await?;

        Ok(Credentials::from(user))
    }

    /// Query `state` and the state cookie must both be present, non-empty
    /// and equal.
    fn verify_state(&self, request: &AuthRequest) -> Result<()> {
        let query_state = request.state_param().filter(|s| !s.is_empty());
        let cookie_state = request
            .cookie(&self.config.cookie_name)
            .filter(|s| !s.is_empty());

        match (query_state, cookie_state) {
            (Some(query), Some(cookie))
                if constant_time_eq::constant_time_eq(query.as_bytes(), cookie.as_bytes()) =>
            {
                Ok(())
            }
            _ => {
                tracing::warn!(
                    has_query_state = query_state.is_some(),
                    has_cookie_state = cookie_state.is_some(),
                    "Clef state mismatch"
                );
                Err(AuthError::StateMismatch)
            }
        }
    }

    /// Await one exchange, logging and collapsing any failure.
    async fn exchange<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = std::result::Result<T, ProviderError>>,
    ) -> Result<T> {
        let outcome = match self.exchange_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or(Err(ProviderError::Timeout)),
            None => call.await,
        };

        outcome.map_err(|error| {
            tracing::error!(operation, error = %error, "Clef exchange failed");
            AuthError::ProviderExchange
        })
    }
}
