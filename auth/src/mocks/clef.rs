//! Mock Clef client for testing.

use crate::error::ProviderError;
use crate::providers::ClefClient;
use crate::state::{ClefUser, UserId};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How the mock answers exchange calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Answer immediately with the configured identity.
    Succeed,

    /// Answer immediately with [`ProviderError::Rejected`].
    Fail,

    /// Answer with the configured identity after a delay.
    Delay(Duration),

    /// Never answer.
    Hang,
}

/// Arguments the mock has been called with.
#[derive(Debug, Default)]
struct CallLog {
    login_codes: Vec<String>,
    logout_tokens: Vec<String>,
}

/// Mock Clef client.
///
/// Returns predefined identities and records every call. Clones share the
/// same call log.
#[derive(Debug, Clone)]
pub struct MockClefClient {
    behavior: MockBehavior,
    user: ClefUser,
    logout_user_id: UserId,
    calls: Arc<Mutex<CallLog>>,
}

impl MockClefClient {
    /// Mock that resolves every code to user `123456` and every logout
    /// token to ID `123456`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            behavior: MockBehavior::Succeed,
            user: ClefUser::new("123456"),
            logout_user_id: UserId::new("123456"),
            calls: Arc::new(Mutex::new(CallLog::default())),
        }
    }

    /// Mock that rejects every exchange.
    #[must_use]
    pub fn failing() -> Self {
        Self::new().with_behavior(MockBehavior::Fail)
    }

    /// Mock whose exchanges never complete.
    #[must_use]
    pub fn hanging() -> Self {
        Self::new().with_behavior(MockBehavior::Hang)
    }

    /// Set how the mock answers.
    #[must_use]
    pub fn with_behavior(mut self, behavior: MockBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    /// Set the identity returned for login codes.
    #[must_use]
    pub fn with_user(mut self, user: ClefUser) -> Self {
        self.user = user;
        self
    }

    /// Set the ID returned for logout tokens.
    #[must_use]
    pub fn with_logout_user_id(mut self, id: impl Into<String>) -> Self {
        self.logout_user_id = UserId::new(id);
        self
    }

    /// Codes passed to `exchange_login_code`, in call order.
    #[must_use]
    pub fn login_codes(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.login_codes.clone())
            .unwrap_or_default()
    }

    /// Tokens passed to `exchange_logout_token`, in call order.
    #[must_use]
    pub fn logout_tokens(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.logout_tokens.clone())
            .unwrap_or_default()
    }

    /// Total number of exchange calls of either kind.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.login_codes.len() + calls.logout_tokens.len())
            .unwrap_or_default()
    }

    async fn respond<T>(behavior: MockBehavior, value: T) -> Result<T, ProviderError> {
        match behavior {
            MockBehavior::Succeed => Ok(value),
            MockBehavior::Fail => Err(ProviderError::Rejected("mock failure".to_string())),
            MockBehavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(value)
            }
            MockBehavior::Hang => std::future::pending().await,
        }
    }
}

impl Default for MockClefClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ClefClient for MockClefClient {
    fn exchange_login_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<ClefUser, ProviderError>> + Send {
        if let Ok(mut calls) = self.calls.lock() {
            calls.login_codes.push(code.to_string());
        }

        Self::respond(self.behavior, self.user.clone())
    }

    fn exchange_logout_token(
        &self,
        logout_token: &str,
    ) -> impl Future<Output = Result<UserId, ProviderError>> + Send {
        if let Ok(mut calls) = self.calls.lock() {
            calls.logout_tokens.push(logout_token.to_string());
        }

        Self::respond(self.behavior, self.logout_user_id.clone())
    }
}
