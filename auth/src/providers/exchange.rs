//! Clef exchange trait.

use crate::error::ProviderError;
use crate::state::{ClefUser, UserId};
use std::future::Future;

/// Exchanges Clef-issued values for user identity.
///
/// This trait abstracts over the Clef API so the strategy can be driven by
/// the production [`ClefApiClient`](super::ClefApiClient) or by a test
/// double. Both operations may be slow and may fail; neither is retried by
/// the strategy.
pub trait ClefClient: Send + Sync {
    /// Exchange the authorization code from a login redirect for the
    /// user's identity.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Clef rejects the code
    /// - Response is malformed
    fn exchange_login_code(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<ClefUser, ProviderError>> + Send;

    /// Exchange a logout token posted by Clef for the ID of the user who
    /// logged out.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - Clef rejects the token
    /// - Response is malformed
    fn exchange_logout_token(
        &self,
        logout_token: &str,
    ) -> impl Future<Output = Result<UserId, ProviderError>> + Send;
}
