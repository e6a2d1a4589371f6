//! Custom Axum extractors.
//!
//! - `ClefCredentials`: credentials established by the [`clef_middleware`](crate::clef_middleware)
//!
//! # Examples
//!
//! ```ignore
//! use axum::Json;
//! use clef_auth_web::{AppError, ClefCredentials};
//!
//! async fn login_callback(ClefCredentials(credentials): ClefCredentials) -> Json<Credentials> {
//!     Json(credentials)
//! }
//! ```

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use clef_auth::Credentials;

use crate::error::AppError;

/// Credentials produced by the Clef strategy for this request.
///
/// Login callbacks carry the user's Clef attributes. Logout webhooks carry
/// only the `id` of the user to sign out.
#[derive(Debug, Clone)]
pub struct ClefCredentials(pub Credentials);

#[async_trait]
impl<S> FromRequestParts<S> for ClefCredentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Credentials>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                tracing::error!("ClefCredentials used on a route without the clef_auth middleware");
                AppError::internal("An internal error occurred")
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use clef_auth::UserId;

    #[tokio::test]
    async fn test_reads_credentials_from_extensions() {
        let mut request = Request::builder().body(()).unwrap();
        request
            .extensions_mut()
            .insert(Credentials::from_id(UserId::new("123456")));
        let (mut parts, ()) = request.into_parts();

        let ClefCredentials(credentials) = ClefCredentials::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(credentials.id.unwrap().as_str(), "123456");
    }

    #[tokio::test]
    async fn test_missing_middleware_is_server_error() {
        let (mut parts, ()) = Request::builder().body(()).unwrap().into_parts();

        let error = ClefCredentials::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
