//! Axum middleware that runs the Clef strategy in front of a route.
//!
//! # Flow
//!
//! 1. **Collect** query parameters and the decrypted state cookie
//! 2. **Buffer** the body of POST requests and read the logout token
//! 3. **Evaluate** the strategy
//! 4. **Store** the resulting [`Credentials`] in request extensions
//! 5. **Reject** with `401` and the strategy's message on failure
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware, routing::{get, post}, Router};
//! use clef_auth_web::{clef_middleware, ClefCredentials};
//!
//! let app = Router::new()
//!     .route("/login", get(login_callback))
//!     .route("/logout", post(logout_webhook))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), clef_middleware))
//!     .with_state(state);
//! ```

use axum::{
    body::{self, Body},
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use clef_auth::{AuthRequest, ClefClient, LogoutPayload};
use std::collections::{HashMap, HashSet};
use tracing::Instrument;

use crate::{error::AppError, state::ClefState};

/// Largest logout body that will be read.
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024;

/// Authenticate the request with the Clef strategy.
///
/// On success the handler can read the credentials through
/// [`ClefCredentials`](crate::ClefCredentials). The body of a POST request
/// is restored before the handler runs.
///
/// # Errors
///
/// Returns `401` with `State mismatch` or `Clef error` when the strategy
/// rejects the request.
pub async fn clef_middleware<C>(
    State(state): State<ClefState<C>>,
    jar: PrivateCookieJar,
    request: Request,
    next: Next,
) -> Result<Response, AppError>
where
    C: ClefClient + 'static,
{
    let span = tracing::info_span!(
        "clef_auth",
        method = %request.method(),
        path = %request.uri().path(),
    );

    async move {
        let (parts, body) = request.into_parts();
        let cookie_name = &state.strategy().config().cookie_name;

        let mut auth_request = AuthRequest::new(parts.method.clone());
        auth_request.query = parts
            .uri
            .query()
            .map(parse_query)
            .unwrap_or_default();
        if let Some(cookie) = jar.get(cookie_name) {
            auth_request = auth_request.with_cookie(cookie_name.clone(), cookie.value());
        }

        let body = if parts.method == Method::POST {
            let bytes = match body::to_bytes(body, MAX_PAYLOAD_BYTES).await {
                Ok(bytes) => bytes,
                Err(error) => {
                    tracing::warn!(error = %error, "Failed to read logout payload");
                    body::Bytes::new()
                }
            };
            let content_type = parts
                .headers
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok());
            auth_request = auth_request.with_payload(parse_payload(content_type, &bytes));
            Body::from(bytes)
        } else {
            body
        };

        let credentials = state.strategy().evaluate(&auth_request).await?;

        let mut request = Request::from_parts(parts, body);
        request.extensions_mut().insert(credentials);

        Ok(next.run(request).await)
    }
    .instrument(span)
    .await
}

/// Keys given more than once are dropped: a repeated `state` must never
/// match the cookie, so it is treated as absent.
fn parse_query(query: &str) -> HashMap<String, String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_else(|error| {
        tracing::debug!(error = %error, "Ignoring malformed query string");
        Vec::new()
    });

    let mut params = HashMap::with_capacity(pairs.len());
    let mut repeated = HashSet::new();
    for (name, value) in pairs {
        if repeated.contains(&name) {
            continue;
        }
        if params.remove(&name).is_some() {
            tracing::debug!(param = %name, "Ignoring repeated query parameter");
            repeated.insert(name);
            continue;
        }
        params.insert(name, value);
    }

    params
}

/// Form bodies are decoded as such; anything else is treated as JSON.
/// An unreadable body yields an empty payload, which the strategy rejects.
fn parse_payload(content_type: Option<&str>, bytes: &[u8]) -> LogoutPayload {
    if bytes.is_empty() {
        return LogoutPayload::default();
    }

    let is_form = content_type.is_some_and(|value| {
        value
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
    });

    let parsed = if is_form {
        serde_urlencoded::from_bytes(bytes).map_err(|error| error.to_string())
    } else {
        serde_json::from_slice(bytes).map_err(|error| error.to_string())
    };

    parsed.unwrap_or_else(|error| {
        tracing::debug!(error = %error, "Ignoring malformed logout payload");
        LogoutPayload::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let query = parse_query("state=a%2Bb%3D&code=xyz");

        assert_eq!(query.get("state").map(String::as_str), Some("a+b="));
        assert_eq!(query.get("code").map(String::as_str), Some("xyz"));
    }

    #[test]
    fn test_parse_query_drops_repeated_keys() {
        let query = parse_query("code=c&state=evil&state=abcdef&state=again");

        assert_eq!(query.get("state"), None);
        assert_eq!(query.get("code").map(String::as_str), Some("c"));
        assert_eq!(query.len(), 1);
    }

    #[test]
    fn test_parse_json_payload() {
        let payload = parse_payload(Some("application/json"), br#"{"logout_token":"abcdef"}"#);
        assert_eq!(payload, LogoutPayload::new("abcdef"));
    }

    #[test]
    fn test_parse_form_payload() {
        let payload = parse_payload(
            Some("application/x-www-form-urlencoded; charset=utf-8"),
            b"logout_token=abcdef",
        );
        assert_eq!(payload, LogoutPayload::new("abcdef"));
    }

    #[test]
    fn test_parse_payload_without_content_type() {
        let payload = parse_payload(None, br#"{"logout_token":"abcdef"}"#);
        assert_eq!(payload, LogoutPayload::new("abcdef"));
    }

    #[test]
    fn test_malformed_payload_is_empty() {
        assert_eq!(
            parse_payload(Some("application/json"), b"not json"),
            LogoutPayload::default()
        );
        assert_eq!(parse_payload(None, b""), LogoutPayload::default());
    }
}
