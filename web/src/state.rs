//! Shared state for the Clef middleware and login handlers.

use axum::extract::FromRef;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use clef_auth::{generate_state_parameter, AuthError, ClefApiClient, ClefClient, ClefStrategy};
use std::sync::Arc;

use crate::state_cookie;

/// State shared across every request.
///
/// Holds the strategy and the key used to encrypt the state cookie. Cloning
/// is cheap: the strategy sits behind an `Arc` and the key is small.
///
/// # Examples
///
/// ```ignore
/// use axum::{middleware, routing::get, Router};
/// use axum_extra::extract::cookie::Key;
/// use clef_auth::{ClefConfig, ClefStrategy};
/// use clef_auth_web::{clef_middleware, ClefState};
///
/// let strategy = ClefStrategy::from_config(ClefConfig::from_env()?)?;
/// let state = ClefState::new(strategy, Key::generate());
///
/// let app = Router::new()
///     .route("/login", get(login))
///     .route_layer(middleware::from_fn_with_state(state.clone(), clef_middleware))
///     .with_state(state);
/// ```
pub struct ClefState<C = ClefApiClient> {
    strategy: Arc<ClefStrategy<C>>,
    key: Key,
}

impl<C> Clone for ClefState<C> {
    fn clone(&self) -> Self {
        Self {
            strategy: Arc::clone(&self.strategy),
            key: self.key.clone(),
        }
    }
}

impl<C> std::fmt::Debug for ClefState<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClefState")
            .field("cookie_name", &self.strategy.config().cookie_name)
            .finish_non_exhaustive()
    }
}

impl<C: ClefClient> ClefState<C> {
    /// Create shared state from a strategy and a cookie encryption key.
    #[must_use]
    pub fn new(strategy: ClefStrategy<C>, key: Key) -> Self {
        Self::from_shared(Arc::new(strategy), key)
    }

    /// Create shared state from a strategy that is already shared.
    #[must_use]
    pub const fn from_shared(strategy: Arc<ClefStrategy<C>>, key: Key) -> Self {
        Self { strategy, key }
    }

    /// The strategy evaluated by the middleware.
    #[must_use]
    pub fn strategy(&self) -> &ClefStrategy<C> {
        &self.strategy
    }

    /// Generate a state parameter and store it in the encrypted state cookie.
    ///
    /// Returns the updated jar (to be returned from the handler) and the
    /// value to embed in the login page.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::RandomSource`] if no randomness is available.
    pub fn issue_state(
        &self,
        jar: PrivateCookieJar,
        size: Option<usize>,
    ) -> Result<(PrivateCookieJar, String), AuthError> {
        let state = generate_state_parameter(size)?;
        let cookie = state_cookie::build(self.strategy.config(), state.clone());

        tracing::debug!(cookie_name = %cookie.name(), "Issued Clef state parameter");

        Ok((jar.add(cookie), state))
    }

    /// Remove the state cookie.
    #[must_use]
    pub fn clear_state(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(state_cookie::removal(self.strategy.config()))
    }
}

impl<C> FromRef<ClefState<C>> for Key {
    fn from_ref(state: &ClefState<C>) -> Self {
        state.key.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clef_auth::{mocks::MockClefClient, ClefConfig};

    fn create_state() -> ClefState<MockClefClient> {
        let strategy =
            ClefStrategy::new(ClefConfig::new("app", "secret"), MockClefClient::new()).unwrap();
        ClefState::new(strategy, Key::generate())
    }

    #[test]
    fn test_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<ClefState<MockClefClient>>();
    }

    #[test]
    fn test_issue_state_stores_value_in_jar() {
        let state = create_state();
        let jar = PrivateCookieJar::new(state.key.clone());

        let (jar, value) = state.issue_state(jar, None).unwrap();

        assert_eq!(value.len(), 32);
        assert_eq!(jar.get("hapi-clef").unwrap().value(), value);
    }

    #[test]
    fn test_issue_state_honours_size() {
        let state = create_state();
        let jar = PrivateCookieJar::new(state.key.clone());

        let (_, value) = state.issue_state(jar, Some(3)).unwrap();

        assert_eq!(value.len(), 4);
    }

    #[test]
    fn test_clear_state() {
        let state = create_state();
        let jar = PrivateCookieJar::new(state.key.clone());

        let (jar, _) = state.issue_state(jar, None).unwrap();
        let jar = state.clear_state(jar);

        assert!(jar.get("hapi-clef").is_none());
    }

    #[test]
    fn test_debug_shows_cookie_name_only() {
        let rendered = format!("{:?}", create_state());

        assert!(rendered.contains("hapi-clef"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_key_from_state() {
        let state = create_state();
        let key = Key::from_ref(&state);

        assert_eq!(key.master(), state.key.master());
    }
}
