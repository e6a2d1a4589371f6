//! Strategy configuration.
//!
//! A [`ClefConfig`] is built once at setup, validated by
//! [`ClefStrategy::new`](crate::strategy::ClefStrategy::new), and only read
//! afterwards.

use crate::constants::{env, DEFAULT_COOKIE_NAME};
use crate::error::ConfigError;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Clef strategy configuration.
#[derive(Debug)]
pub struct ClefConfig {
    /// Application ID from the Clef dashboard.
    pub app_id: String,

    /// Application secret from the Clef dashboard.
    pub app_secret: SecretString,

    /// Name of the cookie holding the state parameter.
    ///
    /// Default: `"hapi-clef"`
    pub cookie_name: String,

    /// Attributes for the state cookie.
    pub cookie_options: CookieOptions,
}

impl ClefConfig {
    /// Create a configuration with the default cookie name and options.
    #[must_use]
    pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_secret: SecretString::from(app_secret.into()),
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            cookie_options: CookieOptions::default(),
        }
    }

    /// Set the state cookie name.
    #[must_use]
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the state cookie attributes.
    #[must_use]
    pub fn with_cookie_options(mut self, options: CookieOptions) -> Self {
        self.cookie_options = options;
        self
    }

    /// Load configuration from `CLEF_APP_ID`, `CLEF_APP_SECRET` and the
    /// optional `CLEF_COOKIE_NAME` / `CLEF_COOKIE_SECURE`.
    ///
    /// The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required variable is unset or empty, or
    /// an optional one cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_id = std::env::var(env::APP_ID).unwrap_or_default();
        let app_secret = std::env::var(env::APP_SECRET).unwrap_or_default();

        let mut config = Self::new(app_id, app_secret);

        if let Ok(name) = std::env::var(env::COOKIE_NAME) {
            config.cookie_name = name;
        }

        if let Ok(raw) = std::env::var(env::COOKIE_SECURE) {
            let secure = raw
                .trim()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidEnvVar {
                    name: env::COOKIE_SECURE,
                    value: raw.clone(),
                })?;
            config.cookie_options.secure = secure;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check required fields and the cookie name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for an empty app ID or secret,
    /// and [`ConfigError::InvalidCookieName`] for a name that is not a
    /// cookie token.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app_id.trim().is_empty() {
            return Err(ConfigError::MissingField("app_id"));
        }

        if self.app_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingField("app_secret"));
        }

        if !is_cookie_token(&self.cookie_name) {
            return Err(ConfigError::InvalidCookieName(self.cookie_name.clone()));
        }

        Ok(())
    }
}

/// RFC 6265 `token`: visible ASCII minus separators.
fn is_cookie_token(name: &str) -> bool {
    const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b))
}

/// `SameSite` attribute for the state cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    /// Only sent on same-site requests.
    Strict,

    /// Sent on top-level navigations from other sites (the Clef redirect).
    #[default]
    Lax,

    /// Always sent; requires `Secure`.
    None,
}

/// Attributes applied when the state cookie is written.
///
/// The evaluator never looks at these; they are consumed by whatever layer
/// stores the cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    /// Cookie path.
    ///
    /// Default: `/`
    pub path: String,

    /// Cookie domain. Host-only when `None`.
    pub domain: Option<String>,

    /// Only send over HTTPS.
    ///
    /// Default: true
    pub secure: bool,

    /// Hide from client-side scripts.
    ///
    /// Default: true
    pub http_only: bool,

    /// Cross-site sending policy.
    ///
    /// Default: `Lax`
    pub same_site: SameSite,

    /// Lifetime of the cookie. Session cookie when `None`.
    pub max_age: Option<Duration>,
}

impl CookieOptions {
    /// Set the cookie path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the cookie domain.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Set the `Secure` flag.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the `HttpOnly` flag.
    #[must_use]
    pub const fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Set the `SameSite` policy.
    #[must_use]
    pub const fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Set the cookie lifetime.
    #[must_use]
    pub const fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ClefConfig::new("app", "secret");

        assert_eq!(config.app_id, "app");
        assert_eq!(config.cookie_name, "hapi-clef");
        assert_eq!(config.cookie_options, CookieOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let options = CookieOptions::default()
            .with_path("/auth")
            .with_domain("example.com")
            .with_secure(false)
            .with_http_only(false)
            .with_same_site(SameSite::Strict)
            .with_max_age(Duration::from_secs(600));

        let config = ClefConfig::new("app", "secret")
            .with_cookie_name("clef-state")
            .with_cookie_options(options.clone());

        assert_eq!(config.cookie_name, "clef-state");
        assert_eq!(config.cookie_options, options);
        assert_eq!(config.cookie_options.domain.as_deref(), Some("example.com"));
        assert_eq!(config.cookie_options.max_age, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_missing_app_id() {
        let config = ClefConfig::new("", "secret");
        assert_eq!(config.validate(), Err(ConfigError::MissingField("app_id")));
    }

    #[test]
    fn test_missing_app_secret() {
        let config = ClefConfig::new("app", "  ");
        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingField("app_secret"))
        );
    }

    #[test]
    fn test_invalid_cookie_names() {
        for name in ["", "has space", "semi;colon", "quote\"", "é"] {
            let config = ClefConfig::new("app", "secret").with_cookie_name(name);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidCookieName(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let config = ClefConfig::new("app", "d0d0ba5ef23dc134305125627c45677c");
        let debug = format!("{config:?}");
        assert!(!debug.contains("d0d0ba5ef23dc134305125627c45677c"));
    }

    #[test]
    fn test_from_env() {
        temp_env::with_vars(
            [
                (env::APP_ID, Some("4f4baa300eae6a7532cc60d06b49e0b9")),
                (env::APP_SECRET, Some("d0d0ba5ef23dc134305125627c45677c")),
                (env::COOKIE_NAME, Some("clef-state")),
                (env::COOKIE_SECURE, Some("false")),
            ],
            || {
                let config = ClefConfig::from_env().unwrap();
                assert_eq!(config.app_id, "4f4baa300eae6a7532cc60d06b49e0b9");
                assert_eq!(
                    config.app_secret.expose_secret(),
                    "d0d0ba5ef23dc134305125627c45677c"
                );
                assert_eq!(config.cookie_name, "clef-state");
                assert!(!config.cookie_options.secure);
            },
        );
    }

    #[test]
    fn test_from_env_missing_secret() {
        temp_env::with_vars(
            [
                (env::APP_ID, Some("app")),
                (env::APP_SECRET, None::<&str>),
                (env::COOKIE_NAME, None),
                (env::COOKIE_SECURE, None),
            ],
            || {
                assert_eq!(
                    ClefConfig::from_env().unwrap_err(),
                    ConfigError::MissingField("app_secret")
                );
            },
        );
    }

    #[test]
    fn test_from_env_bad_secure_flag() {
        temp_env::with_vars(
            [
                (env::APP_ID, Some("app")),
                (env::APP_SECRET, Some("secret")),
                (env::COOKIE_NAME, None),
                (env::COOKIE_SECURE, Some("sometimes")),
            ],
            || {
                assert!(matches!(
                    ClefConfig::from_env(),
                    Err(ConfigError::InvalidEnvVar { name: env::COOKIE_SECURE, .. })
                ));
            },
        );
    }
}
