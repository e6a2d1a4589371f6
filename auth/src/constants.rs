//! Authentication constants.

use std::time::Duration;

/// Number of random bytes in a state parameter when no size is given.
pub const DEFAULT_STATE_SIZE: usize = 24;

/// Cookie holding the state parameter when no name is configured.
pub const DEFAULT_COOKIE_NAME: &str = "hapi-clef";

/// Deadline for a single Clef exchange in strategies built from config.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(10);

/// Production Clef API root.
pub const CLEF_API_BASE_URL: &str = "https://clef.io/api/v1";

/// Request field names exchanged with the browser and with Clef.
pub mod fields {
    /// Query parameter echoing the state token.
    pub const STATE: &str = "state";

    /// Query parameter carrying the authorization code.
    pub const CODE: &str = "code";

    /// Body field carrying the logout token.
    pub const LOGOUT_TOKEN: &str = "logout_token";
}

/// Environment variables read by [`ClefConfig::from_env`](crate::config::ClefConfig::from_env).
pub mod env {
    /// Application ID issued by Clef.
    pub const APP_ID: &str = "CLEF_APP_ID";

    /// Application secret issued by Clef.
    pub const APP_SECRET: &str = "CLEF_APP_SECRET";

    /// Optional override for the state cookie name.
    pub const COOKIE_NAME: &str = "CLEF_COOKIE_NAME";

    /// Optional `true`/`false` override for the cookie `Secure` flag.
    pub const COOKIE_SECURE: &str = "CLEF_COOKIE_SECURE";
}
