//! State cookie construction.
//!
//! Maps [`CookieOptions`] onto the attributes of the cookie that carries the
//! state parameter between the login page and the Clef callback.

use axum_extra::extract::cookie::{Cookie, SameSite as CookieSameSite};
use clef_auth::{ClefConfig, CookieOptions, SameSite};

/// Build the cookie holding `value` under the configured name.
#[must_use]
pub fn build(config: &ClefConfig, value: String) -> Cookie<'static> {
    let options = &config.cookie_options;
    let mut cookie = with_options(Cookie::new(config.cookie_name.clone(), value), options);

    if let Some(max_age) = options.max_age {
        match time::Duration::try_from(max_age) {
            Ok(max_age) => cookie.set_max_age(max_age),
            Err(error) => {
                tracing::warn!(error = %error, "Cookie max-age out of range, using session cookie");
            }
        }
    }

    cookie
}

/// Build a cookie that, once removed from a jar, clears the state cookie.
///
/// Path and domain must match the issued cookie or the browser keeps it.
#[must_use]
pub fn removal(config: &ClefConfig) -> Cookie<'static> {
    with_options(
        Cookie::new(config.cookie_name.clone(), String::new()),
        &config.cookie_options,
    )
}

fn with_options(mut cookie: Cookie<'static>, options: &CookieOptions) -> Cookie<'static> {
    cookie.set_path(options.path.clone());
    if let Some(domain) = &options.domain {
        cookie.set_domain(domain.clone());
    }
    cookie.set_secure(options.secure);
    cookie.set_http_only(options.http_only);
    cookie.set_same_site(same_site(options.same_site));
    cookie
}

const fn same_site(same_site: SameSite) -> CookieSameSite {
    match same_site {
        SameSite::Strict => CookieSameSite::Strict,
        SameSite::Lax => CookieSameSite::Lax,
        SameSite::None => CookieSameSite::None,
    }
}
