//! # Clef Authentication Strategy
//!
//! Passwordless login through [Clef](https://getclef.com) for any request
//! pipeline.
//!
//! ## Flow
//!
//! ```text
//! login page ──► generate_state_parameter() ──► cookie + Clef button data-state
//!                                                         │
//!       Clef redirects back: /login?code=C&state=S ◄──────┘
//!                 │
//!                 ▼
//! ClefStrategy::evaluate ── state == cookie? ── no ──► AuthError::StateMismatch
//!                 │ yes
//!                 ▼
//!         ClefClient::exchange_login_code(C) ── err ──► AuthError::ProviderExchange
//!                 │ ok
//!                 ▼
//!            Credentials
//! ```
//!
//! Clef logs users out by posting a `logout_token`; a `POST` is exchanged
//! through [`ClefClient::exchange_logout_token`](providers::ClefClient::exchange_logout_token).
//!
//! ## Example
//!
//! ```rust
//! use clef_auth::mocks::MockClefClient;
//! use clef_auth::{AuthRequest, ClefConfig, ClefStrategy};
//!
//! # tokio_test::block_on(async {
//! let config = ClefConfig::new("app-id", "app-secret");
//! let strategy = ClefStrategy::new(config, MockClefClient::new()).unwrap();
//!
//! let state = clef_auth::generate_state_parameter(None).unwrap();
//! let request = AuthRequest::get()
//!     .with_query("state", state.clone())
//!     .with_query("code", "code-from-clef")
//!     .with_cookie("hapi-clef", state);
//!
//! let credentials = strategy.evaluate(&request).await.unwrap();
//! assert_eq!(credentials.id.unwrap().as_str(), "123456");
//! # });
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod constants;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mocks;
pub mod providers;
pub mod state;
pub mod strategy;
pub mod utils;

// Re-export main types for convenience
pub use config::{ClefConfig, CookieOptions, SameSite};
pub use error::{AuthError, ConfigError, ProviderError, Result};
pub use providers::{ClefApiClient, ClefClient};
pub use state::{AuthRequest, ClefUser, Credentials, LogoutPayload, UserId};
pub use strategy::ClefStrategy;
pub use utils::generate_state_parameter;
