//! Axum integration for the Clef authentication strategy.
//!
//! The strategy in [`clef_auth`](::clef_auth) decides whether a request is
//! authenticated; this crate wires it into an Axum router.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Axum (this crate)            │  ← HTTP, JSON, form bodies
//! │  - Encrypted state cookie               │  ← PrivateCookieJar
//! │  - 401 responses                        │  ← AppError
//! ├─────────────────────────────────────────┤
//! │            clef-auth                    │
//! │  - State verification                   │
//! │  - Code / logout token exchange         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **Login page** calls [`ClefState::issue_state`] and embeds the value
//! 2. **Clef redirects** back with `state` and `code`
//! 3. **Middleware** compares `state` with the cookie and exchanges `code`
//! 4. **Handler** reads [`ClefCredentials`]
//!
//! Clef's logout webhook is a POST carrying `logout_token`; the middleware
//! exchanges it and hands the handler the id of the user to sign out.
//!
//! # Example
//!
//! ```ignore
//! use axum::{middleware, routing::{get, post}, Json, Router};
//! use axum_extra::extract::cookie::Key;
//! use clef_auth::{ClefConfig, ClefStrategy, Credentials};
//! use clef_auth_web::{clef_middleware, ClefCredentials, ClefState};
//!
//! async fn login(ClefCredentials(credentials): ClefCredentials) -> Json<Credentials> {
//!     Json(credentials)
//! }
//!
//! let strategy = ClefStrategy::from_config(ClefConfig::from_env()?)?;
//! let state = ClefState::new(strategy, Key::generate());
//!
//! let app = Router::new()
//!     .route("/login", get(login))
//!     .route("/logout", post(logout))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), clef_middleware))
//!     .with_state(state);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod state;
pub mod state_cookie;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::ClefCredentials;
pub use middleware::{clef_middleware, MAX_PAYLOAD_BYTES};
pub use state::ClefState;
