//! Clef exchange providers.
//!
//! The strategy depends on the [`ClefClient`] trait, never on a concrete
//! client. This enables:
//! - **Testing**: use [`MockClefClient`](crate::mocks::MockClefClient)
//!   (in-memory, deterministic, no network)
//! - **Production**: use [`ClefApiClient`] against `clef.io`

pub mod clef_api;
pub mod exchange;

pub use clef_api::ClefApiClient;
pub use exchange::ClefClient;
