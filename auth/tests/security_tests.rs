//! Security-focused integration tests.
//!
//! - Forged or incomplete callbacks never reach Clef
//! - Provider error details never reach the caller
//! - Concurrent evaluations do not serialize on each other
//! - A stalled provider is bounded by the exchange deadline

#![allow(clippy::unwrap_used)]

use clef_auth::{
    mocks::{MockBehavior, MockClefClient},
    AuthError, AuthRequest, ClefConfig, ClefStrategy, LogoutPayload,
};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

fn create_test_strategy(clef: MockClefClient) -> ClefStrategy<MockClefClient> {
    ClefStrategy::new(ClefConfig::new("app", "secret"), clef).unwrap()
}

fn login_request(query_state: Option<&str>, cookie_state: Option<&str>) -> AuthRequest {
    let mut request = AuthRequest::get().with_query("code", "auth-code");
    if let Some(state) = query_state {
        request = request.with_query("state", state);
    }
    if let Some(state) = cookie_state {
        request = request.with_cookie("hapi-clef", state);
    }
    request
}

proptest! {
    /// Any differing or absent pair of state values is rejected before Clef
    /// is contacted.
    #[test]
    fn prop_mismatched_state_never_reaches_clef(
        query_state in proptest::option::of("[A-Za-z0-9+/=]{0,40}"),
        cookie_state in proptest::option::of("[A-Za-z0-9+/=]{0,40}"),
    ) {
        prop_assume!(query_state.is_none() || cookie_state.is_none() || query_state != cookie_state);

        let clef = MockClefClient::new();
        let strategy = create_test_strategy(clef.clone());
        let request = login_request(query_state.as_deref(), cookie_state.as_deref());

        let result = tokio_test::block_on(strategy.evaluate(&request));

        prop_assert_eq!(result, Err(AuthError::StateMismatch));
        prop_assert_eq!(clef.call_count(), 0);
    }

    /// Equal non-empty state values lead to exactly one exchange with the
    /// request's code.
    #[test]
    fn prop_matching_state_exchanges_once(state in "[A-Za-z0-9+/=]{1,40}", code in "[a-z0-9]{1,20}") {
        let clef = MockClefClient::new();
        let strategy = create_test_strategy(clef.clone());
        let request = AuthRequest::get()
            .with_query("state", state.clone())
            .with_query("code", code.clone())
            .with_cookie("hapi-clef", state);

        let result = tokio_test::block_on(strategy.evaluate(&request));

        prop_assert!(result.is_ok());
        prop_assert_eq!(clef.login_codes(), vec![code]);
    }
}

#[tokio::test]
async fn test_provider_details_are_not_exposed() {
    let clef = MockClefClient::failing();
    let strategy = create_test_strategy(clef);

    let login = strategy
        .evaluate(&login_request(Some("abcdef"), Some("abcdef")))
        .await
        .unwrap_err();
    let logout = strategy
        .evaluate(&AuthRequest::post(LogoutPayload::new("abcdef")))
        .await
        .unwrap_err();

    for error in [login, logout] {
        let message = error.to_string();
        assert_eq!(message, "Clef error");
        assert!(!message.contains("mock failure"));
    }
}

#[tokio::test]
async fn test_state_comparison_is_case_sensitive() {
    let clef = MockClefClient::new();
    let strategy = create_test_strategy(clef.clone());

    let result = strategy
        .evaluate(&login_request(Some("AbCdEf"), Some("abcdef")))
        .await;

    assert_eq!(result, Err(AuthError::StateMismatch));
    assert_eq!(clef.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_logins_do_not_serialize() {
    let clef = MockClefClient::new().with_behavior(MockBehavior::Delay(Duration::from_secs(1)));
    let strategy = Arc::new(create_test_strategy(clef.clone()));

    let started = tokio::time::Instant::now();

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let strategy = Arc::clone(&strategy);
            tokio::spawn(async move {
                let state = format!("state-{i}");
                let request = AuthRequest::get()
                    .with_query("state", state.clone())
                    .with_query("code", format!("code-{i}"))
                    .with_cookie("hapi-clef", state);
                strategy.evaluate(&request).await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    // Ten one-second exchanges finishing in about one second means none
    // waited on another.
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(clef.login_codes().len(), 10);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_clef_is_bounded_by_deadline() {
    let clef = MockClefClient::hanging();
    let strategy = create_test_strategy(clef.clone()).with_exchange_timeout(Duration::from_secs(10));

    let login = strategy
        .evaluate(&login_request(Some("abcdef"), Some("abcdef")))
        .await;
    let logout = strategy
        .evaluate(&AuthRequest::post(LogoutPayload::new("abcdef")))
        .await;

    assert_eq!(login, Err(AuthError::ProviderExchange));
    assert_eq!(logout, Err(AuthError::ProviderExchange));
    assert_eq!(clef.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stalled_clef_without_deadline_blocks_only_its_request() {
    let hanging = create_test_strategy(MockClefClient::hanging());
    let healthy = create_test_strategy(MockClefClient::new());

    let request = login_request(Some("abcdef"), Some("abcdef"));

    let stalled = tokio::time::timeout(Duration::from_secs(60), hanging.evaluate(&request)).await;
    assert!(stalled.is_err(), "no deadline means the exchange keeps waiting");

    assert!(healthy.evaluate(&request).await.is_ok());
}
