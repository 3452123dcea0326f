//! Login and profile against a mock backend.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use secrecy::SecretString;
use serde_json::json;
use shopfront_client::ApiError;
use shopfront_core::{Email, UserId};
use shopfront_integration_tests::{TestContext, product_json, user_json};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, ResponseTemplate};

fn credentials() -> (Email, SecretString) {
    (
        Email::parse("buyer@example.com").unwrap(),
        SecretString::from("hunter2"),
    )
}

async fn mount_login(ctx: &TestContext, token: &str) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "email": "buyer@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": token })))
        .mount(&ctx.server)
        .await;
}

#[tokio::test]
async fn test_login_then_profile_carries_bearer_token() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, "tok-123").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(user_json(7, "buyer@example.com", "Buyer")),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    let auth = ctx.api.auth();
    let profile = auth.login_and_fetch_profile(&email, &password).await.unwrap();

    assert_eq!(profile.id, UserId::new(7));
    assert_eq!(profile.email, email);
    assert!(auth.is_authenticated());
    assert_eq!(auth.cached_profile(), Some(profile));
}

#[tokio::test]
async fn test_login_accepts_camel_case_token() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "camel" })))
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    ctx.api.auth().login(&email, &password).await.unwrap();
    assert!(ctx.api.session().is_authenticated());
}

#[tokio::test]
async fn test_failed_login_never_requests_profile() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    let auth = ctx.api.auth();
    let err = auth
        .login_and_fetch_profile(&email, &password)
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_profile_without_session_sends_nothing() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let err = ctx.api.auth().profile().await.unwrap_err();
    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn test_rejected_token_surfaces_unauthorized() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, "expired").await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    let auth = ctx.api.auth();
    auth.login(&email, &password).await.unwrap();
    let err = auth.profile().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert!(auth.cached_profile().is_none());
}

#[tokio::test]
async fn test_token_applies_to_other_clients() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, "shared").await;
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .and(header("authorization", "Bearer shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p1", "Shirt", 10)))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    ctx.api.auth().login(&email, &password).await.unwrap();
    ctx.api
        .products()
        .get_one(&shopfront_core::ProductId::new("p1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_stops_sending_token() {
    let ctx = TestContext::new().await;
    mount_login(&ctx, "gone-soon").await;
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(product_json("p1", "Shirt", 10)))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    let auth = ctx.api.auth();
    auth.login(&email, &password).await.unwrap();
    auth.logout();

    assert!(!auth.is_authenticated());
    ctx.api
        .products()
        .get_one(&shopfront_core::ProductId::new("p1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_relogin_during_profile_fetch_does_not_cache_old_profile() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": "first" })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "access_token": "second" })))
        .with_priority(2)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("authorization", "Bearer first"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(user_json(7, "buyer@example.com", "Buyer"))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let (email, password) = credentials();
    let auth = ctx.api.auth();
    auth.login(&email, &password).await.unwrap();

    let pending = tokio::spawn({
        let auth = auth.clone();
        async move { auth.profile().await }
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    auth.login(&email, &password).await.unwrap();

    let profile = pending.await.unwrap().unwrap();
    assert_eq!(profile.id, UserId::new(7));
    assert!(auth.is_authenticated());
    assert!(auth.cached_profile().is_none());
}
