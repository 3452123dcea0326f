//! Integration tests for Shopfront.
//!
//! Each test starts a [`wiremock::MockServer`] standing in for the storefront
//! backend and drives it through the public `shopfront-client` API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `products` - Catalog listing, retry, classification, and concurrent read/update
//! - `auth` - Login, bearer propagation, and profile caching
//! - `users_files` - User registration, multipart upload, and download

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use serde_json::{Value, json};
use shopfront_client::{ClientConfig, StoreApi};
use wiremock::MockServer;

/// A mock backend and a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub api: StoreApi,
}

impl TestContext {
    /// Start a mock backend with default client settings.
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    /// Start a mock backend, letting the caller adjust the configuration.
    pub async fn with_config(adjust: impl FnOnce(ClientConfig) -> ClientConfig) -> Self {
        let server = MockServer::start().await;
        let config = ClientConfig::parse(&server.uri())
            .expect("mock server URI should be a valid base URL")
            .with_retry_delay(Duration::ZERO);
        let api = StoreApi::new(&adjust(config)).expect("client should build");
        Self { server, api }
    }
}

/// Product JSON the way the backend returns it.
#[must_use]
pub fn product_json(id: &str, title: &str, price: u32) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "images": [format!("https://img.example.com/{id}.png")],
        "description": format!("{title} description"),
        "category": { "id": 1, "name": "Clothes", "image": "https://img.example.com/c1.png" }
    })
}

/// User JSON the way the backend returns it.
#[must_use]
pub fn user_json(id: i32, email: &str, name: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "name": name,
        "role": "customer",
        "avatar": "https://img.example.com/avatar.png"
    })
}
