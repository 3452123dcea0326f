//! Shopfront Client - Async client for the storefront REST backend.
//!
//! # Architecture
//!
//! - One [`StoreApi`] per backend: it owns the `reqwest` connection pool and
//!   the [`SessionStore`], and hands out cheap-to-clone service clients
//! - Every failure is classified into [`ApiError`]; raw transport errors
//!   never escape
//! - [`CartStore`] is purely local state and needs no `StoreApi`
//!
//! # Modules
//!
//! - [`products`] - Catalog listing, lookup, and mutation with retry
//! - [`auth`] - Login and profile, backed by the shared session
//! - [`users`] - User registration and listing
//! - [`files`] - Multipart upload and streaming download
//! - [`cart`] - Shopping cart state with change subscriptions
//!
//! # Example
//!
//! ```rust,ignore
//! use shopfront_client::{CartStore, ClientConfig, StoreApi};
//!
//! let api = StoreApi::new(&ClientConfig::from_env()?)?;
//! let products = api.products().get_all(None, None).await?;
//!
//! let cart = CartStore::new();
//! let mut updates = cart.subscribe();
//! cart.add_product(products[0].clone())?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod files;
mod http;
pub mod products;
pub mod session;
pub mod users;

pub use auth::AuthClient;
pub use cart::{CartError, CartSnapshot, CartStore, CartSubscription};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use files::FilesClient;
pub use products::ProductCatalogClient;
pub use session::SessionStore;
pub use users::UsersClient;

use http::HttpClient;

/// Entry point for the storefront backend.
///
/// Cloning is cheap; clones share the connection pool and session.
#[derive(Clone)]
pub struct StoreApi {
    http: HttpClient,
}

impl StoreApi {
    /// Create a client with a fresh, logged-out session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_session(config, SessionStore::new())
    }

    /// Create a client that shares an existing session.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] if the HTTP client cannot be built.
    pub fn with_session(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        tracing::debug!(base_url = %config.base_url, max_retries = config.max_retries, "Creating store API client");
        Ok(Self {
            http: HttpClient::new(config, session)?,
        })
    }

    /// Product catalog client.
    #[must_use]
    pub fn products(&self) -> ProductCatalogClient {
        ProductCatalogClient::new(self.http.clone())
    }

    /// Authentication client.
    #[must_use]
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone())
    }

    /// Users client.
    #[must_use]
    pub fn users(&self) -> UsersClient {
        UsersClient::new(self.http.clone())
    }

    /// File transfer client.
    #[must_use]
    pub fn files(&self) -> FilesClient {
        FilesClient::new(self.http.clone())
    }

    /// Session shared by every client from this `StoreApi`.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        self.http.session()
    }
}

impl std::fmt::Debug for StoreApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreApi")
            .field("base_url", &self.http.base_url().as_str())
            .field("authenticated", &self.session().is_authenticated())
            .finish_non_exhaustive()
    }
}
