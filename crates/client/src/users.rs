//! User registration and listing.

use reqwest::Method;
use shopfront_core::{CreateUserDto, User};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::http::HttpClient;

/// Client for `/api/users`.
#[derive(Clone)]
pub struct UsersClient {
    http: HttpClient,
}

impl UsersClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Register a user.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Conflict`] if the backend reports the email as
    /// taken, or another classified failure.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create(&self, user: &CreateUserDto) -> Result<User, ApiError> {
        let url = self.http.endpoint(&["api", "users"])?;
        let created: User = self
            .http
            .execute_json(self.http.request(Method::POST, url).json(user))
            .await?;
        debug!(user_id = %created.id, "User created");
        Ok(created)
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let url = self.http.endpoint(&["api", "users"])?;
        self.http.get_json(url).await
    }
}
