//! Authentication client.
//!
//! Login stores the access token in the shared [`SessionStore`]; every later
//! request to the API origin (including the profile fetch) carries it as a
//! bearer token.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use shopfront_core::{Email, User};
use tracing::{debug, info, instrument};

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::session::SessionStore;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken")]
    access_token: String,
}

/// Client for the login and profile endpoints.
#[derive(Clone)]
pub struct AuthClient {
    http: HttpClient,
}

impl AuthClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn session(&self) -> &SessionStore {
        self.http.session()
    }

    /// Exchange credentials for an access token and store it.
    ///
    /// A successful login replaces any previous session and its cached
    /// profile.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials, or another
    /// classified failure. The existing session is left untouched on error.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &SecretString) -> Result<(), ApiError> {
        let url = self.http.endpoint(&["api", "auth", "login"])?;
        let request = self.http.request(Method::POST, url).json(&LoginRequest {
            email: email.as_str(),
            password: password.expose_secret(),
        });

        let response: LoginResponse = self.http.execute_json(request).await?;
        self.session()
            .start(SecretString::from(response.access_token));
        info!("Logged in");
        Ok(())
    }

    /// Fetch the profile for the stored token and cache it.
    ///
    /// The profile is only cached if the same session is still current when
    /// the response arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] without sending a request when no
    /// session exists, or when the backend rejects the token.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User, ApiError> {
        let Some(session_id) = self.session().session_id() else {
            debug!("No session, skipping profile request");
            return Err(ApiError::Unauthorized);
        };

        let url = self.http.endpoint(&["api", "auth", "profile"])?;
        let user: User = self.http.get_json(url).await?;
        if self.session().cache_profile(session_id, user.clone()) {
            debug!(user_id = %user.id, "Fetched profile");
        } else {
            debug!(user_id = %user.id, "Session changed during profile fetch, not caching");
        }
        Ok(user)
    }

    /// Log in, then fetch the profile with the token just obtained.
    ///
    /// The profile request is only sent after the login succeeds.
    ///
    /// # Errors
    ///
    /// Returns the login failure, or the profile failure.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login_and_fetch_profile(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> Result<User, ApiError> {
        self.login(email, password).await?;
        self.profile().await
    }

    /// Discard the session and cached profile.
    pub fn logout(&self) {
        self.session().clear();
        info!("Logged out");
    }

    /// Whether a token is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Profile cached by the last successful [`AuthClient::profile`] call.
    #[must_use]
    pub fn cached_profile(&self) -> Option<User> {
        self.session().profile()
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}
