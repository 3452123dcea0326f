//! Shared HTTP layer: URL building, bearer auth, timing, classification, retry.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::session::SessionStore;

/// How transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    pub(crate) max_retries: u32,
    pub(crate) delay: Duration,
}

/// Connection to the storefront backend shared by all service clients.
#[derive(Clone)]
pub(crate) struct HttpClient {
    inner: Arc<HttpClientInner>,
}

struct HttpClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    retry: RetryPolicy,
}

impl HttpClient {
    /// Build the underlying `reqwest` client from configuration.
    pub(crate) fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Unknown {
            status: None,
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            inner: Arc::new(HttpClientInner {
                client,
                base_url: config.base_url.clone(),
                session,
                retry: RetryPolicy {
                    max_retries: config.max_retries,
                    delay: config.retry_delay,
                },
            }),
        })
    }

    pub(crate) fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Append percent-encoded path segments to the base URL.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::Unknown {
                status: None,
                message: format!("base URL cannot take a path: {}", self.inner.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Resolve an absolute URL, or a path relative to the base URL.
    pub(crate) fn resolve(&self, target: &str) -> Result<Url, ApiError> {
        Url::parse(target)
            .or_else(|_| self.inner.base_url.join(target))
            .map_err(|e| ApiError::Unknown {
                status: None,
                message: format!("invalid URL '{target}': {e}"),
            })
    }

    /// Start a request, attaching the session token for the API origin.
    ///
    /// The token is never sent to other hosts (e.g. file download URLs).
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let same_origin = url.origin() == self.inner.base_url.origin();
        let builder = self.inner.client.request(method, url);
        match self.inner.session.access_token() {
            Some(token) if same_origin => builder.bearer_auth(token.expose_secret()),
            _ => builder,
        }
    }

    /// Send a request and classify any non-success status.
    pub(crate) async fn execute(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let request = builder.build().map_err(|e| ApiError::from_transport(&e))?;
        let method = request.method().clone();
        let path = request.url().path().to_owned();

        let started = Instant::now();
        let result = self.inner.client.execute(request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(%method, %path, elapsed_ms, error = %e, "Request failed before a response");
                return Err(ApiError::from_transport(&e));
            }
        };

        let status = response.status();
        debug!(%method, %path, status = status.as_u16(), elapsed_ms, "Request completed");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            %method,
            %path,
            status = status.as_u16(),
            body = %body.chars().take(500).collect::<String>(),
            "API returned non-success status"
        );
        Err(ApiError::from_status(status, &body))
    }

    /// Send a request and decode a JSON body.
    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self.execute(builder).await?;
        decode_json(response).await
    }

    /// `GET` a JSON resource.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.execute_json(self.request(Method::GET, url)).await
    }

    /// Run `operation`, retrying transient failures per the retry policy.
    ///
    /// Non-transient failures are returned immediately. After the last retry
    /// the final failure is returned as-is.
    pub(crate) async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        mut attempt_fn: F,
    ) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let policy = self.inner.retry;
        let mut retries = 0_u32;

        loop {
            match attempt_fn().await {
                Ok(value) => {
                    if retries > 0 {
                        debug!(operation, retries, "Succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && retries < policy.max_retries => {
                    retries += 1;
                    warn!(
                        operation,
                        attempt = retries,
                        max_retries = policy.max_retries,
                        error = %err,
                        "Transient failure, retrying"
                    );
                    if !policy.delay.is_zero() {
                        tokio::time::sleep(policy.delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Read the body and decode it as JSON.
pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::from_transport(&e))?;
    serde_json::from_str(&text).map_err(|e| {
        warn!(
            error = %e,
            body = %text.chars().take(500).collect::<String>(),
            "Failed to parse API response"
        );
        ApiError::invalid_body(status, &e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use secrecy::SecretString;

    use super::*;

    fn client(base: &str, max_retries: u32) -> HttpClient {
        let config = ClientConfig::parse(base)
            .unwrap()
            .with_max_retries(max_retries);
        HttpClient::new(&config, SessionStore::new()).unwrap()
    }

    fn transient() -> ApiError {
        ApiError::TransientServerError {
            status: Some(503),
            message: "unavailable".to_string(),
        }
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let http = client("http://localhost:3000", 3);
        let url = http.endpoint(&["api", "products", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/products/a%20b%2Fc");
    }

    #[test]
    fn test_endpoint_keeps_base_prefix() {
        let http = client("http://localhost:3000/store/", 3);
        let url = http.endpoint(&["api", "users"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/store/api/users");
    }

    #[test]
    fn test_resolve_absolute_and_relative() {
        let http = client("http://localhost:3000/", 3);
        assert_eq!(
            http.resolve("https://cdn.example.com/x.png").unwrap().as_str(),
            "https://cdn.example.com/x.png"
        );
        assert_eq!(
            http.resolve("files/x.png").unwrap().as_str(),
            "http://localhost:3000/files/x.png"
        );
    }

    #[test]
    fn test_bearer_only_for_api_origin() {
        let http = client("http://localhost:3000", 3);
        http.session()
            .start(SecretString::from("tok".to_string()));

        let own = http
            .request(Method::GET, http.endpoint(&["api", "auth", "profile"]).unwrap())
            .build()
            .unwrap();
        assert_eq!(
            own.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );

        let foreign = http
            .request(Method::GET, Url::parse("https://cdn.example.com/f").unwrap())
            .build()
            .unwrap();
        assert!(foreign.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn test_retry_until_success() {
        let http = client("http://localhost", 3);
        let calls = AtomicU32::new(0);
        let result = http
            .with_retry("test", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                    Err(transient())
                } else {
                    Ok(42)
                }
            })
            .await;
        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_returns_last_failure() {
        let http = client("http://localhost", 3);
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = http
            .with_retry("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;
        assert_eq!(result, Err(transient()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_non_transient_is_not_retried() {
        let http = client("http://localhost", 3);
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = http
            .with_retry("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::NotFound("gone".to_string()))
            })
            .await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries() {
        let http = client("http://localhost", 0);
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = http
            .with_retry("test", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(transient())
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
