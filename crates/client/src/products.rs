//! Product catalog client.
//!
//! # Endpoints
//!
//! - `GET /api/products?limit=&offset=` - listings ([`ProductCatalogClient::get_page`], [`ProductCatalogClient::get_all`])
//! - `GET /api/products/{id}` - single product
//! - `POST /api/products` - create (full body)
//! - `PUT /api/products/{id}` - partial update
//! - `DELETE /api/products/{id}` - delete
//!
//! Only [`ProductCatalogClient::get_all`] retries; every other call surfaces
//! its classified failure on the first attempt.

use std::num::NonZeroU32;

use reqwest::Method;
use shopfront_core::{CreateProductDto, PageRequest, Product, ProductId, UpdateProductDto};
use tracing::{debug, instrument};
use url::Url;

use crate::error::ApiError;
use crate::http::HttpClient;

/// Client for the product catalog endpoints.
#[derive(Clone)]
pub struct ProductCatalogClient {
    http: HttpClient,
}

impl ProductCatalogClient {
    pub(crate) fn new(http: HttpClient) -> Self {
        Self { http }
    }

    fn collection_url(&self) -> Result<Url, ApiError> {
        self.http.endpoint(&["api", "products"])
    }

    fn item_url(&self, id: &ProductId) -> Result<Url, ApiError> {
        self.http.endpoint(&["api", "products", id.as_str()])
    }

    /// Fetch one page of products.
    ///
    /// Callers doing infinite scroll accumulate pages themselves; overlapping
    /// pages are not deduplicated.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`] on the first failure.
    #[instrument(skip(self), fields(limit = page.limit.get(), offset = page.offset))]
    pub async fn get_page(&self, page: PageRequest) -> Result<Vec<Product>, ApiError> {
        let mut url = self.collection_url()?;
        url.query_pairs_mut()
            .append_pair("limit", &page.limit.to_string())
            .append_pair("offset", &page.offset.to_string());

        let products: Vec<Product> = self.http.get_json(url).await?;
        debug!(count = products.len(), "Fetched product page");
        Ok(products)
    }

    /// Fetch the product listing, retrying transient failures.
    ///
    /// Only the parameters that are present are sent. A network error or
    /// 5xx response is retried up to the configured bound (3 by default, so
    /// at most 4 requests).
    ///
    /// # Errors
    ///
    /// Returns the final classified failure once retries are exhausted, or
    /// the first non-transient failure.
    #[instrument(skip(self))]
    pub async fn get_all(
        &self,
        limit: Option<NonZeroU32>,
        offset: Option<u32>,
    ) -> Result<Vec<Product>, ApiError> {
        let mut url = self.collection_url()?;
        if limit.is_some() || offset.is_some() {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(offset) = offset {
                query.append_pair("offset", &offset.to_string());
            }
        }

        let products: Vec<Product> = self
            .http
            .with_retry("products.get_all", || self.http.get_json(url.clone()))
            .await?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for 404, [`ApiError::Unauthorized`] for
    /// 401, [`ApiError::Conflict`] for 409, and the other categories as
    /// classified.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_one(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.http.get_json(self.item_url(id)?).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`] if the backend rejects the request.
    #[instrument(skip(self, product), fields(title = %product.title))]
    pub async fn create(&self, product: &CreateProductDto) -> Result<Product, ApiError> {
        let request = self
            .http
            .request(Method::POST, self.collection_url()?)
            .json(product);
        let created: Product = self.http.execute_json(request).await?;
        debug!(product_id = %created.id, "Product created");
        Ok(created)
    }

    /// Apply a partial update; fields left `None` are unchanged server-side.
    ///
    /// # Errors
    ///
    /// Returns a classified [`ApiError`] if the backend rejects the request.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        changes: &UpdateProductDto,
    ) -> Result<Product, ApiError> {
        let request = self
            .http
            .request(Method::PUT, self.item_url(id)?)
            .json(changes);
        self.http.execute_json(request).await
    }

    /// Delete a product.
    ///
    /// Deleting an id that no longer exists reports [`ApiError::NotFound`]
    /// rather than succeeding silently.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] on 404 or when the backend answers
    /// `false`, and other classified failures as they occur.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<(), ApiError> {
        let response = self
            .http
            .execute(self.http.request(Method::DELETE, self.item_url(id)?))
            .await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(&e))?;

        // Some deployments answer 204 with no body.
        if body.trim().is_empty() {
            return Ok(());
        }
        let deleted: bool =
            serde_json::from_str(&body).map_err(|e| ApiError::invalid_body(status, &e))?;
        if deleted {
            debug!("Product deleted");
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("product {id}")))
        }
    }

    /// Read a product and update it concurrently.
    ///
    /// Both requests are in flight at the same time; the call resolves once
    /// the slower one finishes. Yields `(read, updated)`. If either fails,
    /// that failure is returned and the other request is abandoned with no
    /// rollback.
    ///
    /// # Errors
    ///
    /// Returns the first classified failure from either request.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn fetch_and_update_together(
        &self,
        id: &ProductId,
        changes: &UpdateProductDto,
    ) -> Result<(Product, Product), ApiError> {
        tokio::try_join!(self.get_one(id), self.update(id, changes))
    }

    /// Read a product, then update the record that was read.
    ///
    /// The update is not attempted if the read fails.
    ///
    /// # Errors
    ///
    /// Returns the read failure, or the update failure.
    #[instrument(skip(self, changes), fields(product_id = %id))]
    pub async fn read_then_update(
        &self,
        id: &ProductId,
        changes: &UpdateProductDto,
    ) -> Result<Product, ApiError> {
        let current = self.get_one(id).await?;
        self.update(&current.id, changes).await
    }
}

impl std::fmt::Debug for ProductCatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCatalogClient")
            .field("base_url", &self.http.base_url().as_str())
            .finish_non_exhaustive()
    }
}
