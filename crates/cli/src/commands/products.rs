//! Product catalog commands.

use std::num::NonZeroU32;

use shopfront_core::{
    CategoryId, CreateProductDto, PageRequest, Price, Product, ProductId, UpdateProductDto,
};
use tracing::info;

use shopfront_client::StoreApi;

use super::{CliError, emit};

/// List products in one request, with retry.
pub async fn list(
    api: &StoreApi,
    limit: Option<NonZeroU32>,
    offset: Option<u32>,
) -> Result<(), CliError> {
    let products = api.products().get_all(limit, offset).await?;
    info!(count = products.len(), "Fetched products");
    emit(&products)
}

/// Fetch `pages` consecutive pages and print the accumulated list.
pub async fn pages(
    api: &StoreApi,
    limit: NonZeroU32,
    offset: u32,
    pages: u32,
) -> Result<(), CliError> {
    let catalog = api.products();
    let mut page = PageRequest::new(limit, offset);
    let mut products: Vec<Product> = Vec::new();

    for _ in 0..pages {
        let batch = catalog.get_page(page).await?;
        let exhausted = batch.len() < page.limit.get() as usize;
        products.extend(batch);
        if exhausted {
            break;
        }
        page = page.next();
    }

    info!(count = products.len(), next_offset = page.offset, "Fetched pages");
    emit(&products)
}

/// Show one product, with its tax.
pub async fn get(api: &StoreApi, id: &str) -> Result<(), CliError> {
    let product = api.products().get_one(&ProductId::new(id)).await?;
    info!(taxes = %product.taxes(), "Tax at current price");
    emit(&product)
}

/// Create a product.
pub async fn create(
    api: &StoreApi,
    title: String,
    price: Price,
    description: String,
    category_id: i32,
    images: Vec<String>,
) -> Result<(), CliError> {
    let dto = CreateProductDto {
        title,
        price,
        images,
        description,
        category_id: CategoryId::new(category_id),
    };
    let product = api.products().create(&dto).await?;
    info!(product_id = %product.id, "Product created");
    emit(&product)
}

/// Update the supplied fields of a product.
pub async fn update(
    api: &StoreApi,
    id: &str,
    title: Option<String>,
    price: Option<Price>,
    description: Option<String>,
) -> Result<(), CliError> {
    let changes = UpdateProductDto {
        title,
        price,
        description,
        ..UpdateProductDto::default()
    };
    if changes.is_empty() {
        return Err(CliError::InvalidArgument(
            "nothing to update: pass --title, --price, or --description".to_string(),
        ));
    }
    let product = api
        .products()
        .update(&ProductId::new(id), &changes)
        .await?;
    emit(&product)
}

/// Delete a product.
pub async fn delete(api: &StoreApi, id: &str) -> Result<(), CliError> {
    api.products().delete(&ProductId::new(id)).await?;
    info!(product_id = %id, "Product deleted");
    Ok(())
}

/// Read a product and retitle it, concurrently unless `sequential`.
pub async fn read_update(
    api: &StoreApi,
    id: &str,
    title: String,
    sequential: bool,
) -> Result<(), CliError> {
    let id = ProductId::new(id);
    let changes = UpdateProductDto::title(title);
    let catalog = api.products();

    if sequential {
        let updated = catalog.read_then_update(&id, &changes).await?;
        return emit(&updated);
    }

    let (read, updated) = catalog.fetch_and_update_together(&id, &changes).await?;
    emit(&serde_json::json!({ "read": read, "updated": updated }))
}
