//! Catalog product types.
//!
//! [`Product`] is the full entity returned by the backend. The two DTOs are
//! request bodies: [`CreateProductDto`] carries every field, while
//! [`UpdateProductDto`] omits unset fields so the server merges only what
//! was supplied.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// Sales tax rate applied to listed prices (16%).
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Product category reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Category image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// A catalog product.
///
/// Treated as immutable once fetched; an update returns a new record that
/// replaces the old one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Description text.
    #[serde(default)]
    pub description: String,
    /// Category the product belongs to.
    pub category: Category,
}

impl Product {
    /// Sales tax owed on one unit at [`TAX_RATE`].
    #[must_use]
    pub fn taxes(&self) -> Decimal {
        self.price.amount() * TAX_RATE
    }
}

/// Request body for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    /// Product title.
    pub title: String,
    /// Unit price.
    pub price: Price,
    /// Image URLs.
    pub images: Vec<String>,
    /// Description text.
    pub description: String,
    /// Category to file the product under.
    pub category_id: CategoryId,
}

/// Request body for a partial product update.
///
/// Only fields set to `Some` are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl UpdateProductDto {
    /// An update that only changes the title.
    #[must_use]
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// True if no field would be sent.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.images.is_none()
            && self.description.is_none()
            && self.category_id.is_none()
    }
}
