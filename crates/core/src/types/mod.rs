//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod email;
pub mod file;
pub mod id;
pub mod page;
pub mod price;
pub mod product;
pub mod user;

pub use email::{Email, EmailError};
pub use file::UploadedFile;
pub use id::*;
pub use page::PageRequest;
pub use price::{Price, PriceError};
pub use product::{Category, CreateProductDto, Product, TAX_RATE, UpdateProductDto};
pub use user::{CreateUserDto, User};
