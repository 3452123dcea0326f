//! Shopfront Core - Shared domain types.
//!
//! This crate provides the types exchanged with the storefront backend and
//! used by every Shopfront component:
//! - `client` - Async REST client and the in-process cart store
//! - `cli` - Command-line front end for the client
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, products, users, and pagination

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
