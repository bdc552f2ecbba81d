//! Inventory API access.
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` → `{ "id": 1, "amount": 5 }`
//! - `GET /products/{id}` → `{ "id": 1, "title": "...", "price": 179.9, "imageUrl": "..." }`
//!
//! [`HttpInventoryClient`] is the real client. [`InMemoryInventory`] serves a
//! fixed catalog and is used by tests and offline demos.

mod http;
mod in_memory;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use http::HttpInventoryClient;
pub use in_memory::InMemoryInventory;

/// Errors that can occur when talking to the inventory API.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The API has no record for this product.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The configured base URL cannot address the endpoints.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend could not serve the request.
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

/// Source of stock levels and product details.
pub trait InventoryClient: Send + Sync {
    /// Available stock for a product.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, InventoryError>> + Send;

    /// Catalog details for a product.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, InventoryError>> + Send;
}
