//! Cart operation errors and the messages shown for them.
//!
//! Every failure is terminal to the operation that hit it. The store logs it,
//! turns it into a short user-facing [`Notification`](crate::notify::Notification)
//! via [`CartError::user_message`], and leaves the cart unchanged.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::inventory::InventoryError;
use crate::storage::StorageError;

/// Message shown when a quantity would exceed available stock.
pub const STOCK_EXCEEDED_MESSAGE: &str = "Requested quantity is out of stock";

/// The mutating cart operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "Error adding product",
            Self::Remove => "Error removing product",
            Self::Update => "Error updating product quantity",
        }
    }

    /// Short name used in log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Update => "update",
        }
    }
}

/// Error returned by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The requested quantity is at or above the available stock.
    #[error("requested {requested} of product {product_id} but only {available} in stock")]
    StockExceeded {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Stock or product lookup failed.
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CartError {
    /// Whether the shopper can fix this by choosing a different quantity.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(self, Self::StockExceeded { .. })
    }

    /// The message shown to the shopper when `operation` fails with this error.
    ///
    /// Stock and product endpoint failures both map to the operation's
    /// generic message.
    #[must_use]
    pub const fn user_message(&self, operation: CartOperation) -> &'static str {
        if self.is_user_correctable() {
            STOCK_EXCEEDED_MESSAGE
        } else {
            operation.failure_message()
        }
    }
}
