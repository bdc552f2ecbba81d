//! CLI subcommands.

pub mod cart;

use rocketshoes_cart::{CartError, ConfigError, InventoryError, StorageError};
use thiserror::Error;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Inventory client error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Cart(#[from] CartError),
}
