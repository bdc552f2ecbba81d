//! RocketShoes Cart library.
//!
//! A cart store that validates quantities against a remote inventory API and
//! mirrors every successful change to a local key-value store.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the in-memory cart and its injected collaborators
//! - [`inventory`] talks to the stock and product endpoints
//! - [`storage`] persists the serialized cart under a fixed key
//! - [`notify`] delivers short user-facing failure messages
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, FileStore, HttpInventoryClient, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let inventory = HttpInventoryClient::new(&config.inventory)?;
//! let storage = FileStore::new(&config.storage_dir);
//! let mut store = CartStore::load(inventory, storage, TracingNotifier, &config.storage_key)?;
//!
//! store.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod inventory;
pub mod notify;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError, InventoryConfig};
pub use error::{CartError, CartOperation};
pub use inventory::{HttpInventoryClient, InMemoryInventory, InventoryClient, InventoryError};
pub use notify::{ChannelNotifier, Notification, Notifier, TracingNotifier};
pub use storage::{DEFAULT_STORAGE_KEY, FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, UpdateProductAmount};
