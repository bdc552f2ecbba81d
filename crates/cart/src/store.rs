//! The cart store.
//!
//! [`CartStore`] owns the current [`Cart`] and its collaborators. Each
//! mutating operation follows the same shape: fetch what it needs from the
//! inventory, validate, build a new cart copy-on-write, persist it, and only
//! then swap it in. A failure anywhere leaves both the in-memory cart and the
//! persisted blob as they were, and produces exactly one notification.

use rocketshoes_core::{Cart, CartLine, Price, ProductId};
use tracing::{debug, instrument};

use crate::error::{CartError, CartOperation};
use crate::inventory::InventoryClient;
use crate::notify::{Notification, Notifier};
use crate::storage::{KeyValueStore, StorageError};

/// Request to set a line's quantity.
///
/// `amount` is signed so that decrement buttons driven past zero reach the
/// store as negative values, which are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Shopping cart state mirrored to a key-value store.
pub struct CartStore<I, S, N> {
    inventory: I,
    storage: S,
    notifier: N,
    storage_key: String,
    cart: Cart,
}

impl<I, S, N> CartStore<I, S, N>
where
    I: InventoryClient,
    S: KeyValueStore,
    N: Notifier,
{
    /// Create a store, restoring the cart persisted under `storage_key`.
    ///
    /// A missing entry yields an empty cart. An entry that no longer parses is
    /// logged and also treated as empty; it is overwritten by the next
    /// successful mutation.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    pub fn load(
        inventory: I,
        storage: S,
        notifier: N,
        storage_key: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let storage_key = storage_key.into();

        let cart = match storage.get(&storage_key)? {
            Some(blob) => serde_json::from_str::<Cart>(&blob).unwrap_or_else(|e| {
                tracing::warn!(
                    key = %storage_key,
                    error = %e,
                    "Discarding unreadable persisted cart"
                );
                Cart::new()
            }),
            None => Cart::new(),
        };
        debug!(key = %storage_key, lines = cart.len(), "Cart restored");

        Ok(Self {
            inventory,
            storage,
            notifier,
            storage_key,
            cart,
        })
    }

    /// Current cart lines in insertion order.
    #[must_use]
    pub fn cart(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// Current cart.
    #[must_use]
    pub const fn snapshot(&self) -> &Cart {
        &self.cart
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    /// Key the cart is persisted under.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line, or appends a new line with quantity 1
    /// after fetching the product details.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StockExceeded` if the cart already holds all
    /// available stock, or the underlying error if a fetch or the persist
    /// fails. The notifier has already been called when this returns.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.settle(CartOperation::Add, result)
    }

    /// Remove a product's line. Removing an absent product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart cannot be persisted. The notifier has
    /// already been called when this returns.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let cart = self.cart.without(product_id);
        let result = self.commit(cart);
        self.settle(CartOperation::Remove, result)
    }

    /// Set a line's quantity.
    ///
    /// Negative amounts and products not in the cart are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `CartError::StockExceeded` if `amount` is at or above the
    /// available stock, or the underlying error if the stock fetch or the
    /// persist fails. The notifier has already been called when this returns.
    #[instrument(skip_all, fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let result = self.try_update_product_amount(update).await;
        self.settle(CartOperation::Update, result)
    }

    async fn try_add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let stock = self.inventory.stock(product_id).await?;
        let current = self.cart.find(product_id).map(|line| line.amount);

        let held = current.unwrap_or(0);
        if stock.is_exhausted_at(held) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: u64::from(held) + 1,
                available: stock.amount,
            });
        }

        let cart = match current {
            Some(amount) => self.cart.with_amount(product_id, amount + 1),
            None => {
                let product = self.inventory.product(product_id).await?;
                self.cart.with_line_added(product)
            }
        };

        self.commit(cart)
    }

    async fn try_update_product_amount(
        &mut self,
        update: UpdateProductAmount,
    ) -> Result<(), CartError> {
        let UpdateProductAmount { product_id, amount } = update;
        let stock = self.inventory.stock(product_id).await?;

        if amount >= i64::from(stock.amount) {
            return Err(CartError::StockExceeded {
                product_id,
                requested: amount.unsigned_abs(),
                available: stock.amount,
            });
        }

        // Below the stock level, so only negative amounts fail the conversion.
        let Ok(amount) = u32::try_from(amount) else {
            debug!("Ignoring negative quantity");
            return Ok(());
        };

        if self.cart.find(product_id).is_none() {
            debug!("Product not in cart, nothing to update");
            return Ok(());
        }

        let cart = self.cart.with_amount(product_id, amount);
        self.commit(cart)
    }

    /// Persist `cart`, then make it current.
    fn commit(&mut self, cart: Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(&cart)?;
        self.storage.set(&self.storage_key, &blob)?;
        self.cart = cart;
        debug!(
            lines = self.cart.len(),
            items = self.cart.item_count(),
            "Cart persisted"
        );
        Ok(())
    }

    /// Log and notify a failed operation; pass the result through.
    fn settle(
        &self,
        operation: CartOperation,
        result: Result<(), CartError>,
    ) -> Result<(), CartError> {
        if let Err(err) = &result {
            if err.is_user_correctable() {
                tracing::warn!(operation = operation.as_str(), error = %err, "Cart operation rejected");
            } else {
                tracing::error!(operation = operation.as_str(), error = %err, "Cart operation failed");
            }
            self.notifier.notify(&Notification {
                operation,
                message: err.user_message(operation).to_string(),
            });
        }
        result
    }
}
