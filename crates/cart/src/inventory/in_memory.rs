//! In-memory inventory backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Product, ProductId, Stock};

use super::{InventoryClient, InventoryError};

/// A fixed catalog held in memory.
///
/// Clones share state, so a handle kept outside a [`CartStore`](crate::CartStore)
/// can change stock levels or simulate an outage while the store holds another.
#[derive(Clone, Default)]
pub struct InMemoryInventory {
    inner: Arc<InMemoryInventoryInner>,
}

#[derive(Default)]
struct InMemoryInventoryInner {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, u32>>,
    offline: AtomicBool,
    product_fetches: AtomicUsize,
}

impl InMemoryInventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product and its stock level.
    pub fn insert(&self, product: Product, stock: u32) {
        let id = product.id;
        self.inner
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, product);
        self.set_stock(id, stock);
    }

    /// Change the stock level for a product.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.inner
            .stock
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, amount);
    }

    /// Make every request fail until switched back.
    pub fn set_offline(&self, offline: bool) {
        self.inner.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of product detail lookups served so far.
    #[must_use]
    pub fn product_fetches(&self) -> usize {
        self.inner.product_fetches.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), InventoryError> {
        if self.inner.offline.load(Ordering::SeqCst) {
            return Err(InventoryError::Unavailable("inventory is offline".to_string()));
        }
        Ok(())
    }
}

impl InventoryClient for InMemoryInventory {
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        self.ensure_online()?;
        let stock = self
            .inner
            .stock
            .read()
            .map_err(|e| InventoryError::Unavailable(e.to_string()))?;
        stock
            .get(&id)
            .map(|&amount| Stock { id, amount })
            .ok_or(InventoryError::NotFound(id))
    }

    async fn product(&self, id: ProductId) -> Result<Product, InventoryError> {
        self.ensure_online()?;
        self.inner.product_fetches.fetch_add(1, Ordering::SeqCst);
        let products = self
            .inner
            .products
            .read()
            .map_err(|e| InventoryError::Unavailable(e.to_string()))?;
        products
            .get(&id)
            .cloned()
            .ok_or(InventoryError::NotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn sneaker(id: i64) -> Product {
        Product {
            id: ProductId::new(id),
            title: "Sneaker".to_string(),
            price: Decimal::new(100, 0),
            image_url: "img".to_string(),
        }
    }

    #[tokio::test]
    async fn test_serves_inserted_records() {
        let inventory = InMemoryInventory::new();
        inventory.insert(sneaker(1), 3);

        let stock = inventory.stock(ProductId::new(1)).await.unwrap();
        assert_eq!(stock.amount, 3);

        let product = inventory.product(ProductId::new(1)).await.unwrap();
        assert_eq!(product, sneaker(1));
        assert_eq!(inventory.product_fetches(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let inventory = InMemoryInventory::new();
        let err = inventory.stock(ProductId::new(9)).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(id) if id == ProductId::new(9)));
    }

    #[tokio::test]
    async fn test_offline_and_shared_clones() {
        let inventory = InMemoryInventory::new();
        inventory.insert(sneaker(1), 3);

        let handle = inventory.clone();
        handle.set_offline(true);
        assert!(matches!(
            inventory.stock(ProductId::new(1)).await,
            Err(InventoryError::Unavailable(_))
        ));

        handle.set_offline(false);
        handle.set_stock(ProductId::new(1), 0);
        assert_eq!(inventory.stock(ProductId::new(1)).await.unwrap().amount, 0);
    }

    #[test]
    fn test_set_stock_lands_after_lock_poisoned() {
        let inventory = InMemoryInventory::new();
        inventory.insert(sneaker(1), 3);

        let poisoner = inventory.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.stock.write().unwrap();
            panic!("writer panicked while holding the stock lock");
        })
        .join();
        assert!(inventory.inner.stock.is_poisoned());

        inventory.set_stock(ProductId::new(1), 7);
        inventory.insert(sneaker(2), 4);

        let stock = inventory
            .inner
            .stock
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        assert_eq!(stock.get(&ProductId::new(1)), Some(&7));
        assert_eq!(stock.get(&ProductId::new(2)), Some(&4));
    }
}
