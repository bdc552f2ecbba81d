//! Cart lines and the ordered line list.
//!
//! All updates are copy-on-write: every `with_*`/`without` method returns a
//! new [`Cart`] and leaves the receiver untouched, so a failed persist never
//! leaves a half-applied change behind.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::product::Product;

/// One product entry with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    /// Unit price. Serialized as a JSON float, the same encoding the catalog
    /// API uses, so precision beyond `f64` is not kept in the persisted blob.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(alias = "image")]
    pub image_url: String,
    pub amount: u32,
}

impl CartLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.amount)
    }

    /// Unit price formatted for display.
    #[must_use]
    pub fn unit_price(&self) -> Price {
        Price::from_amount(self.price)
    }
}

/// Ordered list of cart lines, unique by product ID, in insertion order.
///
/// Serializes as a bare JSON array so the persisted blob is just the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// New cart with `product` appended at quantity 1.
    ///
    /// If the product is already present the cart is returned unchanged;
    /// callers increment existing lines with [`Cart::with_amount`].
    #[must_use]
    pub fn with_line_added(&self, product: Product) -> Self {
        if self.find(product.id).is_some() {
            return self.clone();
        }
        let mut lines = self.lines.clone();
        lines.push(product.into_line(1));
        Self { lines }
    }

    /// New cart where the line for `id` has quantity `amount`.
    ///
    /// Every other line is carried over as-is. Missing IDs are a no-op.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                if line.id == id {
                    CartLine {
                        amount,
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect();
        Self { lines }
    }

    /// New cart without the line for `id`. Missing IDs are a no-op.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Self {
        let lines = self
            .lines
            .iter()
            .filter(|line| line.id != id)
            .cloned()
            .collect();
        Self { lines }
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        Price::from_amount(self.lines.iter().map(CartLine::line_total).sum())
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            title: format!("Sneaker {id}"),
            price,
            image_url: format!("https://cdn.example/{id}.jpg"),
        }
    }

    #[test]
    fn test_with_line_added_appends_in_order() {
        let cart = Cart::new()
            .with_line_added(product(2, Decimal::new(100, 0)))
            .with_line_added(product(1, Decimal::new(50, 0)));

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.id.as_i64()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(cart.lines().iter().all(|l| l.amount == 1));
    }

    #[test]
    fn test_with_line_added_keeps_ids_unique() {
        let cart = Cart::new().with_line_added(product(1, Decimal::ONE));
        let again = cart.with_line_added(product(1, Decimal::ONE));
        assert_eq!(again, cart);
    }

    #[test]
    fn test_with_amount_leaves_receiver_untouched() {
        let cart = Cart::new()
            .with_line_added(product(1, Decimal::ONE))
            .with_line_added(product(2, Decimal::ONE));

        let updated = cart.with_amount(ProductId::new(2), 4);

        assert_eq!(cart.find(ProductId::new(2)).unwrap().amount, 1);
        assert_eq!(updated.find(ProductId::new(2)).unwrap().amount, 4);
        assert_eq!(updated.find(ProductId::new(1)), cart.find(ProductId::new(1)));
    }

    #[test]
    fn test_with_amount_missing_id_is_noop() {
        let cart = Cart::new().with_line_added(product(1, Decimal::ONE));
        assert_eq!(cart.with_amount(ProductId::new(9), 3), cart);
    }

    #[test]
    fn test_without() {
        let cart = Cart::new()
            .with_line_added(product(1, Decimal::ONE))
            .with_line_added(product(2, Decimal::ONE));

        let removed = cart.without(ProductId::new(1));
        assert_eq!(removed.len(), 1);
        assert!(removed.find(ProductId::new(1)).is_none());

        assert_eq!(removed.without(ProductId::new(1)), removed);
    }

    #[test]
    fn test_totals() {
        let cart = Cart::new()
            .with_line_added(product(1, Decimal::new(1795, 1)))
            .with_line_added(product(2, Decimal::new(10025, 2)));
        let cart = cart.with_amount(ProductId::new(1), 2);

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal().display(), "$459.25");
        assert_eq!(
            cart.find(ProductId::new(1)).unwrap().line_total(),
            Decimal::new(359, 0)
        );
    }

    #[test]
    fn test_iterates_lines_in_order() {
        let cart = Cart::new()
            .with_line_added(product(3, Decimal::new(10, 0)))
            .with_line_added(product(1, Decimal::new(20, 0)));

        let mut ids = Vec::new();
        for line in &cart {
            ids.push(line.id.as_i64());
        }
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let cart = Cart::new().with_line_added(product(1, Decimal::new(1795, 1)));
        let json = serde_json::to_string(&cart).unwrap();
        assert!(json.starts_with('['));
        assert!(json.contains("\"imageUrl\""));
        assert!(json.contains("\"price\":179.5"));

        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
