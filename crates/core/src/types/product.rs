//! Catalog records returned by the inventory API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::ProductId;

/// Product details from `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Sent by the API as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Older catalog payloads call this field `image`.
    #[serde(alias = "image")]
    pub image_url: String,
}

impl Product {
    /// Build a cart line for this product with the given quantity.
    #[must_use]
    pub fn into_line(self, amount: u32) -> CartLine {
        CartLine {
            id: self.id,
            title: self.title,
            price: self.price,
            image_url: self.image_url,
            amount,
        }
    }
}

/// Available inventory from `GET /stock/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

impl Stock {
    /// Whether a cart quantity of `amount` has reached the stock limit.
    ///
    /// A quantity equal to the stock level is already at the limit, both for
    /// increments and for explicit quantity updates.
    #[must_use]
    pub const fn is_exhausted_at(&self, amount: u32) -> bool {
        amount >= self.amount
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_api_json() {
        let json = r#"{"id":1,"title":"Tênis de Caminhada","price":179.5,"imageUrl":"https://cdn/1.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, Decimal::new(1795, 1));
        assert_eq!(product.image_url, "https://cdn/1.jpg");
    }

    #[test]
    fn test_product_accepts_image_alias() {
        let json = r#"{"id":2,"title":"Tênis VR","price":139,"image":"https://cdn/2.jpg"}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.image_url, "https://cdn/2.jpg");
        assert_eq!(product.price, Decimal::new(139, 0));
    }

    #[test]
    fn test_into_line() {
        let product = Product {
            id: ProductId::new(3),
            title: "Runner".to_string(),
            price: Decimal::new(9950, 2),
            image_url: "img".to_string(),
        };
        let line = product.into_line(1);
        assert_eq!(line.id, ProductId::new(3));
        assert_eq!(line.amount, 1);
        assert_eq!(line.price, Decimal::new(9950, 2));
    }

    #[test]
    fn test_stock_exhausted_at_or_above_amount() {
        let stock = Stock {
            id: ProductId::new(1),
            amount: 5,
        };
        assert!(!stock.is_exhausted_at(4));
        assert!(stock.is_exhausted_at(5));
        assert!(stock.is_exhausted_at(6));

        let empty = Stock {
            id: ProductId::new(1),
            amount: 0,
        };
        assert!(empty.is_exhausted_at(0));
    }
}
