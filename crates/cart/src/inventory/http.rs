//! HTTP client for the inventory API.
//!
//! Uses `reqwest` for HTTP. Product details are cached with `moka`; stock
//! levels are always fetched fresh since they are what quantity checks
//! validate against.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{InventoryClient, InventoryError};
use crate::config::InventoryConfig;

/// Client for the inventory API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpInventoryClient {
    inner: Arc<HttpInventoryClientInner>,
}

struct HttpInventoryClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl HttpInventoryClient {
    /// Create a new inventory API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(HttpInventoryClientInner {
                client,
                base_url: directory_url(config.base_url.clone()),
                products,
            }),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// URL for `{resource}/{id}` under the base URL.
    fn endpoint(&self, resource: &str, id: ProductId) -> Result<Url, InventoryError> {
        Ok(self.inner.base_url.join(&format!("{resource}/{id}"))?)
    }

    /// GET a JSON resource.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        id: ProductId,
    ) -> Result<T, InventoryError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(InventoryError::NotFound(id));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Inventory API returned non-success status"
            );
            return Err(InventoryError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse inventory API response"
            );
            InventoryError::Parse(e.to_string())
        })
    }
}

impl InventoryClient for HttpInventoryClient {
    #[instrument(skip(self), fields(product_id = %id))]
    async fn stock(&self, id: ProductId) -> Result<Stock, InventoryError> {
        let url = self.endpoint("stock", id)?;
        let stock: Stock = self.get_json(url, id).await?;
        debug!(available = stock.amount, "Fetched stock");
        Ok(stock)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn product(&self, id: ProductId) -> Result<Product, InventoryError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Product cache hit");
            return Ok(product);
        }

        let url = self.endpoint("products", id)?;
        let product: Product = self.get_json(url, id).await?;
        self.inner.products.insert(id, product.clone()).await;
        Ok(product)
    }
}

/// Make sure the base URL path ends in `/` so `join` appends instead of
/// replacing the last segment.
fn directory_url(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpInventoryClient {
        HttpInventoryClient::new(&InventoryConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = client("http://localhost:3333");
        assert_eq!(
            client.endpoint("stock", ProductId::new(1)).unwrap().as_str(),
            "http://localhost:3333/stock/1"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = client("https://api.example.com/v1");
        assert_eq!(client.base_url().as_str(), "https://api.example.com/v1/");
        assert_eq!(
            client
                .endpoint("products", ProductId::new(42))
                .unwrap()
                .as_str(),
            "https://api.example.com/v1/products/42"
        );
    }

    #[test]
    fn test_directory_url_is_idempotent() {
        let url = Url::parse("https://api.example.com/v1/").unwrap();
        assert_eq!(directory_url(url.clone()), url);
    }
}
