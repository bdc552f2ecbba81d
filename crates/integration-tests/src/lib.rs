//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! Tests run against [`MockInventoryApi`], an in-process `axum` server bound
//! to an ephemeral localhost port that serves `/stock/{id}` and
//! `/products/{id}` like the real inventory backend. Persisted carts go to a
//! `tempfile::TempDir` that is removed when the test ends.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::InventoryConfig;
use rocketshoes_core::{Product, ProductId, Stock};
use rust_decimal::Decimal;
use url::Url;

/// How the mock API answers every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    /// Serve the catalog.
    #[default]
    Normal,
    /// Answer with this status and a plain-text body.
    Status(StatusCode),
    /// Answer 200 with a body that is not JSON.
    Malformed,
}

#[derive(Default)]
struct MockState {
    products: RwLock<HashMap<ProductId, Product>>,
    stock: RwLock<HashMap<ProductId, u32>>,
    behavior: RwLock<Behavior>,
    product_requests: AtomicUsize,
    stock_requests: AtomicUsize,
}

/// In-process stand-in for the inventory API.
#[derive(Clone)]
pub struct MockInventoryApi {
    state: Arc<MockState>,
    addr: SocketAddr,
}

impl MockInventoryApi {
    /// Bind to `127.0.0.1:0` and start serving in the background.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock inventory api");
        let addr = listener.local_addr().expect("mock api address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock api server");
        });

        Self { state, addr }
    }

    /// Base URL of the running server.
    #[must_use]
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).expect("mock api url")
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn config(&self) -> InventoryConfig {
        InventoryConfig::new(self.base_url())
    }

    /// Add a product with the given stock level.
    pub fn insert(&self, product: Product, stock: u32) {
        let id = product.id;
        self.state.products.write().unwrap().insert(id, product);
        self.set_stock(id, stock);
    }

    /// Change a product's stock level.
    pub fn set_stock(&self, id: ProductId, amount: u32) {
        self.state.stock.write().unwrap().insert(id, amount);
    }

    /// Change how the server answers.
    pub fn set_behavior(&self, behavior: Behavior) {
        *self.state.behavior.write().unwrap() = behavior;
    }

    /// Requests served on `/products/{id}`.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        self.state.product_requests.load(Ordering::SeqCst)
    }

    /// Requests served on `/stock/{id}`.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        self.state.stock_requests.load(Ordering::SeqCst)
    }
}

fn override_response(state: &MockState) -> Option<Response> {
    match *state.behavior.read().unwrap() {
        Behavior::Normal => None,
        Behavior::Status(status) => Some((status, "inventory backend error").into_response()),
        Behavior::Malformed => Some((StatusCode::OK, "<html>maintenance</html>").into_response()),
    }
}

async fn stock(State(state): State<Arc<MockState>>, UrlPath(id): UrlPath<i64>) -> Response {
    state.stock_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = override_response(&state) {
        return response;
    }

    let id = ProductId::new(id);
    let amount = state.stock.read().unwrap().get(&id).copied();
    amount.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |amount| Json(Stock { id, amount }).into_response(),
    )
}

async fn product(State(state): State<Arc<MockState>>, UrlPath(id): UrlPath<i64>) -> Response {
    state.product_requests.fetch_add(1, Ordering::SeqCst);
    if let Some(response) = override_response(&state) {
        return response;
    }

    let product = state
        .products
        .read()
        .unwrap()
        .get(&ProductId::new(id))
        .cloned();
    product.map_or_else(
        || StatusCode::NOT_FOUND.into_response(),
        |product| Json(product).into_response(),
    )
}

/// A sample catalog product.
#[must_use]
pub fn sneaker(id: i64, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Tênis de Caminhada {id}"),
        price: Decimal::new(price_cents, 2),
        image_url: format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/{id}.jpg"),
    }
}
