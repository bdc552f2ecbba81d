//! Cart commands.
//!
//! Each command opens the cart persisted under the configured key, runs one
//! operation, and prints the resulting cart. Failure messages meant for the
//! shopper go to stderr through the notifier; the process exit code reflects
//! whether the operation succeeded.

use rocketshoes_cart::{
    CartConfig, CartStore, FileStore, HttpInventoryClient, Notification, UpdateProductAmount,
};
use rocketshoes_core::{Price, ProductId};

use super::CliError;

type Store = CartStore<HttpInventoryClient, FileStore, fn(&Notification)>;

#[allow(clippy::print_stderr)]
fn print_notification(notification: &Notification) {
    eprintln!("! {}", notification.message);
}

/// Open the cart described by the environment configuration.
fn open() -> Result<Store, CliError> {
    let config = CartConfig::from_env()?;
    let inventory = HttpInventoryClient::new(&config.inventory)?;
    let storage = FileStore::new(&config.storage_dir);

    tracing::debug!(
        api = %config.inventory.base_url,
        dir = %config.storage_dir.display(),
        "Opening cart"
    );

    let notifier: fn(&Notification) = print_notification;
    Ok(CartStore::load(
        inventory,
        storage,
        notifier,
        config.storage_key,
    )?)
}

/// Print the cart as a table.
#[allow(clippy::print_stdout)]
fn print_cart(store: &Store) {
    if store.cart().is_empty() {
        println!("Cart is empty");
        return;
    }

    for line in store.snapshot() {
        println!(
            "{:>5}  {:<40} {:>4} x {:>10} = {:>10}",
            line.id.as_i64(),
            line.title,
            line.amount,
            line.unit_price(),
            Price::from_amount(line.line_total()),
        );
    }
    println!(
        "{} item(s), subtotal {}",
        store.item_count(),
        store.subtotal()
    );
}

/// Show the cart.
///
/// # Errors
///
/// Returns error if configuration is invalid or storage cannot be read.
pub fn show() -> Result<(), CliError> {
    let store = open()?;
    print_cart(&store);
    Ok(())
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns error if the product cannot be added.
pub async fn add(product_id: ProductId) -> Result<(), CliError> {
    let mut store = open()?;
    store.add_product(product_id).await?;
    print_cart(&store);
    Ok(())
}

/// Remove a product.
///
/// # Errors
///
/// Returns error if the cart cannot be saved.
pub fn remove(product_id: ProductId) -> Result<(), CliError> {
    let mut store = open()?;
    store.remove_product(product_id)?;
    print_cart(&store);
    Ok(())
}

/// Set a product's quantity.
///
/// # Errors
///
/// Returns error if the quantity cannot be updated.
pub async fn update(product_id: ProductId, amount: i64) -> Result<(), CliError> {
    let mut store = open()?;
    store
        .update_product_amount(UpdateProductAmount { product_id, amount })
        .await?;
    print_cart(&store);
    Ok(())
}
