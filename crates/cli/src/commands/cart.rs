//! Cart command.

use serde::Serialize;
use shopfront_client::{CartStore, StoreApi};
use shopfront_core::{Price, ProductId};
use tracing::info;

use super::{CliError, emit};

#[derive(Serialize)]
struct CartLine {
    id: ProductId,
    title: String,
    price: Price,
}

#[derive(Serialize)]
struct CartSummary {
    items: Vec<CartLine>,
    count: usize,
    total: Price,
}

/// Fetch each product and add it to a fresh cart, logging every update.
///
/// Repeated ids add one unit each.
pub async fn add(api: &StoreApi, ids: &[String]) -> Result<(), CliError> {
    let catalog = api.products();
    let cart = CartStore::new();
    let mut updates = cart.subscribe();

    // Counter the way a nav badge would track it.
    let watcher = tokio::spawn(async move {
        let mut notifications = 0_usize;
        while let Some(snapshot) = updates.recv().await {
            notifications += 1;
            info!(cart_size = snapshot.len(), total = %snapshot.total(), "Cart updated");
        }
        notifications
    });

    for id in ids {
        let product = catalog.get_one(&ProductId::new(id.as_str())).await?;
        cart.add_product(product)?;
    }

    let summary = CartSummary {
        items: cart
            .shopping_cart()
            .into_iter()
            .map(|p| CartLine {
                id: p.id,
                title: p.title,
                price: p.price,
            })
            .collect(),
        count: cart.len(),
        total: cart.total(),
    };

    drop(cart);
    let notifications = watcher.await.unwrap_or_default();
    info!(notifications, "Cart closed");

    emit(&summary)
}
