//! In-process shopping cart with change broadcasting.
//!
//! [`CartStore`] owns the ordered list of products a shopper has picked and
//! pushes a [`CartSnapshot`] to every subscriber after each mutation.
//!
//! # Delivery guarantees
//!
//! - A new subscription immediately holds the current snapshot.
//! - Each mutation produces exactly one snapshot per live subscription, in
//!   mutation order.
//! - Snapshots are queued under the store lock and no subscriber code runs
//!   while it is held, so a subscriber cannot observe or cause a partially
//!   applied mutation.
//! - Dropping a [`CartSubscription`] (or calling
//!   [`CartSubscription::unsubscribe`]) removes it before the next mutation.
//!
//! # Example
//!
//! ```rust,ignore
//! let cart = CartStore::new();
//! let mut updates = cart.subscribe();
//! assert!(updates.try_recv().unwrap().is_empty());
//!
//! cart.add_product(product)?;
//! assert_eq!(updates.recv().await.unwrap().len(), 1);
//! ```

use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use shopfront_core::{Price, Product};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Adding the product would push the total past the largest
    /// representable amount. The cart is left unchanged.
    #[error("cart total overflow adding {price} to {total}")]
    TotalOverflow { total: Price, price: Price },
}

/// Immutable view of the cart at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSnapshot {
    products: Arc<[Product]>,
    total: Price,
}

impl CartSnapshot {
    /// Products in the order they were added.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Sum of the prices the products had when added.
    #[must_use]
    pub const fn total(&self) -> Price {
        self.total
    }
}

/// Shopping cart state container.
///
/// Cloning yields another handle to the same cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    inner: Arc<Mutex<CartState>>,
}

#[derive(Debug, Default)]
struct CartState {
    products: Vec<Product>,
    total: Price,
    subscribers: Vec<Subscriber>,
    next_subscriber_id: u64,
}

#[derive(Debug)]
struct Subscriber {
    id: u64,
    tx: mpsc::UnboundedSender<CartSnapshot>,
}

impl CartState {
    fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            products: Arc::from(self.products.as_slice()),
            total: self.total,
        }
    }

    /// Queue the current snapshot for every subscriber, pruning closed ones.
    fn broadcast(&mut self) {
        let snapshot = self.snapshot();
        self.subscribers
            .retain(|subscriber| subscriber.tx.send(snapshot.clone()).is_ok());
    }
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a product and notify subscribers.
    ///
    /// Duplicates are allowed; each represents one more unit. The price is
    /// captured as-is and never re-priced.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::TotalOverflow`] if the new total is not
    /// representable; nothing is added and no snapshot is sent.
    pub fn add_product(&self, product: Product) -> Result<(), CartError> {
        let mut state = self.lock();
        let Some(total) = state.total.checked_add(product.price) else {
            warn!(total = %state.total, price = %product.price, "Cart total overflow");
            return Err(CartError::TotalOverflow {
                total: state.total,
                price: product.price,
            });
        };
        state.total = total;
        state.products.push(product);
        state.broadcast();
        debug!(
            cart_size = state.products.len(),
            total = %state.total,
            "Product added to cart"
        );
        Ok(())
    }

    /// Empty the cart and notify subscribers.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.products.clear();
        state.total = Price::ZERO;
        state.broadcast();
        debug!("Cart cleared");
    }

    /// Copy of the products currently in the cart.
    #[must_use]
    pub fn shopping_cart(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Sum of the prices of every product in the cart.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lock().total
    }

    /// Number of units in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().products.len()
    }

    /// Whether the cart is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().products.is_empty()
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.lock().snapshot()
    }

    /// Subscribe to cart changes.
    ///
    /// The returned subscription already holds the current snapshot.
    #[must_use]
    pub fn subscribe(&self) -> CartSubscription {
        let mut state = self.lock();
        let id = state.next_subscriber_id;
        state.next_subscriber_id += 1;

        let (tx, rx) = mpsc::unbounded_channel();
        if tx.send(state.snapshot()).is_ok() {
            state.subscribers.push(Subscriber { id, tx });
        }
        debug!(subscriber = id, subscribers = state.subscribers.len(), "Cart subscription added");

        CartSubscription {
            id,
            rx,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Receiving end of a cart subscription.
///
/// Also usable as a [`Stream`] of snapshots.
#[derive(Debug)]
pub struct CartSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<CartSnapshot>,
    store: Weak<Mutex<CartState>>,
}

impl CartSubscription {
    /// Wait for the next snapshot.
    ///
    /// Returns `None` once the store has been dropped and every queued
    /// snapshot was received.
    pub async fn recv(&mut self) -> Option<CartSnapshot> {
        self.rx.recv().await
    }

    /// Take the next queued snapshot without waiting.
    pub fn try_recv(&mut self) -> Option<CartSnapshot> {
        self.rx.try_recv().ok()
    }

    /// Stop receiving. Snapshots still queued are discarded.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for CartSubscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(store) = self.store.upgrade() {
            let mut state = store.lock().unwrap_or_else(PoisonError::into_inner);
            state.subscribers.retain(|subscriber| subscriber.id != self.id);
        }
    }
}

impl Stream for CartSubscription {
    type Item = CartSnapshot;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}
