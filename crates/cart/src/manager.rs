//! The cart manager: cart state plus persistence and synchronization.
//!
//! # Write path
//!
//! Every gesture is applied to a copy of the cart. The copy is serialized and
//! written to the store; only when the write succeeds does it replace the
//! in-memory cart and get rendered. A failed write leaves the last persisted
//! cart in place, emits [`CartNotice::NotSaved`], and returns the error.
//!
//! Gestures that change nothing (unknown id, empty candidate id) do not
//! write at all.
//!
//! # Synchronization
//!
//! The store publishes a [`StorageEvent`] for every write, including this
//! manager's own, so other fragments in the same context that subscribe to
//! the store refresh too. [`CartManager::sync`] drains the manager's own
//! subscription: events for the cart key from any other context trigger a
//! full reload from the store. Reloads replace the cart wholesale; edits made
//! concurrently in two contexts are last-writer-wins.
//!
//! [`StorageEvent`]: crate::store::StorageEvent

use premium_cart_core::{CartCandidate, CurrencyCode};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::instrument;

use crate::cart::{Cart, CartView};
use crate::command::CartCommand;
use crate::config::CartConfig;
use crate::error::{self, CartError, Result};
use crate::store::{ContextId, KeyValueStore, StorageEvent};
use crate::surface::{CartNotice, RenderSurface};

/// Storage key used by the storefront.
pub const DEFAULT_CART_KEY: &str = "premium_cart_v2";

/// Result of a checkout gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart was empty; nothing happened.
    EmptyCart,
    /// The cart was cleared.
    Acknowledged,
}

/// Owns one context's cart replica.
pub struct CartManager<S: KeyValueStore> {
    store: S,
    key: String,
    context: ContextId,
    currency: CurrencyCode,
    cart: Cart,
    events: broadcast::Receiver<StorageEvent>,
    surfaces: Vec<Box<dyn RenderSurface>>,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Create a manager for `key`, loading the persisted cart.
    ///
    /// Absent, malformed or unreadable data yields an empty cart.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let events = store.subscribe();
        let cart = match store.get(&key) {
            Ok(stored) => Cart::from_stored(stored.as_deref()),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cart store unreadable, starting empty");
                Cart::new()
            }
        };
        tracing::debug!(key = %key, items = cart.len(), "cart loaded");

        Self {
            store,
            key,
            context: ContextId::new(),
            currency: CurrencyCode::default(),
            cart,
            events,
            surfaces: Vec::new(),
        }
    }

    /// Create a manager using the key and currency from `config`.
    pub fn from_config(store: S, config: &CartConfig) -> Self {
        Self::new(store, config.storage_key.clone()).with_currency(config.currency)
    }

    /// Set the currency used for the view model.
    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Attach a surface. It is rendered on the next change or
    /// [`refresh`](Self::refresh).
    pub fn attach(&mut self, surface: Box<dyn RenderSurface>) {
        self.surfaces.push(surface);
    }

    /// Render the current cart to every attached surface.
    pub fn refresh(&mut self) {
        self.render();
    }

    /// This manager's context id, as stamped on its store writes.
    #[must_use]
    pub const fn context(&self) -> ContextId {
        self.context
    }

    /// The persisted key this manager owns.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The in-memory cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Derive the view model from the in-memory cart.
    #[must_use]
    pub fn view_model(&self) -> CartView {
        self.cart.view(self.currency)
    }

    /// Run a gesture.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the resulting cart could not be persisted.
    pub fn dispatch(&mut self, command: CartCommand) -> Result<()> {
        tracing::debug!(command = command.name(), "dispatching cart command");
        match command {
            CartCommand::Add(candidate) => self.add_item(&candidate),
            CartCommand::Increment(id) => self.increment_quantity(&id),
            CartCommand::Decrement(id) => self.decrement_quantity(&id),
            CartCommand::Remove(id) => self.remove_item(&id),
            CartCommand::Clear => self.clear(),
            CartCommand::Checkout => self.checkout().map(|_| ()),
        }
    }

    /// Add one unit of `candidate`. Ignored if the candidate id is empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart could not be persisted.
    #[instrument(skip(self, candidate), fields(id = %candidate.id))]
    pub fn add_item(&mut self, candidate: &CartCandidate) -> Result<()> {
        self.commit("add", |cart| cart.add(candidate))?;
        error::add_breadcrumb("Item added", Some(&[("id", candidate.id.as_str())]));
        Ok(())
    }

    /// Add one to the quantity of `id`. Ignored if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart could not be persisted.
    #[instrument(skip(self))]
    pub fn increment_quantity(&mut self, id: &str) -> Result<()> {
        self.commit("increment", |cart| cart.increment(id))
    }

    /// Subtract one from the quantity of `id`, removing it at zero. Ignored
    /// if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart could not be persisted.
    #[instrument(skip(self))]
    pub fn decrement_quantity(&mut self, id: &str) -> Result<()> {
        self.commit("decrement", |cart| cart.decrement(id))
    }

    /// Remove `id` from the cart. Ignored if `id` is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart could not be persisted.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &str) -> Result<()> {
        self.commit("remove", |cart| cart.remove(id))
    }

    /// Empty the cart. Always writes, even if the cart is already empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cart could not be persisted.
    #[instrument(skip(self))]
    pub fn clear(&mut self) -> Result<()> {
        self.commit("clear", |cart| {
            cart.clear();
            true
        })
    }

    /// Demo checkout: clears a non-empty cart.
    ///
    /// An empty cart produces [`CartNotice::EmptyCart`] and no store write.
    /// Otherwise the cart is cleared and persisted, then
    /// [`CartNotice::CheckoutAcknowledged`] is sent. No order is recorded.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the cleared cart could not be persisted; the
    /// cart keeps its contents and no acknowledgement is sent.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<CheckoutOutcome> {
        if self.cart.is_empty() {
            self.notify(CartNotice::EmptyCart);
            return Ok(CheckoutOutcome::EmptyCart);
        }

        let items = self.cart.total_quantity().to_string();
        self.commit("checkout", |cart| {
            cart.clear();
            true
        })?;
        error::add_breadcrumb("Checkout acknowledged", Some(&[("items", items.as_str())]));
        self.notify(CartNotice::CheckoutAcknowledged);
        Ok(CheckoutOutcome::Acknowledged)
    }

    /// Process pending store notifications.
    ///
    /// Any change to the cart key made by another context, or a lagged
    /// subscription, triggers [`reconcile`](Self::reconcile). Returns `true`
    /// if a reload happened.
    pub fn sync(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if event.key == self.key && event.origin != self.context {
                        tracing::debug!(origin = %event.origin, at = %event.at, "foreign cart change");
                        stale = true;
                    }
                }
                Err(TryRecvError::Lagged(missed)) => {
                    tracing::debug!(missed, "cart subscription lagged");
                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.reconcile();
        }
        stale
    }

    /// Replace the in-memory cart with the store's current snapshot and
    /// re-render.
    ///
    /// Absent or malformed data yields an empty cart. If the store cannot
    /// be read at all, the in-memory cart is kept.
    #[instrument(skip(self), fields(key = %self.key))]
    pub fn reconcile(&mut self) {
        match self.store.get(&self.key) {
            Ok(stored) => {
                self.cart = Cart::from_stored(stored.as_deref());
                tracing::info!(items = self.cart.len(), "cart reloaded from store");
                self.render();
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart store unreadable, keeping current cart");
            }
        }
    }

    /// Apply `change` to a copy of the cart and persist it.
    fn commit(&mut self, operation: &str, change: impl FnOnce(&mut Cart) -> bool) -> Result<()> {
        let mut next = self.cart.clone();
        if !change(&mut next) {
            tracing::debug!(operation, "cart unchanged, skipping write");
            return Ok(());
        }

        if let Err(err) = self.persist(&next) {
            error::capture_write_failure(&err, operation);
            self.notify(CartNotice::NotSaved);
            return Err(err);
        }

        self.cart = next;
        tracing::debug!(
            operation,
            items = self.cart.len(),
            quantity = self.cart.total_quantity(),
            "cart saved"
        );
        self.render();
        Ok(())
    }

    fn persist(&self, cart: &Cart) -> Result<()> {
        let json = cart.to_json()?;
        self.store
            .set(&self.key, &json, self.context)
            .map_err(CartError::from)
    }

    fn render(&mut self) {
        let view = self.view_model();
        for surface in &mut self.surfaces {
            surface.render(&view);
        }
    }

    fn notify(&mut self, notice: CartNotice) {
        tracing::debug!(%notice, "cart notice");
        for surface in &mut self.surfaces {
            surface.notice(notice);
        }
    }
}

impl<S: KeyValueStore> std::fmt::Debug for CartManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartManager")
            .field("key", &self.key)
            .field("context", &self.context)
            .field("currency", &self.currency)
            .field("cart", &self.cart)
            .field("surfaces", &self.surfaces.len())
            .finish_non_exhaustive()
    }
}
