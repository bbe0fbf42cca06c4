// storefront_cart/src/store/mod.rs

//! The cart session store.
//!
//! `CartSessionStore` is the single in-memory mirror of the user's carts.
//! It never mutates carts locally: every write goes to the backend and is
//! followed by a full re-fetch, and the store only ever shows what that
//! re-fetch returned.
//!
//! Flow of a mutation:
//!  1. Read the bearer token from the [`TokenStore`] (never cached).
//!  2. Issue the write through [`CartApi`].
//!  3. Re-fetch all carts and await the result, so a caller awaiting the
//!     mutation observes a snapshot that already reflects it.
//!  4. Notify subscribers with the new [`CartSnapshot`].
//!
//! Failures go through [`classify`]. Auth failures additionally evict the
//! token, drop the cached carts and navigate to [`Route::Login`].

pub mod listeners;
pub mod snapshot;

use crate::api::{CartApi, HttpCartApi};
use crate::config::StoreConfig;
use crate::error::{classify, ApiFailure, CartError, CartOperation, ErrorKind, Result, SetupError};
use crate::models::{CartId, CartItemId, CartItemReceipt, InventoryId, Quantity};
use crate::session::{FileTokenStore, LoggingNavigator, Navigator, Route, TokenStore};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

pub use listeners::{Listener, SubscriptionId};
pub use snapshot::{resolve_selection, CartSnapshot, CartSummary, FetchOutcome};

use listeners::ListenerRegistry;

/// Marks a user-triggered fetch as running; cleared on drop.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
  fn acquire(flag: &'a AtomicBool) -> Option<Self> {
    flag
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .ok()
      .map(|_| InFlightGuard(flag))
  }
}

impl Drop for InFlightGuard<'_> {
  fn drop(&mut self) {
    self.0.store(false, Ordering::Release);
  }
}

/// Counts one running re-fetch. Released on drop, including when the call is cancelled.
struct PendingSync<'a>(&'a AtomicUsize);

impl<'a> PendingSync<'a> {
  fn start(counter: &'a AtomicUsize) -> Self {
    counter.fetch_add(1, Ordering::AcqRel);
    PendingSync(counter)
  }
}

impl Drop for PendingSync<'_> {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::AcqRel);
  }
}

/// Shared, cheaply clonable handle. Every clone sees the same carts.
#[derive(Clone)]
pub struct CartSessionStore {
  api: Arc<dyn CartApi>,
  tokens: Arc<dyn TokenStore>,
  navigator: Arc<dyn Navigator>,
  /// Blocking lock: guards are always dropped before an `.await`.
  state: Arc<RwLock<CartSnapshot>>,
  listeners: Arc<ListenerRegistry>,
  fetch_in_flight: Arc<AtomicBool>,
  pending_syncs: Arc<AtomicUsize>,
}

impl CartSessionStore {
  pub fn new(api: Arc<dyn CartApi>, tokens: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
    Self {
      api,
      tokens,
      navigator,
      state: Arc::default(),
      listeners: Arc::new(ListenerRegistry::default()),
      fetch_in_flight: Arc::new(AtomicBool::new(false)),
      pending_syncs: Arc::new(AtomicUsize::new(0)),
    }
  }

  /// Wires the HTTP client, the on-disk token store and the logging navigator.
  pub fn from_config(config: &StoreConfig) -> std::result::Result<Self, SetupError> {
    let api = HttpCartApi::new(&config.api_base_url, config.request_timeout)?;
    Ok(Self::new(
      Arc::new(api),
      Arc::new(FileTokenStore::new(config.token_path.clone())),
      Arc::new(LoggingNavigator::new(config.routes.clone())),
    ))
  }

  // --- Observation ---

  pub fn snapshot(&self) -> CartSnapshot {
    self.state.read().clone()
  }

  pub fn summary(&self) -> CartSummary {
    self.state.read().summary()
  }

  pub fn selected_cart_id(&self) -> Option<CartId> {
    self.state.read().selected_cart_id
  }

  /// Registers a listener that receives every new snapshot.
  ///
  /// Listeners run on the task that changed the state, after the lock is
  /// released, so they may call back into the store's sync methods.
  pub fn subscribe(&self, listener: impl Fn(&CartSnapshot) + Send + Sync + 'static) -> SubscriptionId {
    self.listeners.add(Arc::new(listener))
  }

  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    self.listeners.remove(id)
  }

  pub fn subscriber_count(&self) -> usize {
    self.listeners.len()
  }

  // --- Operations ---

  /// Loads the user's carts, replacing the whole collection.
  ///
  /// A call made while another fetch is still running returns
  /// [`FetchOutcome::AlreadyInFlight`] without touching the backend.
  #[instrument(name = "cart_store::fetch_carts", skip(self), err(Display))]
  pub async fn fetch_carts(&self) -> Result<FetchOutcome> {
    let Some(_in_flight) = InFlightGuard::acquire(&self.fetch_in_flight) else {
      debug!("Fetch already in flight, coalescing duplicate call.");
      return Ok(FetchOutcome::AlreadyInFlight);
    };
    self.resync(None).await?;
    Ok(FetchOutcome::Refreshed)
  }

  /// Adds `quantity` of an inventory record and selects the cart it landed in.
  #[instrument(name = "cart_store::add_to_cart", skip_all, fields(%inventory_id, %quantity), err(Display))]
  pub async fn add_to_cart(&self, inventory_id: InventoryId, quantity: Quantity) -> Result<CartItemReceipt> {
    let operation = CartOperation::Add;
    let token = self.require_token(operation)?;

    let receipt = self
      .api
      .add_item(&token, inventory_id, quantity)
      .await
      .map_err(|failure| self.fail(operation, failure))?;
    info!(cart_id = ?receipt.cart_id, cart_item_id = ?receipt.cart_item_id, "Item added to cart.");

    self.resync(receipt.cart_id).await?;
    Ok(receipt)
  }

  /// Sets an item's quantity. Zero is sent as-is; the backend decides
  /// whether the line survives.
  #[instrument(name = "cart_store::update_cart_item", skip_all, fields(%cart_item_id, %quantity), err(Display))]
  pub async fn update_cart_item(&self, cart_item_id: CartItemId, quantity: Quantity) -> Result<()> {
    let operation = CartOperation::Update;
    let token = self.require_token(operation)?;

    self
      .api
      .update_item(&token, cart_item_id, quantity)
      .await
      .map_err(|failure| self.fail(operation, failure))?;
    info!("Cart item quantity updated.");

    self.resync(None).await
  }

  #[instrument(name = "cart_store::remove_cart_item", skip_all, fields(%cart_item_id), err(Display))]
  pub async fn remove_cart_item(&self, cart_item_id: CartItemId) -> Result<()> {
    let operation = CartOperation::Remove;
    let token = self.require_token(operation)?;

    self
      .api
      .remove_item(&token, cart_item_id)
      .await
      .map_err(|failure| self.fail(operation, failure))?;
    info!("Cart item removed.");

    self.resync(None).await
  }

  /// Deletes every item of the selected cart, one request per item, and
  /// returns how many deletions succeeded.
  ///
  /// Stops at the first failed deletion. Unless that failure ended the
  /// session, the store re-fetches before returning the error, so the local
  /// mirror matches whatever the backend actually kept.
  #[instrument(name = "cart_store::clear_cart", skip(self), err(Display))]
  pub async fn clear_cart(&self) -> Result<usize> {
    let operation = CartOperation::Clear;
    let targets: Vec<CartItemId> = {
      let guard = self.state.read();
      guard
        .selected_cart()
        .map(|cart| cart.items.iter().map(|item| item.cart_item_id).collect())
        .unwrap_or_default()
    }; // guard dropped

    if targets.is_empty() {
      debug!("Selected cart is empty, nothing to clear.");
      return Ok(0);
    }
    let token = self.require_token(operation)?;

    let mut removed = 0usize;
    let mut failure = None;
    for cart_item_id in &targets {
      match self.api.remove_item(&token, *cart_item_id).await {
        Ok(()) => removed += 1,
        Err(api_failure) => {
          failure = Some(self.fail(operation, api_failure));
          break;
        }
      }
    }

    let Some(err) = failure else {
      info!(removed, "Cart cleared.");
      self.resync(None).await?;
      return Ok(removed);
    };

    if err.is_auth_failure() {
      return Err(err);
    }

    warn!(removed, total = targets.len(), "Clearing stopped early, reconciling with backend.");
    match self.resync(None).await {
      Ok(()) => {
        // The reconcile cleared the error; the caller still needs to see it.
        self.update(|snapshot| snapshot.error = Some(err.clone()));
        Err(err)
      }
      Err(resync_err) if resync_err.is_auth_failure() => Err(resync_err),
      Err(resync_err) => {
        warn!(error = %resync_err, "Reconcile after partial clear failed as well.");
        Err(err)
      }
    }
  }

  /// Makes a loaded cart the active one.
  pub fn select_cart(&self, cart_id: CartId) -> Result<()> {
    {
      let mut guard = self.state.write();
      if guard.cart(cart_id).is_none() {
        return Err(CartError::new(
          ErrorKind::NotFound,
          format!("Cart {cart_id} is not loaded."),
        ));
      }
      if guard.selected_cart_id == Some(cart_id) {
        return Ok(());
      }
      guard.selected_cart_id = Some(cart_id);
    }
    debug!(%cart_id, "Cart selected.");
    self.notify();
    Ok(())
  }

  /// Sends the user to checkout with the selected cart.
  pub fn proceed_to_checkout(&self) -> Result<CartId> {
    let ready = {
      let guard = self.state.read();
      guard.selected_cart().filter(|cart| !cart.is_empty()).map(|cart| cart.cart_id)
    };
    let cart_id = ready.ok_or_else(|| CartError::new(ErrorKind::NotFound, "Your cart is empty."))?;
    info!(%cart_id, "Proceeding to checkout.");
    self.navigator.navigate(Route::Checkout);
    Ok(cart_id)
  }

  /// Ends the session locally: forgets the token and the cached carts.
  pub fn logout(&self) {
    if let Err(e) = self.tokens.clear() {
      warn!(error = %e, "Failed to clear stored token during logout.");
    }
    self.update(|snapshot| *snapshot = CartSnapshot::default());
    info!("Cart session logged out.");
  }

  // --- Internals ---

  /// Replaces the cart collection with the backend's. Never coalesced:
  /// mutations rely on it having run before they resolve.
  async fn resync(&self, preferred: Option<CartId>) -> Result<()> {
    let operation = CartOperation::Fetch;
    let token = self.require_token(operation)?;

    let pending = PendingSync::start(&self.pending_syncs);
    self.update(|snapshot| snapshot.loading = true);
    let listed = self.api.list_carts(&token).await;
    drop(pending);
    let carts = listed.map_err(|failure| self.fail(operation, failure))?;

    let cart_count = carts.len();
    let loading = self.syncs_pending();
    self.update(|snapshot| {
      snapshot.selected_cart_id = resolve_selection(&carts, preferred.into_iter().chain(snapshot.selected_cart_id));
      snapshot.carts = carts;
      snapshot.loading = loading;
      snapshot.error = None;
    });
    info!(cart_count, "Carts synchronized with backend.");
    Ok(())
  }

  fn require_token(&self, operation: CartOperation) -> Result<String> {
    let token = self.tokens.load().unwrap_or_else(|e| {
      warn!(error = %e, "Could not read stored token, treating session as logged out.");
      None
    });
    match token {
      Some(token) => Ok(token),
      None => Err(self.end_session(operation, CartError::unauthenticated())),
    }
  }

  /// Classifies a backend failure and records it in the snapshot.
  fn fail(&self, operation: CartOperation, failure: ApiFailure) -> CartError {
    let err = classify(operation, &failure);
    if err.is_auth_failure() {
      return self.end_session(operation, err);
    }

    warn!(%operation, kind = ?err.kind, cause = %failure, message = %err.message, "Cart operation failed.");
    let loading = self.syncs_pending();
    self.update(|snapshot| {
      snapshot.loading = loading;
      snapshot.error = Some(err.clone());
      if operation == CartOperation::Fetch {
        snapshot.carts.clear();
        snapshot.selected_cart_id = None;
      }
    });
    err
  }

  /// Token eviction, cache drop and login redirect for any auth failure.
  fn end_session(&self, operation: CartOperation, err: CartError) -> CartError {
    error!(%operation, kind = ?err.kind, "Authentication failed, ending cart session.");
    if let Err(e) = self.tokens.clear() {
      warn!(error = %e, "Failed to clear stored token.");
    }
    let loading = self.syncs_pending();
    self.update(|snapshot| {
      snapshot.carts.clear();
      snapshot.selected_cart_id = None;
      snapshot.loading = loading;
      snapshot.error = Some(err.clone());
    });
    self.navigator.navigate(Route::Login);
    err
  }

  /// `loading` stays set while any re-fetch, user-triggered or not, is outstanding.
  fn syncs_pending(&self) -> bool {
    self.pending_syncs.load(Ordering::Acquire) > 0
  }

  fn update(&self, mutate: impl FnOnce(&mut CartSnapshot)) {
    let published = {
      let mut guard = self.state.write();
      mutate(&mut guard);
      guard.clone()
    }; // guard dropped before listeners run
    self.listeners.notify(&published);
  }

  fn notify(&self) {
    let published = self.snapshot();
    self.listeners.notify(&published);
  }
}
