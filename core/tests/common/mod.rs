// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use storefront_cart::{
  ApiFailure, Cart, CartApi, CartId, CartItem, CartItemId, CartItemReceipt, CartSessionStore, InventoryId,
  MemoryTokenStore, Navigator, Quantity, Route, TokenStore, UserId,
};
use tokio::sync::Notify;
use tracing::Level;

pub const VALID_TOKEN: &str = "token-abc";
pub const USER: UserId = UserId(3);

// --- Scripted in-memory backend ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
  List,
  Add,
  Update,
  Remove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
  pub kind: CallKind,
  pub token: String,
  pub target: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InventoryRecord {
  pub product_name: &'static str,
  pub price: i64,
  pub unit: &'static str,
  pub branch_name: &'static str,
  pub cart_id: CartId,
  pub stock: u8,
}

#[derive(Default)]
struct BackendState {
  accepted_token: String,
  carts: Vec<Cart>,
  inventory: HashMap<InventoryId, InventoryRecord>,
  item_inventory: HashMap<CartItemId, InventoryId>,
  next_item_id: i64,
  calls: Vec<RecordedCall>,
  // (kind, 1-based occurrence, failure)
  scripted_failures: Vec<(CallKind, usize, ApiFailure)>,
}

/// Lets a test park the next `list_carts` call mid-flight.
#[derive(Default)]
pub struct FetchGate {
  pub entered: Notify,
  pub release: Notify,
}

pub struct FakeBackend {
  state: Mutex<BackendState>,
  gate: Mutex<Option<Arc<FetchGate>>>,
}

impl FakeBackend {
  /// Backend with a small pharmacy catalog and no carts yet.
  pub fn new() -> Arc<Self> {
    let mut inventory = HashMap::new();
    inventory.insert(
      InventoryId(42),
      InventoryRecord {
        product_name: "Paracetamol 500mg",
        price: 10000,
        unit: "strip",
        branch_name: "Kemang",
        cart_id: CartId(7),
        stock: 10,
      },
    );
    inventory.insert(
      InventoryId(43),
      InventoryRecord {
        product_name: "Vitamin C 1000mg",
        price: 25000,
        unit: "bottle",
        branch_name: "Kemang",
        cart_id: CartId(7),
        stock: 2,
      },
    );
    inventory.insert(
      InventoryId(50),
      InventoryRecord {
        product_name: "Masker Medis",
        price: 5000,
        unit: "box",
        branch_name: "Cipete",
        cart_id: CartId(9),
        stock: 100,
      },
    );

    Arc::new(Self {
      state: Mutex::new(BackendState {
        accepted_token: VALID_TOKEN.to_string(),
        inventory,
        next_item_id: 101,
        ..Default::default()
      }),
      gate: Mutex::new(None),
    })
  }

  /// Seeds an item directly on the "server" without going through the store.
  pub fn seed_item(&self, inventory_id: InventoryId, quantity: u8) -> CartItemId {
    let mut state = self.state.lock();
    insert_item(&mut state, inventory_id, quantity).expect("seeding a known inventory record")
  }

  pub fn seed_empty_cart(&self, cart_id: CartId) {
    let mut state = self.state.lock();
    ensure_cart(&mut state, cart_id);
  }

  pub fn rotate_token(&self, token: &str) {
    self.state.lock().accepted_token = token.to_string();
  }

  /// Makes the next call of `kind` fail with `failure`.
  pub fn fail_next(&self, kind: CallKind, failure: ApiFailure) {
    let mut state = self.state.lock();
    let occurrence = count_kind(&state.calls, kind) + 1;
    state.scripted_failures.push((kind, occurrence, failure));
  }

  /// Makes the `n`-th call (1-based, counted from now) of `kind` fail.
  pub fn fail_nth(&self, kind: CallKind, n: usize, failure: ApiFailure) {
    let mut state = self.state.lock();
    let occurrence = count_kind(&state.calls, kind) + n;
    state.scripted_failures.push((kind, occurrence, failure));
  }

  pub fn hold_fetches(&self) -> Arc<FetchGate> {
    let gate = Arc::new(FetchGate::default());
    *self.gate.lock() = Some(Arc::clone(&gate));
    gate
  }

  pub fn carts(&self) -> Vec<Cart> {
    self.state.lock().carts.clone()
  }

  pub fn calls(&self) -> Vec<RecordedCall> {
    self.state.lock().calls.clone()
  }

  pub fn count(&self, kind: CallKind) -> usize {
    count_kind(&self.state.lock().calls, kind)
  }

  pub fn clear_calls(&self) {
    let mut state = self.state.lock();
    state.calls.clear();
    state.scripted_failures.clear();
  }

  /// Records the call and applies auth plus scripted failures.
  fn begin(&self, kind: CallKind, token: &str, target: Option<i64>) -> Result<(), ApiFailure> {
    let mut state = self.state.lock();
    state.calls.push(RecordedCall {
      kind,
      token: token.to_string(),
      target,
    });
    if token != state.accepted_token {
      return Err(ApiFailure::with_message(401, "invalid or expired token"));
    }
    let occurrence = count_kind(&state.calls, kind);
    if let Some(pos) = state
      .scripted_failures
      .iter()
      .position(|(k, n, _)| *k == kind && *n == occurrence)
    {
      let (_, _, failure) = state.scripted_failures.remove(pos);
      return Err(failure);
    }
    Ok(())
  }
}

fn count_kind(calls: &[RecordedCall], kind: CallKind) -> usize {
  calls.iter().filter(|c| c.kind == kind).count()
}

fn ensure_cart(state: &mut BackendState, cart_id: CartId) -> &mut Cart {
  if let Some(pos) = state.carts.iter().position(|c| c.cart_id == cart_id) {
    return &mut state.carts[pos];
  }
  state.carts.push(Cart {
    cart_id,
    user_id: USER,
    items: Vec::new(),
  });
  state.carts.last_mut().unwrap()
}

fn insert_item(state: &mut BackendState, inventory_id: InventoryId, quantity: u8) -> Result<CartItemId, ApiFailure> {
  let record = state
    .inventory
    .get(&inventory_id)
    .cloned()
    .ok_or_else(|| ApiFailure::status(404))?;

  let existing = state
    .item_inventory
    .iter()
    .find(|(_, inv)| **inv == inventory_id)
    .map(|(id, _)| *id);

  if let Some(cart_item_id) = existing {
    let cart = ensure_cart(state, record.cart_id);
    if let Some(item) = cart.items.iter_mut().find(|i| i.cart_item_id == cart_item_id) {
      let combined = item.quantity.get() + quantity;
      if combined > record.stock {
        return Err(ApiFailure::with_message(409, format!("Only {} left in stock", record.stock)));
      }
      item.quantity = Quantity::new(i64::from(combined)).unwrap();
      return Ok(cart_item_id);
    }
  }

  if quantity > record.stock {
    return Err(ApiFailure::with_message(409, format!("Only {} left in stock", record.stock)));
  }

  let cart_item_id = CartItemId(state.next_item_id);
  state.next_item_id += 1;
  state.item_inventory.insert(cart_item_id, inventory_id);
  let cart = ensure_cart(state, record.cart_id);
  cart.items.push(CartItem {
    cart_item_id,
    product_name: record.product_name.to_string(),
    price: Decimal::from(record.price),
    unit: record.unit.to_string(),
    quantity: Quantity::new(i64::from(quantity)).unwrap(),
    product_image_url: None,
    branch_name: record.branch_name.to_string(),
    added_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
  });
  Ok(cart_item_id)
}

#[async_trait]
impl CartApi for FakeBackend {
  async fn list_carts(&self, token: &str) -> Result<Vec<Cart>, ApiFailure> {
    let gate = self.gate.lock().take();
    if let Some(gate) = gate {
      gate.entered.notify_one();
      gate.release.notified().await;
    }
    self.begin(CallKind::List, token, None)?;
    Ok(self.state.lock().carts.clone())
  }

  async fn add_item(
    &self,
    token: &str,
    inventory_id: InventoryId,
    quantity: Quantity,
  ) -> Result<CartItemReceipt, ApiFailure> {
    self.begin(CallKind::Add, token, Some(inventory_id.0))?;
    let mut state = self.state.lock();
    let cart_item_id = insert_item(&mut state, inventory_id, quantity.get())?;
    let cart_id = state.inventory[&inventory_id].cart_id;
    Ok(CartItemReceipt {
      cart_id: Some(cart_id),
      cart_item_id: Some(cart_item_id),
    })
  }

  async fn update_item(&self, token: &str, cart_item_id: CartItemId, quantity: Quantity) -> Result<(), ApiFailure> {
    self.begin(CallKind::Update, token, Some(cart_item_id.0))?;
    let mut state = self.state.lock();
    let inventory_id = *state
      .item_inventory
      .get(&cart_item_id)
      .ok_or_else(|| ApiFailure::with_message(404, "Cart item not found"))?;
    let stock = state.inventory[&inventory_id].stock;
    if quantity.get() > stock {
      return Err(ApiFailure::with_message(409, format!("Only {stock} left in stock")));
    }
    // This backend drops lines that reach zero.
    for cart in state.carts.iter_mut() {
      if quantity.get() == 0 {
        cart.items.retain(|i| i.cart_item_id != cart_item_id);
      } else if let Some(item) = cart.items.iter_mut().find(|i| i.cart_item_id == cart_item_id) {
        item.quantity = quantity;
      }
    }
    if quantity.get() == 0 {
      state.item_inventory.remove(&cart_item_id);
    }
    Ok(())
  }

  async fn remove_item(&self, token: &str, cart_item_id: CartItemId) -> Result<(), ApiFailure> {
    self.begin(CallKind::Remove, token, Some(cart_item_id.0))?;
    let mut state = self.state.lock();
    if state.item_inventory.remove(&cart_item_id).is_none() {
      return Err(ApiFailure::status(404));
    }
    for cart in state.carts.iter_mut() {
      cart.items.retain(|i| i.cart_item_id != cart_item_id);
    }
    Ok(())
  }
}

// --- Recording navigator ---

#[derive(Default)]
pub struct RecordingNavigator {
  routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
  pub fn routes(&self) -> Vec<Route> {
    self.routes.lock().clone()
  }
}

impl Navigator for RecordingNavigator {
  fn navigate(&self, route: Route) {
    self.routes.lock().push(route);
  }
}

// --- Harness ---

pub struct Harness {
  pub store: CartSessionStore,
  pub backend: Arc<FakeBackend>,
  pub tokens: Arc<MemoryTokenStore>,
  pub navigator: Arc<RecordingNavigator>,
}

impl Harness {
  pub fn logged_in() -> Self {
    Self::build(Some(VALID_TOKEN))
  }

  pub fn logged_out() -> Self {
    Self::build(None)
  }

  fn build(token: Option<&str>) -> Self {
    let backend = FakeBackend::new();
    let tokens = Arc::new(token.map(MemoryTokenStore::with_token).unwrap_or_default());
    let navigator = Arc::new(RecordingNavigator::default());
    let store = CartSessionStore::new(backend.clone(), tokens.clone(), navigator.clone());
    Self {
      store,
      backend,
      tokens,
      navigator,
    }
  }

  pub fn token(&self) -> Option<String> {
    self.tokens.load().unwrap()
  }
}

pub fn qty(n: i64) -> Quantity {
  Quantity::new(n).unwrap()
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
