// src/lib.rs

//! storefront_cart: the client-side cart session core of an online pharmacy
//! storefront.
//!
//! The crate keeps one authoritative in-memory mirror of the signed-in
//! user's carts and funnels every change through the remote REST backend:
//!  - Every write (add, update, remove, clear) is followed by a full
//!    re-fetch; nothing is mutated optimistically.
//!  - Backend failures are normalized into a `{kind, message}` error by a
//!    single classifier.
//!  - Authentication failures evict the bearer token and redirect to login.
//!  - Consumers (cart page, navbar badge) subscribe to snapshots instead of
//!    reaching into shared globals.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::api::{CartApi, HttpCartApi};
pub use crate::config::StoreConfig;
pub use crate::error::{classify, ApiFailure, CartError, CartOperation, ErrorKind, SetupError};
pub use crate::models::{Cart, CartId, CartItem, CartItemId, CartItemReceipt, InventoryId, Quantity, UserId};
pub use crate::session::{FileTokenStore, LoggingNavigator, MemoryTokenStore, Navigator, Route, RouteTable, TokenStore};
pub use crate::store::{CartSessionStore, CartSnapshot, CartSummary, FetchOutcome, SubscriptionId};

/*
    Typical wiring:
    1. Build a `StoreConfig` (usually `StoreConfig::from_env()`).
    2. `CartSessionStore::from_config(&config)`, or `CartSessionStore::new`
       with custom `CartApi` / `TokenStore` / `Navigator` implementations.
    3. `store.subscribe(...)` from every view that renders cart state.
    4. `store.fetch_carts().await` on page load; call the mutation methods
       from UI events and show `CartError::message` on failure.
*/
