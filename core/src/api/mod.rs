// storefront_cart/src/api/mod.rs

//! The backend seam.
//!
//! The store only knows [`CartApi`]. The production implementation is
//! [`HttpCartApi`]; tests and embedders can supply their own.

pub mod http;

use crate::error::ApiFailure;
use crate::models::{Cart, CartItemId, CartItemReceipt, InventoryId, Quantity};
use async_trait::async_trait;

pub use http::HttpCartApi;

/// Authenticated cart endpoints. Every call receives the bearer token
/// explicitly so that implementations never hold on to credentials.
#[async_trait]
pub trait CartApi: Send + Sync {
  /// `GET /cart`
  async fn list_carts(&self, token: &str) -> Result<Vec<Cart>, ApiFailure>;

  /// `POST /cart-items` with `{inventoryId, quantity}`
  async fn add_item(
    &self,
    token: &str,
    inventory_id: InventoryId,
    quantity: Quantity,
  ) -> Result<CartItemReceipt, ApiFailure>;

  /// `PUT /cart-items/{id}` with `{quantity}`
  async fn update_item(&self, token: &str, cart_item_id: CartItemId, quantity: Quantity) -> Result<(), ApiFailure>;

  /// `DELETE /cart-items/{id}`
  async fn remove_item(&self, token: &str, cart_item_id: CartItemId) -> Result<(), ApiFailure>;
}
