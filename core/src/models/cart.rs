// storefront_cart/src/models/cart.rs

use super::cart_item::CartItem;
use super::ids::{CartId, CartItemId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A server-owned cart. Items keep the order the backend returned them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
  pub cart_id: CartId,
  pub user_id: UserId,
  #[serde(default)]
  pub items: Vec<CartItem>,
}

impl Cart {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Sum of quantities, which is what the navbar badge shows.
  pub fn item_count(&self) -> u32 {
    self.items.iter().map(|item| u32::from(item.quantity.get())).sum()
  }

  pub fn total(&self) -> Decimal {
    self.items.iter().map(CartItem::line_total).sum()
  }

  pub fn contains_item(&self, cart_item_id: CartItemId) -> bool {
    self.items.iter().any(|item| item.cart_item_id == cart_item_id)
  }

  pub fn item(&self, cart_item_id: CartItemId) -> Option<&CartItem> {
    self.items.iter().find(|item| item.cart_item_id == cart_item_id)
  }

  /// Carts are branch-scoped; the branch is read off the first item.
  pub fn branch_name(&self) -> Option<&str> {
    self.items.first().map(|item| item.branch_name.as_str())
  }
}
