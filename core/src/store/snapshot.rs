// storefront_cart/src/store/snapshot.rs

use crate::error::CartError;
use crate::models::{Cart, CartId};
use rust_decimal::Decimal;

/// Whether `fetch_carts` actually went to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
  Refreshed,
  /// Another fetch was already running; this call did nothing.
  AlreadyInFlight,
}

/// Everything a consumer can observe about the cart session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartSnapshot {
  pub carts: Vec<Cart>,
  pub selected_cart_id: Option<CartId>,
  /// True while at least one re-fetch is outstanding.
  pub loading: bool,
  pub error: Option<CartError>,
}

impl CartSnapshot {
  pub fn cart(&self, cart_id: CartId) -> Option<&Cart> {
    self.carts.iter().find(|cart| cart.cart_id == cart_id)
  }

  pub fn selected_cart(&self) -> Option<&Cart> {
    self.selected_cart_id.and_then(|id| self.cart(id))
  }

  pub fn summary(&self) -> CartSummary {
    let selected = self.selected_cart();
    CartSummary {
      cart_count: self.carts.len(),
      item_count: self.carts.iter().map(Cart::item_count).sum(),
      selected_item_count: selected.map_or(0, Cart::item_count),
      selected_total: selected.map_or(Decimal::ZERO, Cart::total),
    }
  }
}

/// Derived figures for the navbar badge and the cart summary panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartSummary {
  pub cart_count: usize,
  pub item_count: u32,
  pub selected_item_count: u32,
  pub selected_total: Decimal,
}

/// Picks the active cart.
///
/// The first preferred id that is still loaded wins. Otherwise the first
/// cart holding items, then the first cart at all. `None` only when `carts`
/// is empty.
pub fn resolve_selection(carts: &[Cart], preferred: impl IntoIterator<Item = CartId>) -> Option<CartId> {
  preferred
    .into_iter()
    .find(|id| carts.iter().any(|cart| cart.cart_id == *id))
    .or_else(|| carts.iter().find(|cart| !cart.is_empty()).map(|cart| cart.cart_id))
    .or_else(|| carts.first().map(|cart| cart.cart_id))
}
