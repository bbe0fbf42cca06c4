// storefront_cart/src/models/cart_item.rs

use super::ids::{CartItemId, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One product line inside a cart, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
  pub cart_item_id: CartItemId,
  pub product_name: String,
  /// Unit price. Currency is a display concern and is not tracked here.
  pub price: Decimal,
  pub unit: String,
  pub quantity: Quantity,
  #[serde(default)]
  pub product_image_url: Option<String>,
  pub branch_name: String,
  pub added_at: DateTime<Utc>,
}

impl CartItem {
  pub fn line_total(&self) -> Decimal {
    self.price * Decimal::from(self.quantity.get())
  }
}
