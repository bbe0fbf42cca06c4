// storefront_cart/src/models/receipt.rs

use super::ids::{CartId, CartItemId};
use serde::{Deserialize, Serialize};

/// What `POST /cart-items` hands back. Backends differ in how much they echo,
/// so both fields are optional and anything else is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemReceipt {
  #[serde(default)]
  pub cart_id: Option<CartId>,
  #[serde(default, alias = "id")]
  pub cart_item_id: Option<CartItemId>,
}
