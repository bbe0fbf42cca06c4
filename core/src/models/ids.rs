// storefront_cart/src/models/ids.rs

//! Identifier and quantity newtypes shared by every cart projection.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

macro_rules! backend_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
      }
    }

    impl From<i64> for $name {
      fn from(raw: i64) -> Self {
        Self(raw)
      }
    }
  };
}

backend_id!(
  /// Branch-scoped cart identifier assigned by the backend.
  CartId
);
backend_id!(
  /// Identifier of one line in a cart. Stable across re-fetches.
  CartItemId
);
backend_id!(
  /// Identifier of a branch inventory record, used when adding to a cart.
  InventoryId
);
backend_id!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Quantity {requested} is outside the allowed range 0..={max}")]
pub struct QuantityOutOfRange {
  pub requested: i64,
  pub max: u8,
}

/// An item quantity, guaranteed to lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Quantity(u8);

impl Quantity {
  pub const MAX: u8 = 100;
  pub const ZERO: Quantity = Quantity(0);

  pub fn new(requested: i64) -> Result<Self, QuantityOutOfRange> {
    if (0..=i64::from(Self::MAX)).contains(&requested) {
      Ok(Self(requested as u8))
    } else {
      Err(QuantityOutOfRange {
        requested,
        max: Self::MAX,
      })
    }
  }

  pub fn get(self) -> u8 {
    self.0
  }
}

impl fmt::Display for Quantity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.0, f)
  }
}

impl TryFrom<i64> for Quantity {
  type Error = QuantityOutOfRange;

  fn try_from(requested: i64) -> Result<Self, Self::Error> {
    Self::new(requested)
  }
}

impl<'de> Deserialize<'de> for Quantity {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let raw = i64::deserialize(deserializer)?;
    Quantity::new(raw).map_err(serde::de::Error::custom)
  }
}
