// storefront_cart/src/models/mod.rs

//! Client-side projections of backend cart data.
//!
//! Nothing in here is ever built by the store from scratch: every value is
//! the result of deserializing a backend response.

pub mod cart;
pub mod cart_item;
pub mod envelope;
pub mod ids;
pub mod receipt;

pub use cart::Cart;
pub use cart_item::CartItem;
pub use envelope::Envelope;
pub use ids::{CartId, CartItemId, InventoryId, Quantity, QuantityOutOfRange, UserId};
pub use receipt::CartItemReceipt;
