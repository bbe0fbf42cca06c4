// storefront_cart/src/session/mod.rs

//! Session collaborators: where the bearer token lives and how the user is
//! sent elsewhere when the session is gone.

pub mod navigation;
pub mod token;

pub use navigation::{LoggingNavigator, Navigator, Route, RouteTable};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
