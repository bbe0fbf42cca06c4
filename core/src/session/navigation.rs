// storefront_cart/src/session/navigation.rs

use tracing::info;

/// Destinations the store can force the UI to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
  Login,
  Checkout,
}

/// Path for each [`Route`]. Hosts can mount the storefront under a prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
  pub login: String,
  pub checkout: String,
}

impl Default for RouteTable {
  fn default() -> Self {
    Self {
      login: "/login".to_string(),
      checkout: "/checkout".to_string(),
    }
  }
}

impl RouteTable {
  pub fn path(&self, route: Route) -> &str {
    match route {
      Route::Login => &self.login,
      Route::Checkout => &self.checkout,
    }
  }
}

/// Routing collaborator. The store only ever calls `navigate`; it does not
/// care whether that swaps a page, prints a hint, or records the call.
pub trait Navigator: Send + Sync {
  fn navigate(&self, route: Route);
}

/// Navigator for headless hosts: it logs where the user should go.
#[derive(Debug, Clone, Default)]
pub struct LoggingNavigator {
  routes: RouteTable,
}

impl LoggingNavigator {
  pub fn new(routes: RouteTable) -> Self {
    Self { routes }
  }
}

impl Navigator for LoggingNavigator {
  fn navigate(&self, route: Route) {
    info!(route = ?route, path = %self.routes.path(route), "Navigation requested.");
  }
}
