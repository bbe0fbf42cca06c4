// storefront_cart/src/error.rs

//! Error taxonomy for the cart session store.
//!
//! Every backend failure, whether a transport problem or a structured error
//! body, is normalized into a [`CartError`] by [`classify`]. UI layers only
//! ever look at [`ErrorKind`] and the message; they never see HTTP statuses.

use std::fmt;
use thiserror::Error;

/// Message used for every authentication failure, regardless of what the
/// backend put in the body.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  Unauthenticated,
  Forbidden,
  NotFound,
  Conflict,
  Unknown,
}

impl ErrorKind {
  /// Kinds that evict the stored token and send the user to the login route.
  pub fn is_auth_failure(self) -> bool {
    matches!(self, ErrorKind::Unauthenticated | ErrorKind::Forbidden)
  }

  pub fn from_status(status: u16) -> Self {
    match status {
      401 => ErrorKind::Unauthenticated,
      403 => ErrorKind::Forbidden,
      404 => ErrorKind::NotFound,
      409 => ErrorKind::Conflict,
      _ => ErrorKind::Unknown,
    }
  }
}

/// Store operation an error originated from. Drives fallback messages and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
  Fetch,
  Add,
  Update,
  Remove,
  Clear,
}

impl CartOperation {
  pub fn fallback_message(self) -> &'static str {
    match self {
      CartOperation::Fetch => "Failed to load your cart.",
      CartOperation::Add => "Failed to add item to cart.",
      CartOperation::Update => "Failed to update item quantity.",
      CartOperation::Remove => "Failed to remove item from cart.",
      CartOperation::Clear => "Failed to clear cart.",
    }
  }

  /// Stock wording for the operations that touch branch inventory.
  fn kind_message(self, kind: ErrorKind) -> Option<&'static str> {
    match (self, kind) {
      (CartOperation::Add, ErrorKind::NotFound) => Some("This item is not available at the selected branch."),
      (CartOperation::Add | CartOperation::Update, ErrorKind::Conflict) => {
        Some("The requested quantity exceeds available stock.")
      }
      _ => None,
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      CartOperation::Fetch => "fetch",
      CartOperation::Add => "add",
      CartOperation::Update => "update",
      CartOperation::Remove => "remove",
      CartOperation::Clear => "clear",
    }
  }
}

impl fmt::Display for CartOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The normalized `{message, kind}` error every store operation returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CartError {
  pub kind: ErrorKind,
  pub message: String,
}

impl CartError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self {
      kind,
      message: message.into(),
    }
  }

  /// Raised locally when no bearer token is stored.
  pub fn unauthenticated() -> Self {
    Self::new(ErrorKind::Unauthenticated, SESSION_EXPIRED_MESSAGE)
  }

  pub fn is_auth_failure(&self) -> bool {
    self.kind.is_auth_failure()
  }
}

/// Raw failure as reported by a [`crate::api::CartApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
  #[error("Backend responded with status {status}")]
  Status { status: u16, message: Option<String> },

  #[error("Transport error: {0}")]
  Transport(String),
}

impl ApiFailure {
  pub fn status(status: u16) -> Self {
    ApiFailure::Status { status, message: None }
  }

  pub fn with_message(status: u16, message: impl Into<String>) -> Self {
    ApiFailure::Status {
      status,
      message: Some(message.into()),
    }
  }
}

/// The one place HTTP semantics are turned into the store's taxonomy.
///
/// Auth failures always carry [`SESSION_EXPIRED_MESSAGE`]. Other kinds prefer
/// the server message, then the operation's wording for that kind, then the
/// operation fallback.
pub fn classify(operation: CartOperation, failure: &ApiFailure) -> CartError {
  let (kind, server_message) = match failure {
    ApiFailure::Status { status, message } => (ErrorKind::from_status(*status), message.as_deref()),
    ApiFailure::Transport(_) => (ErrorKind::Unknown, None),
  };

  if kind.is_auth_failure() {
    return CartError::new(kind, SESSION_EXPIRED_MESSAGE);
  }

  let message = server_message
    .map(str::trim)
    .filter(|m| !m.is_empty())
    .or_else(|| operation.kind_message(kind))
    .unwrap_or_else(|| operation.fallback_message());

  CartError::new(kind, message)
}

/// Failures while wiring the store up. Never returned by cart operations.
#[derive(Debug, Error)]
pub enum SetupError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Token storage error: {0}")]
  TokenStorage(#[from] std::io::Error),

  #[error("Token file is malformed: {0}")]
  TokenFormat(#[from] serde_json::Error),

  #[error("HTTP client error: {0}")]
  HttpClient(#[from] reqwest::Error),
}

pub type Result<T, E = CartError> = std::result::Result<T, E>;
