// storefront_cart/src/models/envelope.rs

use serde::Deserialize;

/// Response bodies arrive either bare or wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
  Wrapped { data: T },
  Bare(T),
}

impl<T> Envelope<T> {
  pub fn into_inner(self) -> T {
    match self {
      Envelope::Wrapped { data } => data,
      Envelope::Bare(inner) => inner,
    }
  }
}

/// Structured error body. The backend uses either `message` or `error`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  error: Option<String>,
}

impl ErrorBody {
  pub(crate) fn into_message(self) -> Option<String> {
    self
      .message
      .or(self.error)
      .map(|m| m.trim().to_string())
      .filter(|m| !m.is_empty())
  }
}

/// Pulls a human readable message out of an error response body, if any.
pub(crate) fn error_message_from_body(body: &str) -> Option<String> {
  if body.trim().is_empty() {
    return None;
  }
  serde_json::from_str::<Envelope<ErrorBody>>(body)
    .ok()
    .and_then(|env| env.into_inner().into_message())
}
