// storefront_cart/src/session/token.rs

//! Bearer token persistence.
//!
//! The store reads the token through [`TokenStore::load`] on every
//! authenticated call and never keeps its own copy, so a logout or token
//! rotation done elsewhere takes effect on the very next request.

use crate::error::SetupError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

pub trait TokenStore: Send + Sync {
  /// Returns the current bearer token, or `None` when logged out.
  fn load(&self) -> Result<Option<String>, SetupError>;

  fn save(&self, token: &str) -> Result<(), SetupError>;

  /// Removes the token. Clearing an already empty store succeeds.
  fn clear(&self) -> Result<(), SetupError>;
}

fn non_blank(token: &str) -> Option<String> {
  let trimmed = token.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Volatile token holder, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
  token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_token(token: impl Into<String>) -> Self {
    Self {
      token: RwLock::new(non_blank(&token.into())),
    }
  }
}

impl TokenStore for MemoryTokenStore {
  fn load(&self) -> Result<Option<String>, SetupError> {
    Ok(self.token.read().clone())
  }

  fn save(&self, token: &str) -> Result<(), SetupError> {
    *self.token.write() = non_blank(token);
    Ok(())
  }

  fn clear(&self) -> Result<(), SetupError> {
    *self.token.write() = None;
    Ok(())
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
  token: String,
  saved_at: DateTime<Utc>,
}

/// Token persisted as a small JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
  path: PathBuf,
}

impl FileTokenStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl TokenStore for FileTokenStore {
  #[instrument(name = "token_store::load", skip(self), fields(path = %self.path.display()), level = "debug")]
  fn load(&self) -> Result<Option<String>, SetupError> {
    let raw = match std::fs::read_to_string(&self.path) {
      Ok(raw) => raw,
      Err(e) if e.kind() == IoErrorKind::NotFound => {
        debug!("No session file present.");
        return Ok(None);
      }
      Err(e) => return Err(SetupError::TokenStorage(e)),
    };
    let stored: StoredSession = serde_json::from_str(&raw)?;
    Ok(non_blank(&stored.token))
  }

  #[instrument(name = "token_store::save", skip(self, token), fields(path = %self.path.display()))]
  fn save(&self, token: &str) -> Result<(), SetupError> {
    let Some(token) = non_blank(token) else {
      return self.clear();
    };
    if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(&StoredSession {
      token,
      saved_at: Utc::now(),
    })?;
    std::fs::write(&self.path, body)?;
    Ok(())
  }

  #[instrument(name = "token_store::clear", skip(self), fields(path = %self.path.display()))]
  fn clear(&self) -> Result<(), SetupError> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
      Err(e) => Err(SetupError::TokenStorage(e)),
    }
  }
}
