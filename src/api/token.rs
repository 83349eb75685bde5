//! Bearer token storage.
//!
//! The token lives outside the client: it is read before every outbound
//! request, so a `login` in another terminal takes effect without restarting.

use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Key-value holder for the bearer token.
pub trait TokenStore: Send + Sync {
  /// Current token, if any. Absence simply omits the auth header.
  fn token(&self) -> Option<String>;

  /// Persist a new token.
  fn store(&self, token: &str) -> Result<()>;

  /// Forget the stored token.
  fn clear(&self) -> Result<()>;
}

/// Token store backed by a file in the user data directory.
pub struct FileTokenStore {
  path: PathBuf,
}

impl FileTokenStore {
  /// Open the store at the default location.
  pub fn open() -> Result<Self> {
    Ok(Self::at(Self::default_path()?))
  }

  pub fn at(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("backoffice").join("token"))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl TokenStore for FileTokenStore {
  fn token(&self) -> Option<String> {
    // An explicit env token beats the file
    if let Ok(token) = std::env::var("BACKOFFICE_TOKEN") {
      if !token.trim().is_empty() {
        return Some(token.trim().to_string());
      }
    }

    let contents = std::fs::read_to_string(&self.path).ok()?;
    let token = contents.trim();
    (!token.is_empty()).then(|| token.to_string())
  }

  fn store(&self, token: &str) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create token directory: {}", e))?;
    }
    std::fs::write(&self.path, token)
      .map_err(|e| eyre!("Failed to write token to {}: {}", self.path.display(), e))
  }

  fn clear(&self) -> Result<()> {
    match std::fs::remove_file(&self.path) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(e) => Err(eyre!(
        "Failed to remove token {}: {}",
        self.path.display(),
        e
      )),
    }
  }
}

/// In-memory token store, for tests and one-shot sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
  token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_token(token: &str) -> Self {
    Self {
      token: Mutex::new(Some(token.to_string())),
    }
  }
}

impl MemoryTokenStore {
  fn slot(&self) -> MutexGuard<'_, Option<String>> {
    self
      .token
      .lock()
      .unwrap_or_else(|poisoned| poisoned.into_inner())
  }
}

impl TokenStore for MemoryTokenStore {
  fn token(&self) -> Option<String> {
    self.slot().clone()
  }

  fn store(&self, token: &str) -> Result<()> {
    let mut slot = self.slot();
    *slot = Some(token.to_string());
    Ok(())
  }

  fn clear(&self) -> Result<()> {
    let mut slot = self.slot();
    *slot = None;
    Ok(())
  }
}
