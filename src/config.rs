use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://acquisens-back.onrender.com";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  /// Custom title for header (defaults to the API host if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Server root, without the `/api` suffix
  #[serde(default = "default_url")]
  pub url: String,
  /// Ceiling for general API calls. Listing every company is slow.
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  /// Ceiling for `/api/v1/auth` calls
  #[serde(default = "default_auth_timeout_secs")]
  pub auth_timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: default_url(),
      timeout_secs: default_timeout_secs(),
      auth_timeout_secs: default_auth_timeout_secs(),
    }
  }
}

fn default_url() -> String {
  DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
  300
}

fn default_auth_timeout_secs() -> u64 {
  10
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// How long a fetched company list is served without hitting the network
  #[serde(default = "default_freshness_minutes")]
  pub freshness_minutes: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      freshness_minutes: default_freshness_minutes(),
    }
  }
}

fn default_freshness_minutes() -> u64 {
  15
}

impl CacheConfig {
  pub fn freshness(&self) -> Duration {
    Duration::from_secs(self.freshness_minutes * 60)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./backoffice.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/backoffice/config.yaml
  ///
  /// Without a file the defaults apply. `BACKOFFICE_API_URL` overrides `api.url`.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    if let Ok(url) = std::env::var("BACKOFFICE_API_URL") {
      if !url.trim().is_empty() {
        config.api.url = url.trim().to_string();
      }
    }

    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("backoffice.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("backoffice").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file parses as YAML null
    if contents.trim().is_empty() {
      return Ok(Config::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Get the sign-in password from the environment.
  ///
  /// Checks BACKOFFICE_PASSWORD.
  pub fn get_password() -> Option<String> {
    std::env::var("BACKOFFICE_PASSWORD")
      .ok()
      .filter(|p| !p.is_empty())
  }
}
