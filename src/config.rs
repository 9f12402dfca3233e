use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub tmdb: TmdbConfig,
  #[serde(default)]
  pub browse: BrowseConfig,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthStyle {
  /// v3 API key sent as the `api_key` query parameter
  #[default]
  ApiKey,
  /// v4 read access token sent as `Authorization: Bearer`
  Bearer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
  pub base_url: String,
  /// Base for poster/backdrop URLs
  pub image_base_url: String,
  pub auth: AuthStyle,
  pub timeout_secs: u64,
}

impl Default for TmdbConfig {
  fn default() -> Self {
    Self {
      base_url: "https://api.themoviedb.org/3".to_string(),
      image_base_url: "https://image.tmdb.org/t/p".to_string(),
      auth: AuthStyle::ApiKey,
      timeout_secs: 30,
    }
  }
}

impl TmdbConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowseConfig {
  /// Quiet period before typed text becomes a search
  pub debounce_ms: u64,
  /// How long fetched pages stay fresh
  pub stale_time_secs: u64,
  /// How long a page or movie nobody is looking at stays cached
  pub gc_time_secs: u64,
  /// Event loop tick; bounds how late a debounced search can fire
  pub tick_rate_ms: u64,
}

impl Default for BrowseConfig {
  fn default() -> Self {
    Self {
      debounce_ms: 300,
      stale_time_secs: 300,
      gc_time_secs: 300,
      tick_rate_ms: 50,
    }
  }
}

impl BrowseConfig {
  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  pub fn stale_time(&self) -> Duration {
    Duration::from_secs(self.stale_time_secs)
  }

  pub fn gc_time(&self) -> Duration {
    Duration::from_secs(self.gc_time_secs)
  }

  pub fn tick_rate(&self) -> Duration {
    Duration::from_millis(self.tick_rate_ms.max(1))
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided (must exist)
  /// 2. ./cinetrack.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/cinetrack/config.yaml
  ///
  /// Every setting has a default, so running without any file is fine.
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

    let config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Self::default(),
    };

    config.validate()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("cinetrack.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("cinetrack").join("config.yaml");
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

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to unit, not to an empty map
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    Ok(serde_yaml::from_str(contents)?)
  }

  fn validate(&self) -> Result<()> {
    for (name, value) in [
      ("tmdb.base_url", &self.tmdb.base_url),
      ("tmdb.image_base_url", &self.tmdb.image_base_url),
    ] {
      let parsed = url::Url::parse(value).map_err(|e| eyre!("Invalid {} '{}': {}", name, value, e))?;
      if !matches!(parsed.scheme(), "http" | "https") {
        return Err(eyre!("Invalid {} '{}': expected http or https", name, value));
      }
    }
    Ok(())
  }

  /// Get the TMDB credential from environment variables.
  ///
  /// Checks CINETRACK_TMDB_KEY first, then TMDB_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("CINETRACK_TMDB_KEY")
      .or_else(|_| std::env::var("TMDB_API_KEY"))
      .ok()
      .filter(|key| !key.trim().is_empty())
      .ok_or_else(|| {
        eyre!("TMDB API key not found. Set CINETRACK_TMDB_KEY or TMDB_API_KEY environment variable.")
      })
  }
}
