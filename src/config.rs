use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub rows: RowsConfig,
  #[serde(default)]
  pub demo: DemoConfig,
  /// Custom title for header (defaults to the API host, or "demo")
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base URL of the transactions API
  pub url: Option<String>,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
  10
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: None,
      timeout_secs: default_timeout_secs(),
    }
  }
}

/// Row window behaviour of the transaction list
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RowsConfig {
  /// Rows shown before any "view more"
  pub initial: usize,
  /// Rows added per "view more"
  pub step: usize,
  /// Shrink the window back to `initial` when the employee filter changes
  pub reset_on_filter_change: bool,
}

impl Default for RowsConfig {
  fn default() -> Self {
    Self {
      initial: 5,
      step: 5,
      reset_on_filter_change: false,
    }
  }
}

/// Settings for the bundled demo transport (`--demo`)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
  pub page_size: usize,
  /// Simulated round-trip time per request
  pub latency_ms: u64,
}

impl Default for DemoConfig {
  fn default() -> Self {
    Self {
      page_size: 5,
      latency_ms: 300,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./txview.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/txview/config.yaml
  ///
  /// Falls back to defaults when no file exists.
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
    let local = PathBuf::from("txview.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("txview").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::from_yaml(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
    serde_yaml::from_str(contents)
  }

  fn validate(&self) -> Result<()> {
    if self.rows.initial == 0 || self.rows.step == 0 {
      return Err(eyre!("rows.initial and rows.step must be at least 1"));
    }
    if self.demo.page_size == 0 {
      return Err(eyre!("demo.page_size must be at least 1"));
    }
    Ok(())
  }

  /// Get the API bearer token from the environment, if set.
  ///
  /// Checks TXVIEW_API_TOKEN.
  pub fn get_api_token() -> Option<String> {
    std::env::var("TXVIEW_API_TOKEN")
      .ok()
      .filter(|t| !t.is_empty())
  }
}
