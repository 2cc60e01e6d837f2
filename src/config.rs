use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::sync::RetryPolicy;
use crate::ui::layout::Size;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  /// Title shown in the header band
  #[serde(default = "default_title")]
  pub title: String,
  pub source: SourceConfig,
  #[serde(default)]
  pub display: DisplayConfig,
  /// Settings for the `publish` job; absent on display-only installs
  pub producer: Option<ProducerConfig>,
}

fn default_title() -> String {
  "Work".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
  /// Where the published document is fetched from
  pub url: String,
  /// Local cache file (default: $XDG_DATA_HOME/workboard/work.json)
  pub cache_path: Option<PathBuf>,
  pub max_retries: u32,
  pub retry_delay_secs: u64,
  pub timeout_secs: u64,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      url: String::new(),
      cache_path: None,
      max_retries: 3,
      retry_delay_secs: 5,
      timeout_secs: 30,
    }
  }
}

impl SourceConfig {
  pub fn parsed_url(&self) -> Result<Url> {
    Url::parse(&self.url).map_err(|e| eyre!("Invalid source url '{}': {}", self.url, e))
  }

  pub fn retry_policy(&self) -> RetryPolicy {
    RetryPolicy {
      max_retries: self.max_retries,
      delay: Duration::from_secs(self.retry_delay_secs),
    }
  }

  /// Resolve the cache file location.
  pub fn cache_path(&self) -> Result<PathBuf> {
    match &self.cache_path {
      Some(path) => Ok(path.clone()),
      None => Ok(data_dir()?.join("work.json")),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
  pub width: i32,
  pub height: i32,
  /// Task slots shown before the rest are dropped
  pub max_issues: usize,
  /// Minutes between refresh cycles in `watch`
  pub refresh_interval_mins: u64,
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      width: 800,
      height: 480,
      max_issues: 5,
      refresh_interval_mins: 60,
    }
  }
}

impl DisplayConfig {
  pub fn size(&self) -> Size {
    Size::new(self.width, self.height)
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProducerConfig {
  /// GitHub login whose issues are collected
  pub login: String,
  /// Only project items on this project are kept
  pub project: String,
  /// Local path of the generated document
  #[serde(default = "default_output")]
  pub output: PathBuf,
  /// Upload target (HTTP PUT); usually the same file `source.url` points at
  pub publish_url: Option<String>,
  #[serde(default = "default_lookback_days")]
  pub lookback_days: i64,
  #[serde(default = "default_graphql_url")]
  pub graphql_url: String,
  /// Keep the unprocessed GraphQL response here, for debugging the transform
  pub raw_response_path: Option<PathBuf>,
}

fn default_output() -> PathBuf {
  PathBuf::from("work.json")
}

fn default_lookback_days() -> i64 {
  14
}

fn default_graphql_url() -> String {
  "https://api.github.com/graphql".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./workboard.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/workboard/config.yaml
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

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/workboard/config.yaml"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("workboard.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("workboard").join("config.yaml");
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

  fn from_yaml(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    config.source.parsed_url()?;
    if config.display.width <= 0 || config.display.height <= 0 {
      return Err(eyre!(
        "Display size must be positive, got {}x{}",
        config.display.width,
        config.display.height
      ));
    }
    Ok(config)
  }

  /// Basic credential for the document source, already base64 encoded.
  ///
  /// Reads WORKBOARD_AUTHORIZATION. Unset means unauthenticated requests.
  pub fn get_source_credential() -> Option<String> {
    std::env::var("WORKBOARD_AUTHORIZATION")
      .ok()
      .filter(|v| !v.is_empty())
  }

  /// Get the GitHub token for the publish job.
  pub fn get_github_token() -> Result<String> {
    std::env::var("GITHUB_TOKEN")
      .map_err(|_| eyre!("GitHub token not found. Set the GITHUB_TOKEN environment variable."))
  }
}

/// Application data directory ($XDG_DATA_HOME/workboard).
pub fn data_dir() -> Result<PathBuf> {
  let data_dir = dirs::data_dir()
    .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
    .ok_or_else(|| eyre!("Could not determine data directory"))?;

  Ok(data_dir.join("workboard"))
}
