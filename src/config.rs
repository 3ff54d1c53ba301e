use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::catalog::CatalogSource;
use crate::constants::constants;

pub fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", &constants().app_name)
}

/// Default location of the user config file.
pub fn default_config_path() -> Option<PathBuf> {
  project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Optional user overrides read from `config.toml`.
#[derive(Serialize, Deserialize, Default, Debug, PartialEq, Eq)]
pub struct Config {
  pub catalog: Option<String>,
  pub page_size: Option<usize>,
  pub suggestion_limit: Option<usize>,
  pub debounce_ms: Option<u64>,
}

impl Config {
  /// Load the config at `path`, or at the default location when `None`.
  /// A missing or unreadable file falls back to defaults.
  pub fn load(path: Option<&Path>) -> Self {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
      return Self::default();
    };
    if !path.exists() {
      return Self::default();
    }
    match Self::load_from(&path) {
      Ok(config) => config,
      Err(e) => {
        warn!(path = %path.display(), err = %format!("{:#}", e), "config: ignoring unreadable config file");
        Self::default()
      }
    }
  }

  pub fn load_from(path: &Path) -> Result<Self> {
    let content =
      std::fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
  }
}

/// Resolved startup settings. Fixed for the lifetime of the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
  pub catalog: CatalogSource,
  pub page_size: NonZeroUsize,
  pub suggestion_limit: usize,
  pub debounce: Duration,
  pub preference_key: String,
}

impl Settings {
  /// Merge compiled-in constants, the config file and a CLI catalog override,
  /// later sources winning.
  pub fn resolve(config: &Config, catalog_override: Option<&str>) -> Self {
    let c = constants();
    let catalog = catalog_override.or(config.catalog.as_deref()).unwrap_or(c.catalog_path.as_str());
    let page_size = config
      .page_size
      .or(Some(c.page_size))
      .and_then(NonZeroUsize::new)
      .unwrap_or(NonZeroUsize::MIN);
    Self {
      catalog: CatalogSource::parse(catalog),
      page_size,
      suggestion_limit: config.suggestion_limit.unwrap_or(c.suggestion_limit),
      debounce: Duration::from_millis(config.debounce_ms.unwrap_or(c.debounce_ms)),
      preference_key: c.preference_key.clone(),
    }
  }
}

impl Default for Settings {
  fn default() -> Self {
    Self::resolve(&Config::default(), None)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn defaults_come_from_constants() {
    let s = Settings::default();
    assert_eq!(s.catalog, CatalogSource::File(PathBuf::from("videos.json")));
    assert_eq!(s.page_size.get(), 24);
    assert_eq!(s.suggestion_limit, 10);
    assert_eq!(s.debounce, Duration::from_millis(150));
    assert_eq!(s.preference_key, "darkMode");
  }

  #[test]
  fn config_overrides_defaults_and_cli_overrides_config() {
    let config = Config {
      catalog: Some("https://example.com/videos.json".into()),
      page_size: Some(12),
      suggestion_limit: Some(5),
      debounce_ms: Some(300),
    };
    let s = Settings::resolve(&config, None);
    assert_eq!(s.catalog, CatalogSource::Remote("https://example.com/videos.json".into()));
    assert_eq!(s.page_size.get(), 12);
    assert_eq!(s.suggestion_limit, 5);
    assert_eq!(s.debounce, Duration::from_millis(300));

    let s = Settings::resolve(&config, Some("local.json"));
    assert_eq!(s.catalog, CatalogSource::File(PathBuf::from("local.json")));
  }

  #[test]
  fn zero_page_size_is_clamped() {
    let config = Config { page_size: Some(0), ..Config::default() };
    assert_eq!(Settings::resolve(&config, None).page_size.get(), 1);
  }

  #[test]
  fn load_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "catalog = \"data/videos.json\"\npage_size = 6").unwrap();
    let config = Config::load(Some(file.path()));
    assert_eq!(config.catalog.as_deref(), Some("data/videos.json"));
    assert_eq!(config.page_size, Some(6));
    assert_eq!(config.debounce_ms, None);
  }

  #[test]
  fn malformed_or_missing_file_falls_back() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "page_size = \"many\"").unwrap();
    assert_eq!(Config::load(Some(file.path())), Config::default());

    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Config::load(Some(dir.path().join("absent.toml").as_path())), Config::default());
  }
}
