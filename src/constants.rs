//! Gallery constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` and parsed once on first
//! access via `LazyLock`. `config.toml` and CLI flags may override a subset
//! of these at startup (see [`crate::config`]).

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable gallery constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  pub app_name: String,

  // Catalog
  pub catalog_path: String,

  // Gallery
  pub page_size: usize,
  pub suggestion_limit: usize,
  pub debounce_ms: u64,

  // Preference slot
  pub preference_key: String,

  // Embeds
  pub autoplay_directive: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; a malformed file fails every test run.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed gallery constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
