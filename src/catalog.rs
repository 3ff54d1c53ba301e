use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// A single video in the catalog. Identity is the entry's position in the
/// catalog; there is no id field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoEntry {
  pub url: String,
  pub title: String,
  #[serde(default)]
  pub description: String,
  /// Ordered, not guaranteed unique.
  #[serde(default)]
  pub tags: Vec<String>,
}

impl VideoEntry {
  pub fn new(url: &str, title: &str, description: &str, tags: &[&str]) -> Self {
    Self {
      url: url.to_string(),
      title: title.to_string(),
      description: description.to_string(),
      tags: tags.iter().map(|t| t.to_string()).collect(),
    }
  }
}

/// The full, read-only video collection for the lifetime of the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
  entries: Vec<VideoEntry>,
}

impl Catalog {
  pub fn new(entries: Vec<VideoEntry>) -> Self {
    Self { entries }
  }

  pub fn entries(&self) -> &[VideoEntry] {
    &self.entries
  }

  pub fn get(&self, position: usize) -> Option<&VideoEntry> {
    self.entries.get(position)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Where the catalog document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
  Remote(String),
  File(PathBuf),
}

impl CatalogSource {
  /// `http://` and `https://` locations are fetched over the network,
  /// anything else is read from disk.
  pub fn parse(location: &str) -> Self {
    let trimmed = location.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
      CatalogSource::Remote(trimmed.to_string())
    } else {
      CatalogSource::File(PathBuf::from(trimmed))
    }
  }

  pub fn describe(&self) -> String {
    match self {
      CatalogSource::Remote(url) => url.clone(),
      CatalogSource::File(path) => path.display().to_string(),
    }
  }
}

/// Parse a catalog document: a JSON array of video entries.
pub fn parse_catalog(json: &str) -> Result<Vec<VideoEntry>> {
  serde_json::from_str(json).context("Catalog document is not a JSON array of video entries")
}

async fn fetch_remote(url: &str, client: &Client) -> Result<Vec<VideoEntry>> {
  let response = client
    .get(url)
    .send()
    .await
    .with_context(|| format!("Failed to request catalog from {}", url))?
    .error_for_status()
    .with_context(|| format!("Catalog request to {} was rejected", url))?;
  response.json::<Vec<VideoEntry>>().await.context("Catalog response is not a JSON array of video entries")
}

async fn try_load(source: &CatalogSource, client: &Client) -> Result<Vec<VideoEntry>> {
  match source {
    CatalogSource::Remote(url) => fetch_remote(url, client).await,
    CatalogSource::File(path) => {
      let body = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
      parse_catalog(&body)
    }
  }
}

/// Retrieve the catalog once. Any retrieval or parse failure is logged and
/// yields an empty catalog; callers always receive a well-formed value.
pub async fn load(source: &CatalogSource, client: &Client) -> Catalog {
  match try_load(source, client).await {
    Ok(entries) => {
      info!(source = %source.describe(), entries = entries.len(), "catalog loaded");
      Catalog::new(entries)
    }
    Err(e) => {
      warn!(source = %source.describe(), err = %format!("{:#}", e), "catalog load failed; using empty catalog");
      Catalog::default()
    }
  }
}
