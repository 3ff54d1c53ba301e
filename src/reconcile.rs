//! Render reconciliation.
//!
//! The [`Reconciler`] owns the gallery's [`ViewState`] and describes every
//! change to the visible gallery as a list of [`Patch`] values. It never
//! touches a rendering surface; [`crate::document::Document::apply`] does.
//!
//! Two entry points drive it:
//! - [`Reconciler::reset_and_render`] whenever the active sequence changes
//!   (initial load, new query). Clears the gallery and reveals one page.
//! - [`Reconciler::append_next_page`] when more results are requested.
//!   Emits only the newly revealed cards.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::catalog::{Catalog, VideoEntry};
use crate::constants::constants;
use crate::filter::normalize_query;
use crate::pagination::{has_more, next_slice, page_slice, remaining};

/// Media area of a card. Cards are always rendered with a preview; only an
/// explicit activation turns one into a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaView {
  Preview { url: String, title: String },
}

/// One rendered card, derived from exactly one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
  /// Position of the entry in the catalog.
  pub position: usize,
  pub title: String,
  pub description: String,
  pub media: MediaView,
}

impl CardView {
  pub fn from_entry(position: usize, entry: &VideoEntry) -> Self {
    Self {
      position,
      title: entry.title.clone(),
      description: entry.description.clone(),
      media: MediaView::Preview { url: entry.url.clone(), title: entry.title.clone() },
    }
  }
}

/// Fallback view for a query with no matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
  pub query: String,
  pub suggestions: Vec<String>,
}

/// A single document update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch {
  /// Append cards after the ones already visible.
  AddCards(Vec<CardView>),
  /// Drop every visible card (and any empty state) and show these instead.
  ClearAndReplace(Vec<CardView>),
  /// Drop every visible card and show the empty view.
  ShowEmptyState(EmptyState),
  /// `None` clears the count display.
  SetCountText(Option<String>),
  /// `Some(label)` shows the load-more control, `None` hides it.
  SetLoadMoreVisibility(Option<String>),
  /// Swap a card's preview for an interactive player.
  ActivateMedia { position: usize, embed_url: String },
  /// Overwrite the query input's text.
  SetQueryText(String),
}

/// Mutable gallery state. `active` always equals the filter of `query` over
/// the catalog; `revealed_pages` is reset before a new `active` is installed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
  pub active: Vec<usize>,
  pub revealed_pages: usize,
  pub query: String,
}

impl ViewState {
  pub fn is_filtered(&self) -> bool {
    normalize_query(&self.query).is_some()
  }
}

pub struct Reconciler {
  state: ViewState,
  page_size: NonZeroUsize,
  suggestion_limit: usize,
}

impl Reconciler {
  pub fn new(page_size: NonZeroUsize, suggestion_limit: usize) -> Self {
    Self { state: ViewState::default(), page_size, suggestion_limit }
  }

  pub fn state(&self) -> &ViewState {
    &self.state
  }

  /// Catalog positions of every card currently revealed.
  pub fn revealed(&self) -> &[usize] {
    page_slice(&self.state.active, self.page_size, self.state.revealed_pages)
  }

  pub fn has_more(&self) -> bool {
    has_more(&self.state.active, self.page_size, self.state.revealed_pages)
  }

  /// Install a new active sequence and render its first page, or the empty
  /// state when a non-blank query matched nothing.
  pub fn reset_and_render(&mut self, catalog: &Catalog, sequence: Vec<usize>, query: &str) -> Vec<Patch> {
    self.state = ViewState { active: sequence, revealed_pages: 0, query: query.to_string() };

    let mut patches = Vec::with_capacity(3);
    if self.state.active.is_empty() && self.state.is_filtered() {
      patches.push(Patch::ShowEmptyState(EmptyState {
        query: query.trim().to_string(),
        suggestions: suggest_tags(catalog, self.suggestion_limit),
      }));
    } else {
      let cards = self.reveal_page(catalog);
      patches.push(Patch::ClearAndReplace(cards));
    }
    self.push_status(catalog, &mut patches);
    patches
  }

  /// Reveal one more page, emitting only the new cards.
  pub fn append_next_page(&mut self, catalog: &Catalog) -> Vec<Patch> {
    let mut patches = Vec::with_capacity(3);
    if self.has_more() {
      let cards = self.reveal_page(catalog);
      patches.push(Patch::AddCards(cards));
    }
    self.push_status(catalog, &mut patches);
    patches
  }

  /// Activate the media of a revealed card.
  pub fn activate(&self, catalog: &Catalog, position: usize) -> Option<Patch> {
    if !self.revealed().contains(&position) {
      return None;
    }
    let entry = catalog.get(position)?;
    Some(Patch::ActivateMedia { position, embed_url: autoplay_url(&entry.url) })
  }

  fn reveal_page(&mut self, catalog: &Catalog) -> Vec<CardView> {
    let (slice, revealed) = next_slice(&self.state.active, self.page_size, self.state.revealed_pages);
    let cards = slice
      .iter()
      .filter_map(|&position| catalog.get(position).map(|entry| CardView::from_entry(position, entry)))
      .collect();
    self.state.revealed_pages = revealed;
    cards
  }

  fn push_status(&self, catalog: &Catalog, patches: &mut Vec<Patch>) {
    patches.push(Patch::SetCountText(count_label(self.state.active.len(), catalog.len())));
    let load_more = if self.has_more() {
      let left = remaining(&self.state.active, self.page_size, self.state.revealed_pages);
      Some(load_more_label(left))
    } else {
      None
    };
    patches.push(Patch::SetLoadMoreVisibility(load_more));
  }
}

fn videos(n: usize) -> &'static str {
  if n == 1 { "video" } else { "videos" }
}

/// `"{shown} of {total} videos"` while the query narrows the catalog,
/// `"{total} videos"` otherwise, nothing when there is nothing to show.
pub fn count_label(shown: usize, total: usize) -> Option<String> {
  if shown == 0 {
    None
  } else if shown < total {
    Some(format!("{} of {} {}", shown, total, videos(total)))
  } else {
    Some(format!("{} {}", total, videos(total)))
  }
}

pub fn load_more_label(remaining: usize) -> String {
  format!("Load more ({} remaining)", remaining)
}

/// Most frequent tags across the whole catalog, ties broken by first-seen
/// order. Every occurrence counts, including repeats within one entry.
pub fn suggest_tags(catalog: &Catalog, limit: usize) -> Vec<String> {
  let mut order: Vec<&str> = Vec::new();
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for tag in catalog.entries().iter().flat_map(|e| e.tags.iter()) {
    let count = counts.entry(tag.as_str()).or_insert(0);
    if *count == 0 {
      order.push(tag.as_str());
    }
    *count += 1;
  }
  // Stable sort keeps first-seen order within equal counts.
  order.sort_by(|a, b| counts[b].cmp(&counts[a]));
  order.into_iter().take(limit).map(str::to_string).collect()
}

/// Rewrite a YouTube `watch?v=` url into its embeddable form.
pub fn embed_url(url: &str) -> String {
  url.replacen("/watch?v=", "/embed/", 1)
}

/// Embeddable url with the autoplay directive appended.
pub fn autoplay_url(url: &str) -> String {
  let embed = embed_url(url);
  let separator = if embed.contains('?') { '&' } else { '?' };
  format!("{}{}{}", embed, separator, constants().autoplay_directive)
}
