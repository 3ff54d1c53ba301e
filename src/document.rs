//! In-memory host document and the adapter that applies [`Patch`]es to it.
//!
//! The card container, query input and root flags always exist. The
//! load-more control and the count display are optional; patches aimed at a
//! missing one are dropped.

use tracing::debug;

use crate::reconcile::{CardView, EmptyState, MediaView, Patch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaNode {
  /// Thumbnail-like placeholder; nothing is loaded until activation.
  Preview { url: String, title: String },
  Player { embed_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNode {
  pub position: usize,
  pub title: String,
  pub description: String,
  pub media: MediaNode,
}

impl From<CardView> for CardNode {
  fn from(card: CardView) -> Self {
    let media = match card.media {
      MediaView::Preview { url, title } => MediaNode::Preview { url, title },
    };
    Self { position: card.position, title: card.title, description: card.description, media }
  }
}

/// Data-carrying suggestion control. Selecting it dispatches
/// [`UiEvent::SelectSuggestion`] with its term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionNode {
  pub term: String,
}

impl SuggestionNode {
  pub fn event(&self) -> UiEvent {
    UiEvent::SelectSuggestion(self.term.clone())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyView {
  pub query: String,
  pub suggestions: Vec<SuggestionNode>,
}

impl From<EmptyState> for EmptyView {
  fn from(state: EmptyState) -> Self {
    let suggestions = state.suggestions.into_iter().map(|term| SuggestionNode { term }).collect();
    Self { query: state.query, suggestions }
  }
}

/// Contents of the card container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gallery {
  Cards(Vec<CardNode>),
  Empty(EmptyView),
}

impl Default for Gallery {
  fn default() -> Self {
    Gallery::Cards(Vec::new())
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadMoreControl {
  pub visible: bool,
  pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountDisplay {
  pub text: String,
}

/// Structured events raised by document controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
  QueryInput(String),
  LoadMore,
  ActivateCard(usize),
  SelectSuggestion(String),
  ToggleDarkMode,
}

/// Which optional elements the host page provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
  pub load_more: bool,
  pub count: bool,
}

impl Default for Layout {
  fn default() -> Self {
    Self { load_more: true, count: true }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
  pub dark_mode: bool,
  pub gallery: Gallery,
  pub query: String,
  pub load_more: Option<LoadMoreControl>,
  pub count: Option<CountDisplay>,
}

impl Document {
  pub fn new(layout: Layout) -> Self {
    Self {
      dark_mode: false,
      gallery: Gallery::default(),
      query: String::new(),
      load_more: layout.load_more.then(LoadMoreControl::default),
      count: layout.count.then(CountDisplay::default),
    }
  }

  /// Toggle the presentation mode flag on the document root.
  pub fn set_dark_mode(&mut self, on: bool) {
    self.dark_mode = on;
  }

  pub fn cards(&self) -> &[CardNode] {
    match &self.gallery {
      Gallery::Cards(cards) => cards,
      Gallery::Empty(_) => &[],
    }
  }

  pub fn empty_view(&self) -> Option<&EmptyView> {
    match &self.gallery {
      Gallery::Empty(view) => Some(view),
      Gallery::Cards(_) => None,
    }
  }

  pub fn count_text(&self) -> Option<&str> {
    self.count.as_ref().map(|c| c.text.as_str()).filter(|t| !t.is_empty())
  }

  /// Label of the load-more control when it exists and is visible.
  pub fn load_more_label(&self) -> Option<&str> {
    self.load_more.as_ref().filter(|c| c.visible).map(|c| c.label.as_str())
  }

  pub fn apply_all(&mut self, patches: impl IntoIterator<Item = Patch>) {
    for patch in patches {
      self.apply(patch);
    }
  }

  pub fn apply(&mut self, patch: Patch) {
    match patch {
      Patch::AddCards(cards) => {
        let nodes = cards.into_iter().map(CardNode::from);
        if let Gallery::Cards(existing) = &mut self.gallery {
          existing.extend(nodes);
        } else {
          self.gallery = Gallery::Cards(nodes.collect());
        }
      }
      Patch::ClearAndReplace(cards) => {
        self.gallery = Gallery::Cards(cards.into_iter().map(CardNode::from).collect());
      }
      Patch::ShowEmptyState(state) => {
        self.gallery = Gallery::Empty(state.into());
      }
      Patch::SetCountText(text) => match &mut self.count {
        Some(count) => count.text = text.unwrap_or_default(),
        None => debug!("document: no count display, skipping count update"),
      },
      Patch::SetLoadMoreVisibility(label) => match &mut self.load_more {
        Some(control) => {
          control.visible = label.is_some();
          control.label = label.unwrap_or_default();
        }
        None => debug!("document: no load-more control, skipping visibility update"),
      },
      Patch::ActivateMedia { position, embed_url } => {
        if let Gallery::Cards(cards) = &mut self.gallery
          && let Some(card) = cards.iter_mut().find(|c| c.position == position)
        {
          card.media = MediaNode::Player { embed_url };
        }
      }
      Patch::SetQueryText(text) => {
        self.query = text;
      }
    }
  }
}
