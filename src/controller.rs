//! Page controller: the single owner of the catalog and view state.
//!
//! Every user interaction enters through [`PageController::handle`] (or one
//! of the named operations) and leaves as a list of [`Patch`]es for the host
//! document. Nothing here is global and nothing here touches a surface.

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::document::{Document, UiEvent};
use crate::filter::matching_positions;
use crate::preference::{PreferenceStore, Storage};
use crate::reconcile::{Patch, Reconciler, ViewState};

pub struct PageController<S> {
  catalog: Catalog,
  reconciler: Reconciler,
  preferences: PreferenceStore<S>,
}

impl<S: Storage> PageController<S> {
  pub fn new(settings: &Settings, storage: S) -> Self {
    Self {
      catalog: Catalog::default(),
      reconciler: Reconciler::new(settings.page_size, settings.suggestion_limit),
      preferences: PreferenceStore::new(storage, settings.preference_key.clone()),
    }
  }

  pub fn catalog(&self) -> &Catalog {
    &self.catalog
  }

  pub fn view_state(&self) -> &ViewState {
    self.reconciler.state()
  }

  /// Catalog positions of the cards currently revealed.
  pub fn revealed(&self) -> &[usize] {
    self.reconciler.revealed()
  }

  pub fn has_more(&self) -> bool {
    self.reconciler.has_more()
  }

  /// Take ownership of the loaded catalog and render it unfiltered.
  pub fn install_catalog(&mut self, catalog: Catalog) -> Vec<Patch> {
    info!(entries = catalog.len(), "controller: catalog installed");
    self.catalog = catalog;
    self.apply_query("")
  }

  /// Filter the catalog by `query` and rebuild the gallery from page one.
  pub fn apply_query(&mut self, query: &str) -> Vec<Patch> {
    let sequence = matching_positions(query, self.catalog.entries());
    debug!(query = %query, matches = sequence.len(), "controller: query applied");
    self.reconciler.reset_and_render(&self.catalog, sequence, query)
  }

  pub fn load_more(&mut self) -> Vec<Patch> {
    self.reconciler.append_next_page(&self.catalog)
  }

  /// Put the suggested term into the query input. The host feeds the new
  /// input text through the same debounced pipeline as typed text.
  pub fn select_suggestion(&mut self, term: &str) -> Vec<Patch> {
    debug!(term = %term, "controller: suggestion selected");
    vec![Patch::SetQueryText(term.to_string())]
  }

  pub fn activate(&mut self, position: usize) -> Vec<Patch> {
    self.reconciler.activate(&self.catalog, position).into_iter().collect()
  }

  /// Dispatch a structured UI event.
  pub fn handle(&mut self, event: UiEvent, document: &mut Document) -> Vec<Patch> {
    match event {
      UiEvent::QueryInput(query) => self.apply_query(&query),
      UiEvent::LoadMore => self.load_more(),
      UiEvent::ActivateCard(position) => self.activate(position),
      UiEvent::SelectSuggestion(term) => self.select_suggestion(&term),
      UiEvent::ToggleDarkMode => {
        self.toggle_dark_mode(document);
        Vec::new()
      }
    }
  }

  /// Apply the persisted display preference to the document.
  pub fn restore_preference(&self, document: &mut Document) -> bool {
    let dark = self.preferences.load();
    self.preferences.apply_to_document(dark, document);
    dark
  }

  pub fn toggle_dark_mode(&mut self, document: &mut Document) -> bool {
    let dark = self.preferences.toggle();
    info!(dark, "controller: display preference toggled");
    self.preferences.apply_to_document(dark, document);
    dark
  }
}
