use ratatui::widgets::ListState;
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use vidwall::catalog::{self, Catalog};
use vidwall::config::Settings;
use vidwall::controller::PageController;
use vidwall::debounce::{Debounced, debounce};
use vidwall::document::{Document, Gallery, Layout, MediaNode, UiEvent};
use vidwall::preference::{FileStorage, MemoryStorage, Storage};
use vidwall::reconcile::Patch;

use crate::theme::{self, Theme};

pub type AppStorage = Box<dyn Storage + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Query,
  Gallery,
}

/// A selectable row in the main area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
  Card(usize),
  LoadMore,
  Suggestion(String),
}

/// Durable storage for the display preference, falling back to memory when
/// the platform has no config dir.
pub fn default_storage() -> AppStorage {
  match FileStorage::open_default() {
    Some(storage) => {
      info!(path = %storage.path().display(), "prefs: using file storage");
      Box::new(storage)
    }
    None => {
      warn!("prefs: no config directory, preference will not persist");
      Box::new(MemoryStorage::default())
    }
  }
}

pub struct App {
  pub controller: PageController<AppStorage>,
  pub document: Document,
  pub settings: Settings,
  pub focus: Focus,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub list_state: ListState,
  pub status_message: Option<String>,
  pub last_error: Option<String>,
  pub should_quit: bool,
  error_time: Option<Instant>,
  debouncer: Debounced<String>,
  query_rx: mpsc::UnboundedReceiver<String>,
  catalog_rx: Option<oneshot::Receiver<Catalog>>,
  http_client: Client,
}

impl App {
  pub fn new(settings: Settings, storage: AppStorage) -> Self {
    let controller = PageController::new(&settings, storage);
    let mut document = Document::new(Layout::default());
    controller.restore_preference(&mut document);

    // The debounced action only forwards the query; the event loop applies it.
    let (query_tx, query_rx) = mpsc::unbounded_channel();
    let debouncer = debounce(
      move |query: String| {
        let _ = query_tx.send(query);
      },
      settings.debounce,
    );

    Self {
      controller,
      document,
      settings,
      focus: Focus::Query,
      cursor_position: 0,
      input_scroll: 0,
      list_state: ListState::default(),
      status_message: None,
      last_error: None,
      should_quit: false,
      error_time: None,
      debouncer,
      query_rx,
      catalog_rx: None,
      http_client: Client::new(),
    }
  }

  pub fn theme(&self) -> &'static Theme {
    theme::for_mode(self.document.dark_mode)
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after 5 seconds.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(5)
    {
      self.clear_error();
    }
  }

  /// Spawn the one-shot catalog retrieval.
  pub fn start_catalog_load(&mut self) {
    let source = self.settings.catalog.clone();
    let client = self.http_client.clone();
    info!(source = %source.describe(), "catalog: loading");
    self.status_message = Some(format!("Loading {}…", source.describe()));

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
      let _ = tx.send(catalog::load(&source, &client).await);
    });
    self.catalog_rx = Some(rx);
  }

  /// Apply any finished catalog load and the latest debounced query.
  pub fn check_pending(&mut self) {
    if let Some(mut rx) = self.catalog_rx.take() {
      match rx.try_recv() {
        Ok(catalog) => {
          self.status_message = None;
          if catalog.is_empty() {
            self.set_error("No videos available.".to_string());
          }
          let patches = self.controller.install_catalog(catalog);
          self.apply(patches);
          // Queries typed during the load are superseded by the input text.
          self.debouncer.cancel();
          while self.query_rx.try_recv().is_ok() {}
          if !self.document.query.trim().is_empty() {
            self.dispatch(UiEvent::QueryInput(self.document.query.clone()));
          }
        }
        Err(oneshot::error::TryRecvError::Empty) => {
          self.catalog_rx = Some(rx);
        }
        Err(oneshot::error::TryRecvError::Closed) => {
          self.status_message = None;
          self.set_error("Catalog task failed.".to_string());
        }
      }
    }

    if self.catalog_loading() {
      return;
    }

    let mut latest = None;
    while let Ok(query) = self.query_rx.try_recv() {
      latest = Some(query);
    }
    if let Some(query) = latest {
      self.dispatch(UiEvent::QueryInput(query));
    }
  }

  pub fn catalog_loading(&self) -> bool {
    self.catalog_rx.is_some()
  }

  /// Feed the current input text through the debounced pipeline.
  pub fn query_edited(&mut self) {
    self.debouncer.call(self.document.query.clone());
  }

  pub fn dispatch(&mut self, event: UiEvent) {
    let resets_selection = matches!(event, UiEvent::QueryInput(_));
    let is_suggestion = matches!(event, UiEvent::SelectSuggestion(_));
    let loading_more = matches!(event, UiEvent::LoadMore);
    let previous_cards = self.document.cards().len();

    let patches = self.controller.handle(event, &mut self.document);
    self.apply(patches);

    if resets_selection {
      self.select(0);
    } else if loading_more {
      self.select(previous_cards);
    }
    if is_suggestion {
      self.cursor_position = self.document.query.chars().count();
      self.focus = Focus::Query;
      self.query_edited();
    }
  }

  fn apply(&mut self, patches: Vec<Patch>) {
    self.document.apply_all(patches);
    let rows = self.rows().len();
    match self.list_state.selected() {
      _ if rows == 0 => self.list_state.select(None),
      None => self.list_state.select(Some(0)),
      Some(i) if i >= rows => self.list_state.select(Some(rows - 1)),
      Some(_) => {}
    }
  }

  /// Selectable rows of the main area, top to bottom.
  pub fn rows(&self) -> Vec<Row> {
    match &self.document.gallery {
      Gallery::Cards(cards) => {
        let mut rows: Vec<Row> = cards.iter().map(|c| Row::Card(c.position)).collect();
        if self.document.load_more_label().is_some() {
          rows.push(Row::LoadMore);
        }
        rows
      }
      Gallery::Empty(view) => view.suggestions.iter().map(|s| Row::Suggestion(s.term.clone())).collect(),
    }
  }

  pub fn select(&mut self, index: usize) {
    let count = self.rows().len();
    self.list_state.select(if count == 0 { None } else { Some(index.min(count - 1)) });
  }

  pub fn select_next(&mut self) {
    let count = self.rows().len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
      self.list_state.select(Some(i));
    }
  }

  pub fn select_previous(&mut self) {
    let count = self.rows().len();
    if count > 0 {
      let i = self.list_state.selected().map_or(0, |i| if i == 0 { count - 1 } else { i - 1 });
      self.list_state.select(Some(i));
    }
  }

  /// Trigger whatever the selected row stands for.
  pub fn activate_selected(&mut self) {
    let Some(selected) = self.list_state.selected() else { return };
    let Some(row) = self.rows().into_iter().nth(selected) else { return };
    let event = match row {
      Row::Card(position) => UiEvent::ActivateCard(position),
      Row::LoadMore => UiEvent::LoadMore,
      Row::Suggestion(term) => UiEvent::SelectSuggestion(term),
    };
    self.dispatch(event);
  }

  /// Embed url of the selected card, once its player is active.
  pub fn selected_embed_url(&self) -> Option<String> {
    let selected = self.list_state.selected()?;
    let Row::Card(position) = self.rows().into_iter().nth(selected)? else { return None };
    self.document.cards().iter().find(|c| c.position == position).and_then(|card| match &card.media {
      MediaNode::Player { embed_url } => Some(embed_url.clone()),
      MediaNode::Preview { .. } => None,
    })
  }

  pub fn toggle_dark_mode(&mut self) {
    self.dispatch(UiEvent::ToggleDarkMode);
  }
}
