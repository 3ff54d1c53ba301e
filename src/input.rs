use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use vidwall::document::UiEvent;

use crate::app::{App, Focus};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
    app.should_quit = true;
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('d') {
    app.toggle_dark_mode();
    return;
  }

  if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('o') {
    open_selected_embed(app);
    return;
  }

  match app.focus {
    Focus::Query => handle_query_key(app, key),
    Focus::Gallery => handle_gallery_key(app, key),
  }
}

fn open_selected_embed(app: &mut App) {
  let Some(url) = app.selected_embed_url() else {
    app.set_error("Play a video first (Enter on a card).".to_string());
    return;
  };
  #[cfg(target_os = "macos")]
  let cmd = "open";
  #[cfg(not(target_os = "macos"))]
  let cmd = "xdg-open";
  match std::process::Command::new(cmd)
    .arg(&url)
    .stdin(std::process::Stdio::null())
    .stdout(std::process::Stdio::null())
    .stderr(std::process::Stdio::null())
    .spawn()
  {
    Ok(mut child) => {
      // Reap the child in a background thread to avoid zombie processes.
      std::thread::spawn(move || {
        let _ = child.wait();
      });
    }
    Err(e) => {
      app.set_error(format!("Failed to open browser: {}", e));
    }
  }
}

fn handle_query_key(app: &mut App, key: KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.document.query, app.cursor_position);
      app.document.query.insert(byte_idx, c);
      app.cursor_position += 1;
      app.query_edited();
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.document.query, app.cursor_position);
        app.document.query.remove(byte_idx);
        app.query_edited();
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.document.query.chars().count() {
        let byte_idx = char_to_byte_index(&app.document.query, app.cursor_position);
        app.document.query.remove(byte_idx);
        app.query_edited();
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.document.query.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.document.query.chars().count();
    }
    KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
      if !app.rows().is_empty() {
        app.focus = Focus::Gallery;
      }
    }
    KeyCode::Esc => {
      if !app.document.query.is_empty() {
        app.document.query.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
        app.query_edited();
      } else {
        app.should_quit = true;
      }
    }
    _ => {}
  }
}

fn handle_gallery_key(app: &mut App, key: KeyEvent) {
  match key.code {
    KeyCode::Enter | KeyCode::Char(' ') => {
      app.activate_selected();
    }
    KeyCode::Char('m') => {
      if app.controller.has_more() {
        app.dispatch(UiEvent::LoadMore);
      }
    }
    KeyCode::Down | KeyCode::Char('j') => {
      app.select_next();
    }
    KeyCode::Up | KeyCode::Char('k') => {
      app.select_previous();
    }
    KeyCode::Home | KeyCode::Char('g') => {
      app.select(0);
    }
    KeyCode::End | KeyCode::Char('G') => {
      app.select(usize::MAX);
    }
    KeyCode::Char('/') | KeyCode::Tab | KeyCode::Esc => {
      app.focus = Focus::Query;
    }
    KeyCode::Char('q') => {
      app.should_quit = true;
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use vidwall::catalog::{Catalog, VideoEntry};
  use vidwall::config::Settings;
  use vidwall::preference::MemoryStorage;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
  }

  fn app_with(n: usize) -> App {
    let mut app = App::new(Settings::default(), Box::new(MemoryStorage::default()));
    let entries = (0..n).map(|i| VideoEntry::new(&format!("u{}", i), &format!("V{}", i), "", &[])).collect();
    let catalog = Catalog::new(entries);
    let patches = app.controller.install_catalog(catalog);
    app.document.apply_all(patches);
    app.select(0);
    app
  }

  // --- char_to_byte_index ---

  #[test]
  fn char_to_byte_ascii() {
    assert_eq!(char_to_byte_index("hello", 0), 0);
    assert_eq!(char_to_byte_index("hello", 3), 3);
    assert_eq!(char_to_byte_index("hello", 5), 5); // past end
  }

  #[test]
  fn char_to_byte_multibyte() {
    let s = "aé日"; // a=1 byte, é=2 bytes, 日=3 bytes
    assert_eq!(char_to_byte_index(s, 1), 1);
    assert_eq!(char_to_byte_index(s, 2), 3);
    assert_eq!(char_to_byte_index(s, 3), 6);
  }

  // --- key handling ---

  #[tokio::test(start_paused = true)]
  async fn typing_edits_query_at_cursor() {
    let mut app = app_with(3);
    for c in ['c', 't'] {
      handle_key_event(&mut app, key(KeyCode::Char(c)));
    }
    handle_key_event(&mut app, key(KeyCode::Left));
    handle_key_event(&mut app, key(KeyCode::Char('a')));
    assert_eq!(app.document.query, "cat");
    handle_key_event(&mut app, key(KeyCode::Backspace));
    assert_eq!(app.document.query, "ct");
  }

  #[test]
  fn focus_moves_between_query_and_gallery() {
    let mut app = app_with(3);
    assert_eq!(app.focus, Focus::Query);
    handle_key_event(&mut app, key(KeyCode::Tab));
    assert_eq!(app.focus, Focus::Gallery);
    handle_key_event(&mut app, key(KeyCode::Char('j')));
    assert_eq!(app.list_state.selected(), Some(1));
    handle_key_event(&mut app, key(KeyCode::Char('/')));
    assert_eq!(app.focus, Focus::Query);
  }

  #[test]
  fn load_more_key_appends_page() {
    let mut app = app_with(30);
    app.focus = Focus::Gallery;
    handle_key_event(&mut app, key(KeyCode::Char('m')));
    assert_eq!(app.document.cards().len(), 30);
    assert_eq!(app.document.load_more_label(), None);
  }

  #[test]
  fn ctrl_d_toggles_dark_mode_and_ctrl_c_quits() {
    let mut app = app_with(1);
    handle_key_event(&mut app, ctrl('d'));
    assert!(app.document.dark_mode);
    handle_key_event(&mut app, ctrl('c'));
    assert!(app.should_quit);
  }

  #[test]
  fn esc_on_empty_query_quits() {
    let mut app = app_with(1);
    handle_key_event(&mut app, key(KeyCode::Esc));
    assert!(app.should_quit);
  }
}
