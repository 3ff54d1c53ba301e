use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph},
};

use vidwall::document::{CardNode, EmptyView, Gallery, MediaNode};

use crate::app::{App, Focus};
use crate::theme::Theme;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, main_area, status_area, input_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Min(3),
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, app, header_area);
  render_gallery(frame, app, main_area);
  render_status(frame, app, status_area);
  render_input(frame, app, input_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let left = Line::from(Span::styled(" ▶ vidwall ", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)));
  frame.render_widget(left, area);

  // The count display is optional in the document; render nothing without it.
  if let Some(count) = app.document.count_text() {
    let label = format!("{} ", count);
    let width = label.chars().count() as u16;
    let right = Line::from(Span::styled(label, Style::default().fg(theme.muted)));
    let right_area = Rect { x: area.x + area.width.saturating_sub(width), width: width.min(area.width), ..area };
    frame.render_widget(right, right_area);
  }
}

fn gallery_block<'a>(theme: &Theme, title: String, focused: bool) -> Block<'a> {
  let border = if focused { theme.accent } else { theme.border };
  Block::bordered()
    .title(title)
    .title_style(Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border))
}

fn render_gallery(frame: &mut Frame, app: &mut App, area: Rect) {
  match &app.document.gallery {
    Gallery::Empty(view) => {
      let view = view.clone();
      render_empty(frame, app, &view, area);
    }
    Gallery::Cards(cards) if cards.is_empty() => render_welcome(frame, app, area),
    Gallery::Cards(_) => render_cards(frame, app, area),
  }
}

fn render_welcome(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let message = if app.catalog_loading() { "Fetching the catalog…" } else { "No videos in the catalog." };
  let text = vec![
    Line::from(""),
    Line::from(Span::styled("▶  vidwall", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(""),
    Line::from(Span::styled(message, Style::default().fg(theme.muted))),
  ];
  let paragraph =
    Paragraph::new(text).alignment(Alignment::Center).block(gallery_block(theme, " Videos ".to_string(), false));
  frame.render_widget(paragraph, area);
}

fn card_lines<'a>(card: &'a CardNode, theme: &Theme, inner_w: usize, fg: ratatui::style::Color) -> Vec<Line<'a>> {
  let media = match &card.media {
    MediaNode::Preview { .. } => Line::from(vec![
      Span::styled("  ▷ ", Style::default().fg(theme.accent)),
      Span::styled("preview · Enter to play", Style::default().fg(theme.muted)),
    ]),
    MediaNode::Player { embed_url } => Line::from(vec![
      Span::styled("  ▶ ", Style::default().fg(theme.status)),
      Span::styled(
        truncate_str(embed_url, inner_w.saturating_sub(4)),
        Style::default().fg(theme.status).add_modifier(Modifier::UNDERLINED),
      ),
    ]),
  };
  vec![
    Line::from(Span::styled(truncate_str(&card.title, inner_w), Style::default().fg(fg).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled(truncate_str(&card.description, inner_w), Style::default().fg(theme.muted))),
    media,
  ]
}

fn render_cards(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  // Inner width: area minus 2 borders minus 2 chars for highlight symbol ("▶ ")
  let inner_w = area.width.saturating_sub(4) as usize;
  let selected = app.list_state.selected();

  let mut items: Vec<ListItem> = app
    .document
    .cards()
    .iter()
    .enumerate()
    .map(|(i, card)| {
      let is_selected = Some(i) == selected;
      let fg = if is_selected { theme.highlight_fg } else { theme.fg };
      let bg = if is_selected {
        theme.highlight_bg
      } else if i % 2 == 1 {
        theme.stripe_bg
      } else {
        theme.bg
      };
      ListItem::new(card_lines(card, theme, inner_w, fg)).bg(bg)
    })
    .collect();

  if let Some(label) = app.document.load_more_label() {
    items.push(ListItem::new(Line::from(Span::styled(
      format!("＋ {}", label),
      Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
    ))));
  }

  let title = format!(" Videos ({} shown) ", app.document.cards().len());
  let list = List::new(items)
    .block(gallery_block(theme, title, app.focus == Focus::Gallery))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));

  frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_empty(frame: &mut Frame, app: &mut App, view: &EmptyView, area: Rect) {
  let theme = app.theme();
  let [message_area, list_area] = Layout::vertical([Constraint::Length(4), Constraint::Min(1)]).areas(area);

  let message = vec![
    Line::from(""),
    Line::from(Span::styled(
      format!("No videos match \"{}\"", view.query),
      Style::default().fg(theme.fg).add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled("Try one of these instead:", Style::default().fg(theme.muted))),
  ];
  frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), message_area);

  let items: Vec<ListItem> = view
    .suggestions
    .iter()
    .map(|s| ListItem::new(Line::from(Span::styled(format!("#{}", s.term), Style::default().fg(theme.accent)))))
    .collect();
  let list = List::new(items)
    .block(gallery_block(theme, " Suggestions ".to_string(), app.focus == Focus::Gallery))
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, list_area, &mut app.list_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(msg) = &app.status_message {
    (format!(" ⏳ {}", msg), Style::default().fg(theme.status))
  } else if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if let Some(label) = app.document.load_more_label() {
    (format!(" {} · m", label), Style::default().fg(theme.muted))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

/// Horizontal offset (in columns) that keeps `cursor_col` inside a window
/// `width` columns wide, moving the previous offset as little as possible.
fn follow_cursor(offset: usize, cursor_col: usize, width: usize) -> usize {
  if width == 0 || cursor_col < offset {
    cursor_col
  } else if cursor_col - offset >= width {
    cursor_col + 1 - width
  } else {
    offset
  }
}

/// The chars of `text` that fit entirely in columns `offset..offset + width`.
fn visible_window(text: &str, offset: usize, width: usize) -> String {
  use unicode_width::UnicodeWidthChar;
  let mut out = String::new();
  let mut col = 0;
  for c in text.chars() {
    let w = c.width().unwrap_or(0);
    if col >= offset && col + w <= offset + width {
      out.push(c);
    }
    col += w;
    if col >= offset + width {
      break;
    }
  }
  out
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let focused = app.focus == Focus::Query;
  let edge = if focused { theme.accent } else { theme.border };
  let block = Block::bordered()
    .title(" Search videos ")
    .title_style(Style::default().fg(edge))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(edge))
    .padding(Padding::horizontal(1));

  // Two border columns plus one padding column on each side.
  let width = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.document.query, app.cursor_position);
  app.input_scroll = follow_cursor(app.input_scroll, cursor_col, width);

  let text = visible_window(&app.document.query, app.input_scroll, width);
  frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.fg)).block(block), area);

  if focused {
    let x = area.x + 2 + (cursor_col - app.input_scroll) as u16;
    frame.set_cursor_position((x, area.y + 1));
  }
}

/// Key hints for the focused pane, shown as `(key, action)` chips.
fn key_hints(app: &App) -> Vec<(&'static str, &'static str)> {
  let mut hints = Vec::new();
  match app.focus {
    Focus::Query => {
      hints.push(("Type", "Filter"));
      if !app.rows().is_empty() {
        hints.push(("Tab", "Gallery"));
      }
      hints.push(("Esc", if app.document.query.is_empty() { "Quit" } else { "Clear" }));
    }
    Focus::Gallery => {
      hints.push(("Enter", "Play"));
      hints.push(("j/k", "Navigate"));
      if app.controller.has_more() {
        hints.push(("m", "More"));
      }
      if app.selected_embed_url().is_some() {
        hints.push(("^o", "Browser"));
      }
      hints.push(("/", "Search"));
    }
  }
  hints.push(("^d", if app.document.dark_mode { "Light" } else { "Dark" }));
  hints
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let chip = Style::default().fg(theme.key_fg).bg(theme.key_bg);
  let label = Style::default().fg(theme.muted);

  let mut spans = Vec::new();
  for (key, action) in key_hints(app) {
    if !spans.is_empty() {
      spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(format!(" {} ", key), chip));
    spans.push(Span::styled(format!(" {} ", action), label));
  }
  frame.render_widget(Line::from(spans), area);
  frame.render_widget(Line::from(Span::styled(format!("{} ", theme.name), label)).right_aligned(), area);
}
