mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use vidwall::config::{Config, Settings};
use vidwall::logging;

use app::App;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(
  author,
  version = env!("CARGO_PKG_VERSION"),
  about = "Searchable, paginated video gallery in the terminal",
  long_about = None
)]
struct Args {
  /// Catalog location: a local JSON file or an http(s) URL (default: videos.json)
  #[arg(short, long)]
  catalog: Option<String>,

  /// Path to config.toml (default: platform config dir)
  #[arg(long)]
  config: Option<PathBuf>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    let mut cmd = Args::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    return Ok(());
  }

  // Logging failures must not keep the gallery from starting.
  let _log_guard = match logging::init() {
    Ok(guard) => Some(guard),
    Err(e) => {
      eprintln!("Warning: logging disabled: {:#}", e);
      None
    }
  };

  let config = Config::load(args.config.as_deref());
  let settings = Settings::resolve(&config, args.catalog.as_deref());
  info!(catalog = %settings.catalog.describe(), page_size = settings.page_size.get(), "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, settings);
  ratatui::restore();
  result
}

fn run(terminal: &mut DefaultTerminal, settings: Settings) -> Result<()> {
  let mut app = App::new(settings, app::default_storage());
  app.start_catalog_load();

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app)).context("Failed to draw frame")?;

    if event::poll(Duration::from_millis(50)).context("Failed to poll terminal events")? {
      match event::read().context("Failed to read terminal event")? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  info!("exiting");
  Ok(())
}
