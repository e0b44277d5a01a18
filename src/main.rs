mod app;
mod catalog;
mod config;
mod constants;
mod detail;
mod display;
mod form;
mod graphics;
mod input;
mod movie;
mod poster;
mod route;
mod search;
mod theme;
mod tmdb;
mod ui;
mod youtube;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use app::App;
use config::{Config, Credentials};
use constants::constants;
use display::CliDisplayMode;
use input::handle_key_event;
use route::Route;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Browse TMDb movies and your own picks in the terminal", long_about = None)]
struct Args {
  /// Poster display mode: 'auto', 'direct', 'ascii', or 'none' (default: saved preference, then auto-detect)
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,

  /// Route to open on start, e.g. '/' or '/movie/27205'
  #[arg(short, long, default_value = "/")]
  route: Route,

  /// Search term to load instead of the default seed query
  #[arg(short, long)]
  query: Option<String>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Logging ---

/// Log to a daily rolling file; the terminal belongs to the UI.
/// `RUST_LOG` overrides the default `info` filter.
fn init_logging() -> Option<WorkerGuard> {
  let dir = config::log_dir()?;
  std::fs::create_dir_all(&dir).ok()?;
  let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "cinedex.log"));
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::registry().with(filter).with(fmt::layer().with_writer(writer).with_ansi(false)).init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "cinedex", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = init_logging();
  info!(version = env!("CARGO_PKG_VERSION"), route = %args.route, "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, args).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, args: Args) -> Result<()> {
  let saved = Config::load().display_mode;
  let display_mode = display::resolve_display_mode(args.display_mode, saved.as_deref());
  let credentials = Credentials::from_env();
  let http = reqwest::Client::builder()
    .timeout(Duration::from_secs(constants().http_timeout_secs))
    .build()
    .context("Failed to build HTTP client")?;

  let mut app = App::new(credentials, http, display_mode);
  app.start(args.route, args.query.as_deref());

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          handle_key_event(&mut app, key);
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

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn args_parse_route_and_query() {
    let args = Args::try_parse_from(["cinedex", "--route", "/movie/603", "--query", "Matrix"]).unwrap();
    assert_eq!(args.route, Route::Movie(movie::MovieId::Tmdb(603)));
    assert_eq!(args.query.as_deref(), Some("Matrix"));
  }

  #[test]
  fn args_default_to_catalog() {
    let args = Args::try_parse_from(["cinedex"]).unwrap();
    assert_eq!(args.route, Route::Catalog);
    assert!(args.query.is_none());
  }

  #[test]
  fn args_reject_unknown_route() {
    assert!(Args::try_parse_from(["cinedex", "--route", "/actors/1"]).is_err());
  }

  #[test]
  fn cli_definition_is_valid() {
    Args::command().debug_assert();
  }
}
