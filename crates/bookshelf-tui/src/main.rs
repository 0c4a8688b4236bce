//! Bookshelf - a terminal client for a remote book catalog.
//!
//! The list renders instantly from the local snapshot, then reconciles
//! against the remote catalog in the background. Books can be added and
//! deleted from the keyboard.

mod app;
mod config;
mod headless;
mod ui;
mod utils;

use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file written inside the cache directory while the TUI owns the terminal
const LOG_FILE: &str = "bookshelf.log";

const USAGE: &str = "\
Usage: bookshelf [--list | --help]

  (no args)   Interactive terminal UI
  --list      Load the catalog once and print it
  --help      Show this message

Environment:
  BOOKSHELF_API_URL   Remote catalog base URL (default http://localhost:3000)
  RUST_LOG            Log filter (default warn)";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to a file so tracing output never draws over the UI
fn init_file_tracing(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();

    guard
}

fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        None => {}
        Some("--list") => return run_list().await,
        Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown argument: {}\n\n{}", other, USAGE);
            std::process::exit(2);
        }
    }

    let (config, config_error) = load_config();
    let cache_dir = config.cache_dir();
    std::fs::create_dir_all(&cache_dir)
        .with_context(|| format!("Failed to create {}", cache_dir.display()))?;
    let _guard = init_file_tracing(&cache_dir);
    warn_config_error(config_error.as_ref());
    info!("Bookshelf starting");

    let app = App::new(&config)?;

    run_tui(app).await?;

    info!("Bookshelf shutting down");
    Ok(())
}

/// A broken config file falls back to the defaults. The error is handed
/// back so it can be logged once a subscriber is installed.
fn load_config() -> (Config, Option<anyhow::Error>) {
    match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

fn warn_config_error(error: Option<&anyhow::Error>) {
    if let Some(e) = error {
        warn!(error = %format!("{:#}", e), "Failed to load config, using defaults");
    }
}

async fn run_list() -> Result<()> {
    init_stderr_tracing();
    let (config, config_error) = load_config();
    warn_config_error(config_error.as_ref());
    let app = App::new(&config).context("Failed to initialize catalog")?;
    headless::list(&app.catalog).await;
    Ok(())
}

async fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Cached list first, remote reconciliation in the background
    app.start_load();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {}", e);
    }
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        // Apply results from finished network tasks
        app.check_background_tasks();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }

        // Let spawned tasks make progress between polls
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_config_error_is_logged() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let error = anyhow::anyhow!("Failed to parse config file: config.json");
        tracing::subscriber::with_default(subscriber, || warn_config_error(Some(&error)));

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Failed to load config, using defaults"));
        assert!(output.contains("config.json"));
    }

    #[test]
    fn test_no_config_error_logs_nothing() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = fmt().with_writer(move || writer.clone()).finish();

        tracing::subscriber::with_default(subscriber, || warn_config_error(None));

        assert!(captured.0.lock().unwrap().is_empty());
    }
}
