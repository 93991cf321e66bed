//! ClubSwipe - a terminal user interface for glee club record keeping.
//!
//! Members are registered against their swipe cards; rehearsals and payment
//! collections are then recorded by swiping or typing names, and the whole
//! roster is exported as a spreadsheet on the way out.

mod app;
mod config;
mod ui;
mod utils;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use app::{App, AppState};
use clubswipe_core::{report, DataStore, Dataset};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 250;

const LOG_FILE: &str = "clubswipe.log";

const USAGE: &str = "\
Usage: clubswipe [COMMAND]

With no command, starts the interactive terminal UI.

Commands:
  --export [DIR]  Write the spreadsheet into DIR (default: configured export dir)
  --report        Print the spreadsheet as CSV to stdout
  --help          Show this message

Environment:
  CLUBSWIPE_DATA        Path of the data file
  CLUBSWIPE_EXPORT_DIR  Directory spreadsheets are written to
  RUST_LOG              Log filter (default: warn)";

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Interactive,
    Export(Option<PathBuf>),
    Report,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::Interactive),
        [flag] if flag == "--report" => Ok(Command::Report),
        [flag] if flag == "--help" || flag == "-h" => Ok(Command::Help),
        [flag] if flag == "--export" => Ok(Command::Export(None)),
        [flag, dir] if flag == "--export" => Ok(Command::Export(Some(PathBuf::from(dir)))),
        _ => anyhow::bail!("Unrecognized arguments: {}\n\n{}", args.join(" "), USAGE),
    }
}

/// Log to stderr; used when no terminal UI owns the screen.
fn init_stderr_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Log to a file next to the data file, since the UI owns the terminal.
/// The returned guard flushes the writer when dropped.
fn init_file_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

/// Config for headless commands, which log to stderr and can fall back.
fn load_config() -> Config {
    Config::load().unwrap_or_else(|e| {
        warn!(error = format!("{:#}", e), "Failed to load config, using defaults");
        Config::default()
    })
}

/// Config for the terminal UI. A broken config file stops startup, since
/// falling back would autosave into a different data file.
fn load_interactive_config(path: &Path) -> Result<Config> {
    Config::load_from(path).context("Fix or remove the config file to start clubswipe")
}

fn load_dataset(config: &Config) -> Result<Dataset> {
    let store = DataStore::new(config.data_path()?);
    Ok(store.load()?.unwrap_or_default())
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::Report => {
            init_stderr_tracing();
            let dataset = load_dataset(&load_config())?;
            let mut writer = csv::Writer::from_writer(io::stdout());
            report::write_csv(&report::build_report(&dataset), &mut writer)?;
            writer.flush()?;
            Ok(())
        }
        Command::Export(dir) => {
            init_stderr_tracing();
            let config = load_config();
            let dataset = load_dataset(&config)?;
            let dir = dir.unwrap_or_else(|| config.export_directory());
            let path =
                report::export_csv_to_dir(&report::build_report(&dataset), &dir, &Local::now())?;
            println!("Output to {}", path.display());
            Ok(())
        }
        Command::Interactive => run_interactive(),
    }
}

fn run_interactive() -> Result<()> {
    let config = load_interactive_config(&Config::config_path()?)?;
    let _guard = init_file_tracing(&config)?;
    info!("ClubSwipe starting");

    // Load before touching the terminal so a bad data file is reported plainly
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
    if let Some(path) = app.last_export {
        println!("Output to {}", path.display());
    }

    info!("ClubSwipe shutting down");
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll with a timeout so the "saved" age in the status bar stays current
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ignore key release/repeat events reported on some platforms
                if key.kind == KeyEventKind::Press && handle_input(app, key)? {
                    return Ok(());
                }
            }
        }

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
