//! SmartTools - terminal toolbox of twenty everyday utilities
//!
//! Core state lives in `core`, tools in `tools`, and the ratatui frontend in
//! `frontend::tui`.

mod clipboard;
mod config;
mod core;
mod download;
mod frontend;
mod i18n;
mod location;
mod preferences;
mod storage;
mod tasks;
mod theme;
mod tools;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use frontend::Frontend;
use std::path::PathBuf;

#[derive(ClapParser)]
#[command(name = "smarttools")]
#[command(about = "Terminal toolbox of everyday utilities", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.smarttools)
    /// Can also be set via SMARTTOOLS_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Interface language code (en, ar, fr, es, el, pt, de, zh, ja, nl)
    #[arg(short, long, value_name = "CODE")]
    lang: Option<String>,

    /// Launch location query string, e.g. "lang=fr&ref=home"
    #[arg(long, value_name = "QUERY")]
    location: Option<String>,

    /// Force a color theme and remember it
    #[arg(short, long, value_enum)]
    theme: Option<ThemeArg>,

    /// Keep theme and language changes for this session only
    #[arg(long)]
    no_save: bool,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for theme::ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => theme::ThemeMode::Light,
            ThemeArg::Dark => theme::ThemeMode::Dark,
        }
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Set data directory env var if specified (must be before any Config calls)
    if let Some(ref data_dir) = cli.data_dir {
        std::env::set_var(config::DATA_DIR_ENV, data_dir);
    }

    // TUI apps can't log to stdout, so we write to a file in the data dir
    // (use RUST_LOG to control level, e.g. RUST_LOG=debug)
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create data directory {:?}", parent))?;
    }
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    let config = match &cli.config {
        Some(path) => config::Config::load_from_file(path)?,
        None => config::Config::load()?,
    };

    // The launch location plays the role of the page URL's query string
    let mut location = cli
        .location
        .as_deref()
        .map(location::Location::parse)
        .unwrap_or_default();
    if let Some(lang) = &cli.lang {
        location.set(location::LANG_PARAM, lang);
    }

    let store: Box<dyn storage::KeyValueStore> = if cli.no_save {
        tracing::info!("Preferences will not be saved this session");
        Box::new(storage::MemoryStore::new())
    } else {
        match config::Config::prefs_path() {
            Ok(path) => Box::new(storage::TomlFileStore::open(path)),
            Err(e) => {
                tracing::warn!("No preferences file available ({:#}), not saving", e);
                Box::new(storage::MemoryStore::new())
            }
        }
    };
    let mut prefs = preferences::PreferenceStore::resolve(
        store,
        location,
        preferences::os_theme_hint(),
    );
    if let Some(theme) = cli.theme {
        prefs.set_theme(theme.into())?;
    }

    let paths = core::AppPaths {
        downloads: config.downloads_dir()?,
        outbox: config::Config::outbox_path()?,
    };

    // Restore the terminal before the panic message prints
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::event::DisableMouseCapture,
            crossterm::event::DisableBracketedPaste
        );
        default_hook(info);
    }));

    // Create tokio runtime; background tool jobs run on its worker threads
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_tui(config, prefs, paths))
}

/// Async TUI main loop
async fn async_run_tui(
    config: config::Config,
    prefs: preferences::PreferenceStore,
    paths: core::AppPaths,
) -> Result<()> {
    use core::AppCore;
    use frontend::{FrontendEvent, TuiFrontend};
    use std::time::{Duration, Instant};
    use tokio::sync::mpsc;

    // Background results from tools arrive on this channel
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<core::AsyncEvent>();

    let poll_timeout = Duration::from_millis(config.ui.poll_timeout_ms);

    // Create core application state
    let mut app_core = AppCore::new(config, prefs, paths, events_tx);

    // Create TUI frontend
    let mut frontend = TuiFrontend::new()?;
    frontend.set_poll_timeout(poll_timeout);

    let (width, height) = frontend.size();
    tracing::info!("Starting SmartTools at {}x{}", width, height);

    // Force a redraw every second so the footer clock and status expiry stay fresh
    let mut last_tick = Instant::now();

    // Main event loop
    while app_core.running {
        let events = frontend.poll_events()?;

        for event in events {
            match event {
                FrontendEvent::Key { .. } => {
                    if let Some(key) = event.as_key_event() {
                        app_core.handle_key(key);
                    }
                }
                FrontendEvent::Paste { text } => app_core.handle_paste(&text),
                FrontendEvent::Mouse { .. } => {
                    if let Some(delta) = event.scroll_delta() {
                        app_core.scroll_by(delta);
                    }
                }
                FrontendEvent::Resize { width, height } => {
                    tracing::debug!("Terminal resized to {}x{}", width, height);
                    app_core.follow_focus = true;
                    app_core.needs_render = true;
                }
            }
        }

        // Poll for background results (non-blocking)
        while let Ok(msg) = events_rx.try_recv() {
            app_core.handle_async(msg);
        }

        if last_tick.elapsed() >= Duration::from_secs(1) {
            app_core.needs_render = true;
            last_tick = Instant::now();
        }
        app_core.expire_status(Instant::now());

        // Render if needed
        if app_core.needs_render {
            frontend.render(&mut app_core)?;
            app_core.needs_render = false;
        }
    }

    // Dropping the tool cancels its background tasks
    app_core.tool = None;

    // Cleanup
    frontend.cleanup()?;
    tracing::info!("SmartTools exited");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_lang_help_lists_supported_codes() {
        let command = Cli::command();
        let help = command
            .get_arguments()
            .find(|arg| arg.get_id() == "lang")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap();
        let listed = help
            .split_once('(')
            .and_then(|(_, rest)| rest.split_once(')'))
            .map(|(codes, _)| codes)
            .unwrap();
        let listed: Vec<&str> = listed.split(", ").collect();
        let supported: Vec<&str> = i18n::Language::ALL.iter().map(|l| l.code()).collect();
        assert_eq!(listed, supported);
    }
}
