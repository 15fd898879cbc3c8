// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use config::{Config, Environment, File};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

mod app;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use source::{DataSource, FileSource};

#[derive(Parser, Debug)]
#[command(name = "wardwatch")]
#[command(about = "Diagnostic TUI for monitoring hospital KPI health")]
struct Args {
    /// Directory containing kpi_data.json, kpi_relationships.json and alerts.json
    #[cfg_attr(
        feature = "http",
        arg(short, long, conflicts_with = "url")
    )]
    #[cfg_attr(not(feature = "http"), arg(short, long))]
    data_dir: Option<PathBuf>,

    /// Fetch the three resources from this base URL instead of the filesystem
    #[cfg(feature = "http")]
    #[arg(short, long)]
    url: Option<String>,

    /// HTTP request timeout in seconds (used with --url)
    #[cfg(feature = "http")]
    #[arg(long, default_value = "10")]
    timeout: u64,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Settings file, merged with WARDWATCH_* environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Export current state to JSON file and exit
    #[cfg_attr(
        feature = "http",
        arg(short, long, conflicts_with = "url")
    )]
    #[cfg_attr(not(feature = "http"), arg(short, long))]
    export: Option<PathBuf>,
}

/// Settings that can come from a config file or the environment.
///
/// Command line arguments take precedence over these.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    data_dir: Option<PathBuf>,
    url: Option<String>,
    refresh: Option<u64>,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }
    let config = builder
        .add_source(Environment::with_prefix("WARDWATCH"))
        .build()?;
    Ok(config.try_deserialize()?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;

    let data_dir = args
        .data_dir
        .or(settings.data_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let refresh = Duration::from_secs(args.refresh.or(settings.refresh).unwrap_or(1));

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return run_export(&data_dir, &export_path);
    }

    // Handle HTTP mode
    #[cfg(feature = "http")]
    if let Some(url) = args.url.clone().or(settings.url) {
        return run_with_http(&url, refresh, Duration::from_secs(args.timeout));
    }

    // Default: directory-based mode
    run_with_dir(&data_dir, refresh)
}

/// Run with a directory data source
fn run_with_dir(dir: &Path, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(dir));
    run_tui(source, refresh)
}

/// Run with an HTTP data source
#[cfg(feature = "http")]
fn run_with_http(url: &str, refresh: Duration, timeout: Duration) -> Result<()> {
    use source::HttpSource;

    // The fetch task needs a runtime that outlives the TUI loop
    let rt = tokio::runtime::Runtime::new()?;
    let source = rt.block_on(async { HttpSource::spawn(url, refresh, timeout) });

    // Poll frequently; the background task controls the actual fetch cadence
    let result = run_tui(Box::new(source), Duration::from_millis(100));

    rt.shutdown_background();
    result
}

/// Export current dashboard state to a JSON file
fn run_export(dir: &Path, export_path: &Path) -> Result<()> {
    let source = Box::new(FileSource::new(dir));
    let mut app = App::new(source);
    app.load_or_fallback();

    app.export_state(export_path)?;
    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data (falls back to sample data on failure)
    let mut app = App::new(source);
    app.load_or_fallback();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with overall health
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Kpis => ui::kpis::render(frame, app, chunks[2]),
                View::Alerts => ui::alerts::render(frame, app, chunks[2]),
                View::Network => ui::network::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}
