//! Terminal viewer showing Twente Milieu pickup sensors for one address.

mod app;
mod input;
mod ui;

use std::{fs, io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ophaaldag_core::{config::PlatformConfig, reader::WasteApiReader};
use ophaaldag_provider_twentemilieu::TwenteMilieuPort;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;

use crate::app::{App, Screen};
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;

    // HTTP + provider setup
    let client = Client::builder()
        .timeout(StdDuration::from_secs(10))
        .build()?;
    let port = Arc::new(TwenteMilieuPort::new(client));

    // App state
    let app = App::new(port, &config);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::ApplySetup => {
                    let config = app.form_config();
                    if let Err(err) = config.validate() {
                        app.error_message = Some(err.to_string());
                        continue;
                    }

                    app.sensors = config.sensors();
                    let mut reader = WasteApiReader::new(
                        Arc::clone(&app.port),
                        config.postcode,
                        config.house_number,
                    );

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = reader.refresh().await;

                    app.is_loading = false;
                    app.reader = Some(reader);
                    app.screen = Screen::Schedule;
                    if let Err(err) = res {
                        // Sensors fall back to an absent state; surface the
                        // cause in the status line.
                        app.error_message = Some(format!("Refresh failed: {err}"));
                    }
                }
                Action::RefreshSchedule => {
                    if app.reader.is_none() {
                        continue;
                    }

                    app.is_loading = true;
                    app.error_message = None;
                    terminal.draw(|frame| ui::draw(frame, &app))?;

                    let res = match app.reader.as_mut() {
                        Some(reader) => reader.refresh().await,
                        None => Ok(()),
                    };

                    app.is_loading = false;
                    if let Err(err) = res {
                        app.error_message = Some(format!("Refresh failed: {err}"));
                    }
                }
            }
        }
    }

    Ok(())
}

/// Read the platform configuration from the file given as the first argument,
/// falling back to the schema defaults when none is given.
fn load_config() -> Result<PlatformConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(PlatformConfig::default());
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("reading config file {path}"))?;
    let config: PlatformConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing config file {path}"))?;
    Ok(config)
}

/// Logs stay off unless explicitly requested; the TUI owns the terminal.
fn init_tracing() {
    if std::env::var_os("OPHAALDAG_LOG").is_some() {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_env("OPHAALDAG_LOG"))
            .with_writer(io::stderr)
            .init();
    }
}
