use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use stts::config::AppConfig;
use stts::tui::app::AppState;
use stts::tui::services::Services;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let _log_guard = stts::core::logging::init_tui();
    log::info!("sTTS v{} starting", stts::VERSION);

    let config = AppConfig::load();

    // Backend event channel and services (spawns the speech worker)
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(event_tx.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let mut app = AppState::new(&config.speech, event_rx, event_tx, services);
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("sTTS shutting down");
    result?;
    Ok(())
}
