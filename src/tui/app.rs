use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent};
use super::services::Services;
use super::theme;
use super::views::SpeakViewState;
use crate::config::SpeechConfig;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// The speech form, the app's single view.
    pub speak: SpeakViewState,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Sender for pushing events from within the app.
    #[allow(dead_code)]
    event_tx: mpsc::UnboundedSender<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(
        speech: &SpeechConfig,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        services: Services,
    ) -> Self {
        Self {
            running: true,
            speak: SpeakViewState::new(speech),
            event_rx,
            event_tx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            // Render
            terminal.draw(|frame| self.render(frame))?;

            // Select next event
            tokio::select! {
                _ = tick_interval.tick() => {
                    // Periodic redraw; keeps the scan placeholder fresh
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: the form
                if self.speak.handle_input(&crossterm_event, &self.services) {
                    return;
                }

                // Priority 2: global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::CatalogLoaded(snapshot) => {
                log::info!(
                    "Voice catalog ready: {} option(s) for {}",
                    snapshot.options.len(),
                    snapshot.locale
                );
                self.speak.set_catalog(snapshot);
            }
        }
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Esc) => Some(Action::Quit),
            // 'q' only reaches here when the text field is not focused
            (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(2), // header
            Constraint::Min(12),   // form
            Constraint::Length(1), // status bar
        ])
        .split(area);

        self.render_header(frame, chunks[0]);
        self.speak.render(frame, chunks[1]);
        self.render_status_bar(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(vec![
                Span::styled(" sTTS ", theme::brand_badge()),
                Span::styled("  text to speech", theme::muted()),
            ]),
            Line::from(Span::styled(
                format!(" version {}", crate::VERSION),
                theme::dim(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::raw(" "),
            Span::styled(
                self.speak.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":next field  "),
            Span::styled("◂ ▸", theme::key_hint()),
            Span::raw(":adjust  "),
            Span::styled("Ctrl+Enter", theme::key_hint()),
            Span::raw(":speak  "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }
}
