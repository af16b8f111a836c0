//! The speech form: text, voice picker, three sliders, Speak.
//!
//! Field state lives here. Activating Speak captures the live field values
//! into a `PlaybackRequest` and hands it to the engine without waiting for
//! any outcome. With no voice selected, activation is a silent no-op.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui_textarea::TextArea;

use crate::config::SpeechConfig;
use crate::core::speech::{
    CatalogSnapshot, PlaybackRequest, RateBounds, SpeechEngine, VoiceOption, TRAILING_SILENCE,
};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::Slider;

const TEXT_TITLE: &str = "Text to be spoken";

/// Which form field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Text,
    Voice,
    Volume,
    Speed,
    Pitch,
    Speak,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Text,
        FormField::Voice,
        FormField::Volume,
        FormField::Speed,
        FormField::Pitch,
        FormField::Speak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Text => "Text",
            FormField::Voice => "Voice",
            FormField::Volume => "Volume",
            FormField::Speed => "Speed",
            FormField::Pitch => "Pitch",
            FormField::Speak => "Speak",
        }
    }

    pub fn next(self) -> FormField {
        let idx = FormField::ALL.iter().position(|&f| f == self).unwrap_or(0);
        FormField::ALL[(idx + 1) % FormField::ALL.len()]
    }

    pub fn prev(self) -> FormField {
        let idx = FormField::ALL.iter().position(|&f| f == self).unwrap_or(0);
        FormField::ALL[(idx + FormField::ALL.len() - 1) % FormField::ALL.len()]
    }
}

pub struct SpeakViewState {
    pub focus: FormField,
    pub text_input: TextArea<'static>,

    /// Picker options, fixed once the startup scan reports in.
    pub voices: Vec<VoiceOption>,
    /// Locale the options were filtered against (shown next to the picker).
    pub locale: String,
    /// Index into `voices`. Starts empty and is never auto-selected.
    pub selected: Option<usize>,
    /// Whether the one-shot catalog scan has reported.
    pub loaded: bool,

    pub volume: Slider,
    pub speed: Slider,
    pub pitch: Slider,
}

impl SpeakViewState {
    pub fn new(speech: &SpeechConfig) -> Self {
        let mut text_input = TextArea::default();
        text_input.set_block(theme::block_focused(TEXT_TITLE));

        // Speed gets real bounds when the engine reports them
        let rate = RateBounds::default();

        Self {
            focus: FormField::Text,
            text_input,
            voices: Vec::new(),
            locale: String::new(),
            selected: None,
            loaded: false,
            volume: Slider::new("Volume", 0.0, 1.0, 0.05, speech.volume),
            speed: speed_slider(rate),
            pitch: Slider::new("Pitch", 0.5, 5.5, 0.1, speech.pitch).with_unit("x"),
        }
    }

    /// Install the one-shot catalog scan result. The option set and speed
    /// bounds are fixed from here on; a second report is ignored.
    pub fn set_catalog(&mut self, snapshot: CatalogSnapshot) {
        if self.loaded {
            log::debug!("Voice catalog already loaded; ignoring repeat report");
            return;
        }
        self.voices = snapshot.options;
        self.locale = snapshot.locale;
        self.speed = speed_slider(snapshot.rate);
        self.loaded = true;
    }

    pub fn selected_voice(&self) -> Option<&VoiceOption> {
        self.selected.and_then(|i| self.voices.get(i))
    }

    /// Current text field contents.
    pub fn text(&self) -> String {
        self.text_input.lines().join("\n")
    }

    /// The Speak action. Captures the live field values into a request and
    /// dispatches it fire-and-forget; without a selected voice it does
    /// nothing at all.
    pub fn activate_speak(&self, engine: &dyn SpeechEngine) {
        let Some(option) = self.selected_voice() else {
            log::debug!("Speak activated with no voice selected; nothing to do");
            return;
        };

        engine.speak(PlaybackRequest {
            text: self.text(),
            voice: option.handle.clone(),
            rate: self.speed.value(),
            volume: self.volume.value(),
            pitch: self.pitch.value(),
            trailing_silence: TRAILING_SILENCE,
        });
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let key = match event {
            Event::Key(k) if k.kind == KeyEventKind::Press => *k,
            _ => return false,
        };

        // Quit keys belong to the app, even while typing
        if key.code == KeyCode::Esc
            || (key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c'))
        {
            return false;
        }

        // Focus cycling. Up/Down stay with the text area while it has
        // focus; they move the cursor there.
        if key.code == KeyCode::Tab
            || (key.code == KeyCode::Down && self.focus != FormField::Text)
        {
            self.focus = self.focus.next();
            self.update_focus_styles();
            return true;
        }
        if key.code == KeyCode::BackTab
            || (key.code == KeyCode::Up && self.focus != FormField::Text)
        {
            self.focus = self.focus.prev();
            self.update_focus_styles();
            return true;
        }

        // Ctrl+Enter speaks from anywhere
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Enter {
            self.activate_speak(services.engine.as_ref());
            return true;
        }

        match self.focus {
            FormField::Text => {
                self.text_input.input(event.clone());
                true
            }
            FormField::Voice => self.handle_voice_key(key),
            FormField::Volume | FormField::Speed | FormField::Pitch => {
                self.handle_slider_key(key)
            }
            FormField::Speak => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.activate_speak(services.engine.as_ref());
                    true
                }
                _ => false,
            },
        }
    }

    fn handle_voice_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Left => {
                self.cycle_voice(-1);
                true
            }
            KeyCode::Right => {
                self.cycle_voice(1);
                true
            }
            KeyCode::Enter => {
                self.focus = self.focus.next();
                self.update_focus_styles();
                true
            }
            _ => false,
        }
    }

    fn handle_slider_key(&mut self, key: KeyEvent) -> bool {
        let slider = match self.focus {
            FormField::Volume => &mut self.volume,
            FormField::Speed => &mut self.speed,
            FormField::Pitch => &mut self.pitch,
            _ => return false,
        };
        match key.code {
            KeyCode::Left => {
                slider.decrease();
                true
            }
            KeyCode::Right => {
                slider.increase();
                true
            }
            KeyCode::Enter => {
                self.focus = self.focus.next();
                self.update_focus_styles();
                true
            }
            _ => false,
        }
    }

    /// Move the picker selection. Starting from no selection, Right lands
    /// on the first option and Left on the last; afterwards it wraps.
    fn cycle_voice(&mut self, dir: i32) {
        if self.voices.is_empty() {
            return;
        }
        let n = self.voices.len() as i32;
        let next = match self.selected {
            None => {
                if dir >= 0 {
                    0
                } else {
                    n - 1
                }
            }
            Some(i) => (i as i32 + dir).rem_euclid(n),
        };
        self.selected = Some(next as usize);
    }

    fn update_focus_styles(&mut self) {
        self.text_input.set_block(if self.focus == FormField::Text {
            theme::block_focused(TEXT_TITLE)
        } else {
            theme::block_default(TEXT_TITLE)
        });
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(5),    // Text
            Constraint::Length(3), // Voice
            Constraint::Length(3), // Volume
            Constraint::Length(3), // Speed
            Constraint::Length(3), // Pitch
            Constraint::Length(3), // Speak
        ])
        .split(area);

        frame.render_widget(&self.text_input, chunks[0]);
        self.render_voice_row(frame, chunks[1]);
        self.volume
            .render(frame, chunks[2], self.focus == FormField::Volume);
        self.speed
            .render(frame, chunks[3], self.focus == FormField::Speed);
        self.pitch
            .render(frame, chunks[4], self.focus == FormField::Pitch);
        self.render_speak_button(frame, chunks[5]);
    }

    fn render_voice_row(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FormField::Voice;
        let block = if focused {
            theme::block_focused("Voice")
        } else {
            theme::block_default("Voice")
        };

        let marker = Style::default().fg(theme::ACCENT_SOFT);
        let line = if !self.loaded {
            Line::from(Span::styled("scanning voices…", theme::dim()))
        } else if self.voices.is_empty() {
            Line::from(Span::styled(
                format!("no voices for {}", self.locale),
                Style::default().fg(theme::WARNING),
            ))
        } else {
            match self.selected_voice() {
                Some(option) => Line::from(vec![
                    Span::styled("◂ ", marker),
                    Span::styled(
                        option.label.clone(),
                        if focused {
                            theme::highlight()
                        } else {
                            Style::default().fg(theme::TEXT)
                        },
                    ),
                    Span::styled(" ▸", marker),
                    Span::styled(
                        format!(
                            "   {}/{} voices for {}",
                            self.selected.map_or(0, |i| i + 1),
                            self.voices.len(),
                            self.locale
                        ),
                        theme::muted(),
                    ),
                ]),
                None => Line::from(vec![
                    Span::styled("no voice selected", theme::dim()),
                    Span::styled(
                        format!(
                            "   ◂ ▸ to choose from {} voices for {}",
                            self.voices.len(),
                            self.locale
                        ),
                        theme::muted(),
                    ),
                ]),
            }
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_speak_button(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == FormField::Speak;
        let border = if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };

        let mut spans = vec![Span::styled(
            "▶ Speak",
            if focused { theme::title() } else { theme::heading() },
        )];
        if self.selected_voice().is_none() {
            spans.push(Span::styled("  (select a voice first)", theme::dim()));
        }

        let button = Paragraph::new(Line::from(spans))
            .centered()
            .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(button, area);
    }
}

fn speed_slider(rate: RateBounds) -> Slider {
    let step = (rate.max - rate.min) / 20.0;
    Slider::new("Speed", rate.min, rate.max, step, rate.normal).with_unit("x")
}

// ============================================================================
// Tests
// ============================================================================
