//! Horizontal value slider rendered as a gauge row.
//!
//! Sliders own the only validation the form performs: stepping clamps to
//! the configured range, and out-of-range starting values are pulled back
//! in. Nothing downstream re-validates.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Gauge};
use ratatui::Frame;

use crate::tui::theme;

/// A bounded f32 value adjusted in fixed steps with Left/Right.
#[derive(Debug, Clone)]
pub struct Slider {
    label: &'static str,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
    /// Suffix appended to the readout ("x" for multipliers).
    unit: &'static str,
}

impl Slider {
    pub fn new(label: &'static str, min: f32, max: f32, step: f32, value: f32) -> Self {
        Self {
            label,
            min,
            max,
            step,
            value: value.clamp(min, max),
            unit: "",
        }
    }

    pub fn with_unit(mut self, unit: &'static str) -> Self {
        self.unit = unit;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn increase(&mut self) {
        self.value = (self.value + self.step).clamp(self.min, self.max);
    }

    pub fn decrease(&mut self) {
        self.value = (self.value - self.step).clamp(self.min, self.max);
    }

    /// Fill fraction for the gauge. A degenerate range renders empty
    /// instead of dividing by zero.
    fn ratio(&self) -> f64 {
        let span = self.max - self.min;
        if span <= f32::EPSILON {
            return 0.0;
        }
        (((self.value - self.min) / span).clamp(0.0, 1.0)) as f64
    }

    /// Value readout shown on the gauge, e.g. "0.80" or "1.25x".
    pub fn readout(&self) -> String {
        format!("{:.2}{}", self.value, self.unit)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let border_style = if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(" {} ", self.label))
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .gauge_style(
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .bg(theme::PRIMARY_DARK),
            )
            .ratio(self.ratio())
            .label(self.readout());

        frame.render_widget(gauge, area);
    }
}
