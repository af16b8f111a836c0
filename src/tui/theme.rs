//! Centralized Indigo & Amber color theme for the sTTS TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo: primary accent, active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x5C, 0x6B, 0xC0);
/// Light indigo: slider fills, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x79, 0x86, 0xCB);
/// Dark indigo: slider troughs, subtle backgrounds.
pub const PRIMARY_DARK: Color = Color::Rgb(0x28, 0x32, 0x70);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Amber: the Speak action and other calls to attention.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);
/// Soft amber: selection markers, secondary emphasis.
pub const ACCENT_SOFT: Color = Color::Rgb(0xFF, 0xCA, 0x28);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Near-black navy base background.
pub const BG_BASE: Color = Color::Rgb(0x10, 0x12, 0x1C);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
/// Muted text: secondary labels, value readouts.
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
/// Dim text: unfocused borders, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Warning color for degraded states (e.g. no voices for the locale).
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);

// ── Style helpers ───────────────────────────────────────────────────────────

/// App title / primary action style.
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

/// Focused border style.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

/// Unfocused border style.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Dim text for disabled/faint items.
pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[esc]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Header brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
