use crossterm::event::Event;

use crate::core::speech::CatalogSnapshot;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Terminal input forwarded from the crossterm event stream.
    Input(Event),
    /// One-shot startup voice scan finished on the speech worker.
    CatalogLoaded(CatalogSnapshot),
}

/// High-level actions dispatched by the global input mapper. Everything
/// field-specific is handled inside the form view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
}
