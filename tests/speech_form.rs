//! Integration tests for the speech form pipeline.
//!
//! These tests run the real wiring end to end: a scanned voice catalog is
//! filtered against the current locale, the surviving options feed the
//! picker, and activating Speak hands the engine a request built from the
//! live field values. Only the platform engine itself is replaced, by a
//! recorder that captures every dispatched request.
//!
//! No external services are required:
//!
//! ```bash
//! cargo test --test speech_form
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use stts::config::SpeechConfig;
use stts::core::speech::{
    available_voice_options, CatalogSnapshot, PlatformVoice, PlaybackRequest, RateBounds,
    ScannedCatalog, SpeechEngine, VoiceHandle,
};
use stts::tui::events::AppEvent;
use stts::tui::services::Services;
use stts::tui::views::{FormField, SpeakViewState};

/// Engine stand-in that records every request it is handed.
#[derive(Default)]
struct RecordingEngine {
    requests: Mutex<Vec<PlaybackRequest>>,
}

impl RecordingEngine {
    fn recorded(&self) -> Vec<PlaybackRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl SpeechEngine for RecordingEngine {
    fn speak(&self, request: PlaybackRequest) {
        self.requests.lock().unwrap().push(request);
    }
}

fn platform_voice(id: &str, name: &str, language: &str) -> PlatformVoice {
    PlatformVoice {
        id: id.to_string(),
        name: name.to_string(),
        language: language.to_string(),
    }
}

/// A scan result the way a US English system would report it, with
/// neighbours that must not survive the filter.
fn mixed_catalog() -> ScannedCatalog {
    ScannedCatalog {
        voices: vec![
            platform_voice("com.voice.aaron", "Aaron", "en-US"),
            platform_voice("com.voice.brigitte", "Brigitte", "fr-FR"),
            platform_voice("com.voice.carmen", "Carmen", "en"),
            platform_voice("com.voice.daniel", "Daniel", "en-US"),
            platform_voice("com.voice.emma", "Emma", "EN-US"),
            platform_voice("com.voice.fiona", "Fiona", "en-GB"),
        ],
        locale: "en-US".to_string(),
    }
}

fn snapshot_from(catalog: &ScannedCatalog) -> CatalogSnapshot {
    CatalogSnapshot {
        options: available_voice_options(catalog).expect("scan cannot fail"),
        locale: catalog.locale.clone(),
        rate: RateBounds {
            min: 0.0,
            max: 1.0,
            normal: 0.5,
        },
    }
}

fn services_with(engine: Arc<RecordingEngine>) -> (Services, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        Services {
            engine,
            event_tx: tx,
        },
        rx,
    )
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn type_text(view: &mut SpeakViewState, services: &Services, text: &str) {
    for ch in text.chars() {
        view.handle_input(&press(KeyCode::Char(ch)), services);
    }
}

// ----------------------------------------------------------------------------
// Catalog → picker
// ----------------------------------------------------------------------------

#[test]
fn scan_feeds_picker_with_exact_locale_matches_in_platform_order() {
    let snapshot = snapshot_from(&mixed_catalog());

    let labels: Vec<&str> = snapshot.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Aaron (en-US)", "Daniel (en-US)"]);

    let mut view = SpeakViewState::new(&SpeechConfig::default());
    view.set_catalog(snapshot);

    assert!(view.loaded);
    assert_eq!(view.voices.len(), 2);
    assert_eq!(view.locale, "en-US");
    assert!(view.selected.is_none(), "no voice is ever auto-selected");
}

#[test]
fn locale_without_matches_leaves_form_usable_and_speak_inert() {
    let catalog = ScannedCatalog {
        voices: vec![platform_voice("com.voice.brigitte", "Brigitte", "fr-FR")],
        locale: "de-DE".to_string(),
    };
    let snapshot = snapshot_from(&catalog);
    assert!(snapshot.options.is_empty());

    let engine = Arc::new(RecordingEngine::default());
    let (services, _rx) = services_with(engine.clone());

    let mut view = SpeakViewState::new(&SpeechConfig::default());
    view.set_catalog(snapshot);

    // Sliders and text still respond
    type_text(&mut view, &services, "still typing");
    assert_eq!(view.text(), "still typing");

    // The picker has nothing to offer and Speak stays a no-op
    view.focus = FormField::Voice;
    view.handle_input(&press(KeyCode::Right), &services);
    assert!(view.selected.is_none());

    view.activate_speak(engine.as_ref());
    assert!(engine.recorded().is_empty());
}

// ----------------------------------------------------------------------------
// Form → engine
// ----------------------------------------------------------------------------

#[test]
fn typing_selecting_and_speaking_dispatches_one_exact_request() {
    let engine = Arc::new(RecordingEngine::default());
    let (services, _rx) = services_with(engine.clone());

    let mut view = SpeakViewState::new(&SpeechConfig::default());
    view.set_catalog(snapshot_from(&mixed_catalog()));

    // Type, pick the first voice, walk to Speak, press Enter
    type_text(&mut view, &services, "Hello world");
    view.handle_input(&press(KeyCode::Tab), &services); // Voice
    view.handle_input(&press(KeyCode::Right), &services); // select Aaron
    view.handle_input(&press(KeyCode::Tab), &services); // Volume
    view.handle_input(&press(KeyCode::Tab), &services); // Speed
    view.handle_input(&press(KeyCode::Tab), &services); // Pitch
    view.handle_input(&press(KeyCode::Tab), &services); // Speak
    assert_eq!(view.focus, FormField::Speak);
    view.handle_input(&press(KeyCode::Enter), &services);

    let requests = engine.recorded();
    assert_eq!(requests.len(), 1);
    let r = &requests[0];
    assert_eq!(r.text, "Hello world");
    assert_eq!(r.voice, VoiceHandle::new("com.voice.aaron"));
    assert!((r.rate - 0.5).abs() < 1e-6, "speed starts at normal rate");
    assert!((r.volume - 0.8).abs() < 1e-6);
    assert!((r.pitch - 0.8).abs() < 1e-6);
    assert_eq!(r.trailing_silence, Duration::from_millis(200));
}

#[test]
fn each_activation_captures_the_values_of_that_moment() {
    let engine = Arc::new(RecordingEngine::default());
    let (services, _rx) = services_with(engine.clone());

    let mut view = SpeakViewState::new(&SpeechConfig::default());
    view.set_catalog(snapshot_from(&mixed_catalog()));
    view.selected = Some(1); // Daniel

    view.activate_speak(engine.as_ref());

    view.focus = FormField::Volume;
    view.handle_input(&press(KeyCode::Left), &services);
    view.focus = FormField::Pitch;
    view.handle_input(&press(KeyCode::Right), &services);
    view.handle_input(&press(KeyCode::Right), &services);

    view.activate_speak(engine.as_ref());

    let requests = engine.recorded();
    assert_eq!(requests.len(), 2);
    assert!((requests[0].volume - 0.8).abs() < 1e-6);
    assert!((requests[0].pitch - 0.8).abs() < 1e-6);
    assert!((requests[1].volume - 0.75).abs() < 1e-6);
    assert!((requests[1].pitch - 1.0).abs() < 1e-6);
    assert_eq!(requests[0].voice, requests[1].voice);
}

#[test]
fn speak_without_selection_never_reaches_the_engine() {
    let engine = Arc::new(RecordingEngine::default());
    let (services, _rx) = services_with(engine.clone());

    let mut view = SpeakViewState::new(&SpeechConfig::default());
    view.set_catalog(snapshot_from(&mixed_catalog()));
    type_text(&mut view, &services, "nobody hears this");

    view.focus = FormField::Speak;
    view.handle_input(&press(KeyCode::Enter), &services);
    view.handle_input(&press(KeyCode::Char(' ')), &services);

    assert!(engine.recorded().is_empty());
}

#[test]
fn relabeling_the_same_catalog_is_stable() {
    let catalog = mixed_catalog();
    let first = available_voice_options(&catalog).expect("scan cannot fail");
    let second = available_voice_options(&catalog).expect("scan cannot fail");

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a, b);
        assert_eq!(a.label, b.label);
    }
}
