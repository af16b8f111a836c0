use std::sync::Arc;

use tokio::sync::mpsc;

use crate::core::speech::SpeechEngine;

use super::events::AppEvent;

/// Centralized handle to the speech backend.
///
/// Created once at startup, then passed by reference to the form view.
/// The voice catalog itself arrives later as an `AppEvent::CatalogLoaded`
/// once the backend's one-shot scan finishes.
pub struct Services {
    pub engine: Arc<dyn SpeechEngine>,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Initialize the speech backend.
    ///
    /// With `platform-tts` this spawns the engine worker thread, which scans
    /// the voice catalog and reports it through `event_tx`. Without the
    /// feature the catalog is immediately reported empty and every request
    /// is logged and dropped; the form stays usable but inert.
    pub fn init(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let engine = spawn_engine(&event_tx);
        Self { engine, event_tx }
    }
}

#[cfg(feature = "platform-tts")]
fn spawn_engine(event_tx: &mpsc::UnboundedSender<AppEvent>) -> Arc<dyn SpeechEngine> {
    log::info!("Starting platform speech engine");
    Arc::new(super::speech::SpeechWorker::spawn(event_tx.clone()))
}

#[cfg(not(feature = "platform-tts"))]
fn spawn_engine(event_tx: &mpsc::UnboundedSender<AppEvent>) -> Arc<dyn SpeechEngine> {
    use crate::core::speech::{detect_locale, CatalogSnapshot, NullEngine};

    log::warn!("Built without platform-tts; speech requests will be logged and dropped");
    let _ = event_tx.send(AppEvent::CatalogLoaded(CatalogSnapshot::empty(
        detect_locale(),
    )));
    Arc::new(NullEngine)
}
