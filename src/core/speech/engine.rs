//! Speech engine seam.

use super::types::PlaybackRequest;

/// Dispatch target for playback requests.
///
/// `speak` is fire-and-forget: it returns immediately and the outcome is
/// never reported back to the caller. Implementations log their own
/// failures; nothing reaches the UI.
#[cfg_attr(test, mockall::automock)]
pub trait SpeechEngine: Send + Sync {
    fn speak(&self, request: PlaybackRequest);
}

/// Stand-in used when no platform engine is available, either because the
/// `platform-tts` feature is off or the engine failed to start. Offers no
/// voices, so the picker stays empty and Speak stays inert; anything that
/// does arrive is logged and dropped.
#[derive(Debug, Default)]
pub struct NullEngine;

impl SpeechEngine for NullEngine {
    fn speak(&self, request: PlaybackRequest) {
        log::debug!(
            "No speech engine; dropping {}-char utterance for voice {}",
            request.text.chars().count(),
            request.voice
        );
    }
}
