//! Dedicated speech synthesis thread for the TUI.
//!
//! The platform `Tts` handle is `!Send`, so it must live on a single OS
//! thread. `SpeechWorker` spawns a persistent `std::thread` that owns the
//! engine and receives commands via `std::sync::mpsc`. The one-shot catalog
//! snapshot flows back to the TUI via
//! `tokio::sync::mpsc::UnboundedSender<AppEvent>`.
//!
//! Requests are serialized: one utterance plays at a time, followed by its
//! trailing silence, then the next queued request is configured and
//! dispatched. That keeps per-request rate/pitch/volume capture meaningful
//! on engines where those are global settings rather than utterance
//! attributes.

use std::collections::VecDeque;
use std::sync::mpsc as sync_mpsc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc as tokio_mpsc;
use tts::{Features, Tts, Voice};

use super::events::AppEvent;
use crate::core::speech::{
    available_voice_options, detect_locale, CatalogSnapshot, PlatformVoice, PlaybackRequest,
    RateBounds, ScannedCatalog, SpeechEngine, SpeechError,
};

// ============================================================================
// Types
// ============================================================================

/// Commands sent from the async TUI to the speech thread.
pub enum SpeechCommand {
    Speak(PlaybackRequest),
    Shutdown,
}

/// Worker-side playback state machine.
enum Playback {
    Idle,
    Speaking { since: Instant, trailing: Duration },
    Cooldown { until: Instant },
}

/// How long after dispatch before `is_speaking` is trusted; engines report
/// idle for a beat while the utterance spools up.
const DISPATCH_GRACE: Duration = Duration::from_millis(150);

// ============================================================================
// SpeechWorker
// ============================================================================

/// Fire-and-forget speech dispatch backed by a dedicated OS thread.
pub struct SpeechWorker {
    cmd_tx: sync_mpsc::Sender<SpeechCommand>,
}

impl SpeechWorker {
    /// Spawn the speech thread and return a handle. The thread scans the
    /// voice catalog once and reports it through `event_tx`; if the engine
    /// fails to start, an empty snapshot is reported instead and every
    /// later request is dropped.
    pub fn spawn(event_tx: tokio_mpsc::UnboundedSender<AppEvent>) -> Self {
        let (cmd_tx, cmd_rx) = sync_mpsc::channel();

        std::thread::Builder::new()
            .name("speech-engine".into())
            .spawn(move || speech_thread(cmd_rx, event_tx))
            .expect("failed to spawn speech thread");

        Self { cmd_tx }
    }
}

impl SpeechEngine for SpeechWorker {
    fn speak(&self, request: PlaybackRequest) {
        if self.cmd_tx.send(SpeechCommand::Speak(request)).is_err() {
            log::warn!("{}; utterance dropped", SpeechError::WorkerGone);
        }
    }
}

impl Drop for SpeechWorker {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(SpeechCommand::Shutdown);
    }
}

// ============================================================================
// Speech thread
// ============================================================================

fn speech_thread(
    cmd_rx: sync_mpsc::Receiver<SpeechCommand>,
    event_tx: tokio_mpsc::UnboundedSender<AppEvent>,
) {
    let locale = detect_locale();

    // Initialize the engine once for the thread's lifetime.
    let mut tts = match Tts::default() {
        Ok(t) => t,
        Err(e) => {
            log::error!("{}", SpeechError::EngineInit(e.to_string()));
            let _ = event_tx.send(AppEvent::CatalogLoaded(CatalogSnapshot::empty(locale)));
            return;
        }
    };

    let features = tts.supported_features();
    let platform_voices = match tts.voices() {
        Ok(v) => v,
        Err(e) => {
            log::warn!("{}", SpeechError::Enumeration(e.to_string()));
            Vec::new()
        }
    };

    let scanned = ScannedCatalog {
        voices: platform_voices
            .iter()
            .map(|v| PlatformVoice {
                id: v.id(),
                name: v.name(),
                language: v.language().to_string(),
            })
            .collect(),
        locale: locale.clone(),
    };
    let options = match available_voice_options(&scanned) {
        Ok(options) => options,
        Err(e) => {
            log::warn!("Voice catalog filter failed: {e}");
            Vec::new()
        }
    };

    let rate = if features.rate {
        RateBounds {
            min: tts.min_rate(),
            max: tts.max_rate(),
            normal: tts.normal_rate(),
        }
    } else {
        RateBounds::default()
    };

    log::info!(
        "Speech engine ready: {} installed voices, {} for locale {locale}",
        platform_voices.len(),
        options.len()
    );
    let _ = event_tx.send(AppEvent::CatalogLoaded(CatalogSnapshot {
        options,
        locale,
        rate,
    }));

    let mut queue: VecDeque<PlaybackRequest> = VecDeque::new();
    let mut playback = Playback::Idle;

    loop {
        // Receive commands with a short timeout so we can poll engine state.
        match cmd_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(SpeechCommand::Speak(request)) => {
                queue.push_back(request);
            }

            Ok(SpeechCommand::Shutdown) => {
                if features.stop {
                    let _ = tts.stop();
                }
                return;
            }

            Err(sync_mpsc::RecvTimeoutError::Timeout) => {
                // Fall through to the playback state machine
            }

            Err(sync_mpsc::RecvTimeoutError::Disconnected) => {
                return;
            }
        }

        // Detect the end of the current utterance and honor its trailing
        // silence before the next one may start.
        playback = match playback {
            Playback::Speaking { since, trailing } => {
                if since.elapsed() >= DISPATCH_GRACE && !engine_is_speaking(&mut tts, &features) {
                    Playback::Cooldown {
                        until: Instant::now() + trailing,
                    }
                } else {
                    Playback::Speaking { since, trailing }
                }
            }
            Playback::Cooldown { until } if Instant::now() >= until => Playback::Idle,
            other => other,
        };

        if matches!(playback, Playback::Idle) {
            if let Some(request) = queue.pop_front() {
                let trailing = request.trailing_silence;
                if dispatch(&mut tts, &features, &platform_voices, request) {
                    playback = Playback::Speaking {
                        since: Instant::now(),
                        trailing,
                    };
                }
            }
        }
    }
}

fn engine_is_speaking(tts: &mut Tts, features: &Features) -> bool {
    if !features.is_speaking {
        // No way to poll; treat the utterance as finished and rely on the
        // engine's own serialization of non-interrupting utterances.
        return false;
    }
    tts.is_speaking().unwrap_or(false)
}

/// Configure the engine for one request and dispatch it. Returns whether an
/// utterance is now in flight. Failures are logged and swallowed; the form
/// never hears about them.
fn dispatch(
    tts: &mut Tts,
    features: &Features,
    voices: &[Voice],
    request: PlaybackRequest,
) -> bool {
    let Some(voice) = voices.iter().find(|v| v.id() == request.voice.as_str()) else {
        log::warn!("Voice {} not found; utterance dropped", request.voice);
        return false;
    };

    if features.voice {
        if let Err(e) = tts.set_voice(voice) {
            log::warn!("set_voice({}) failed: {e}", request.voice);
        }
    }
    if features.rate {
        let rate = request.rate.clamp(tts.min_rate(), tts.max_rate());
        if let Err(e) = tts.set_rate(rate) {
            log::warn!("set_rate({rate}) failed: {e}");
        }
    }
    if features.pitch {
        let pitch = request.pitch.clamp(tts.min_pitch(), tts.max_pitch());
        if let Err(e) = tts.set_pitch(pitch) {
            log::warn!("set_pitch({pitch}) failed: {e}");
        }
    }
    if features.volume {
        let volume = request.volume.clamp(tts.min_volume(), tts.max_volume());
        if let Err(e) = tts.set_volume(volume) {
            log::warn!("set_volume({volume}) failed: {e}");
        }
    }

    match tts.speak(request.text, false) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("{}", SpeechError::Dispatch(e.to_string()));
            false
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
