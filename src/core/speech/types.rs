use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("Speech engine unavailable: {0}")]
    EngineInit(String),

    #[error("Voice enumeration failed: {0}")]
    Enumeration(String),

    #[error("Utterance dispatch failed: {0}")]
    Dispatch(String),

    #[error("Speech worker disconnected")]
    WorkerGone,
}

pub type Result<T> = std::result::Result<T, SpeechError>;

// ============================================================================
// Platform Voice Types
// ============================================================================

/// A voice as reported by the platform engine, in the platform's own order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformVoice {
    /// Opaque stable identifier the platform uses for this voice
    pub id: String,
    /// Human-readable voice name (e.g. "Samantha")
    pub name: String,
    /// Language code exactly as reported (e.g. "en-US")
    pub language: String,
}

/// Identity of a voice. Two options refer to the same voice iff their
/// handles are equal; names and language strings play no part.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceHandle(String);

impl VoiceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A picker entry: the platform voice plus its derived display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceOption {
    pub handle: VoiceHandle,
    pub voice: PlatformVoice,
    pub label: String,
}

impl VoiceOption {
    /// Builds the option for a platform voice, deriving the
    /// `"{name} ({language})"` label. Deriving twice yields the same label.
    pub fn new(voice: PlatformVoice) -> Self {
        let handle = VoiceHandle::new(voice.id.clone());
        let label = format!("{} ({})", voice.name, voice.language);
        Self { handle, voice, label }
    }
}

impl PartialEq for VoiceOption {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for VoiceOption {}

// ============================================================================
// Playback Types
// ============================================================================

/// Speech rate limits reported by the platform engine at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: f32,
    pub max: f32,
    /// The platform's default rate; initial position of the speed slider
    pub normal: f32,
}

impl Default for RateBounds {
    fn default() -> Self {
        // AVSpeechUtterance-style range, used until the engine reports its own
        Self { min: 0.0, max: 1.0, normal: 0.5 }
    }
}

impl RateBounds {
    /// Clamps a requested rate into the reported range.
    pub fn clamp(&self, rate: f32) -> f32 {
        rate.clamp(self.min, self.max)
    }
}

/// Pause appended after every utterance before the next one may start.
pub const TRAILING_SILENCE: Duration = Duration::from_millis(200);

/// Everything the engine needs to play one utterance. Field values are
/// captured at activation time; later form edits never touch a request
/// already built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub text: String,
    pub voice: VoiceHandle,
    pub rate: f32,
    pub volume: f32,            // 0.0 - 1.0
    pub pitch: f32,             // multiplier, 0.5 - 5.5
    pub trailing_silence: Duration,
}
