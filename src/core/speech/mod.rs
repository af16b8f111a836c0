//! Speech Domain Module
//!
//! Everything between the form and the platform engine:
//!
//! - `types`: voice/handle/request types and the speech error enum
//! - `catalog`: locale filtering of platform voices into picker options
//! - `engine`: the fire-and-forget dispatch seam and its fallback

pub mod catalog;
pub mod engine;
pub mod types;

// Re-export commonly used types
pub use catalog::{
    available_voice_options, detect_locale, CatalogSnapshot, ScannedCatalog, VoiceCatalogProvider,
};
pub use engine::{NullEngine, SpeechEngine};
pub use types::{
    PlatformVoice, PlaybackRequest, RateBounds, Result, SpeechError, VoiceHandle, VoiceOption,
    TRAILING_SILENCE,
};
