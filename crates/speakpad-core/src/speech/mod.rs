//! Speech synthesis gateway.

mod recording;

#[cfg(not(target_arch = "wasm32"))]
mod system;

pub use recording::{RecordingSpeech, Utterance};

#[cfg(not(target_arch = "wasm32"))]
pub use system::{SynthesizerKind, SystemSpeech, parse_espeak_voices, parse_say_voices};

use crate::storage::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Speech errors.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No voice available")]
    NoVoiceAvailable,
    #[error("Failed to launch synthesizer: {0}")]
    Launch(String),
    #[error("Failed to list voices: {0}")]
    Catalog(String),
}

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// A synthesis voice offered by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Opaque identifier passed back to the synthesizer.
    pub id: String,
    /// Human readable name.
    pub display_name: String,
    /// Language tag, e.g. `en-US`.
    pub language: String,
}

impl VoiceDescriptor {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            language: language.into(),
        }
    }

    /// Row text for voice lists: `"Name (language)"`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.display_name, self.language)
    }
}

/// Options for a single utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakOptions {
    /// Voice to use; `None` lets the synthesizer pick.
    pub voice_id: Option<String>,
    /// Pitch multiplier, 1.0 is the voice's natural pitch.
    pub pitch: f32,
    /// Rate multiplier, 1.0 is the voice's natural rate.
    pub rate: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            voice_id: None,
            pitch: 1.0,
            rate: 1.0,
        }
    }
}

/// Platform speech synthesizer.
///
/// `speak` returns as soon as the utterance has been handed over. Callers
/// never observe completion, and a new utterance does not cancel one that
/// is still playing.
pub trait SpeechGateway: Send + Sync {
    /// List the voices the platform offers, in platform order.
    fn list_voices(&self) -> BoxFuture<'_, SpeechResult<Vec<VoiceDescriptor>>>;

    /// Start speaking `text`.
    fn speak(&self, text: &str, options: &SpeakOptions) -> SpeechResult<()>;
}
