//! SpeakPad Core Library
//!
//! Platform-agnostic interaction state for the SpeakPad screen: the draggable
//! marker's position model, the text/voice state, and the controller that
//! couples them to the persistence and speech gateways.

pub mod controller;
pub mod drag;
pub mod input;
pub mod speech;
pub mod storage;
pub mod text_state;

pub use controller::{
    ControllerConfig, InteractionController, Notice, FALLBACK_PROMPT, NO_VOICE_MESSAGE, STORAGE_KEY,
};
pub use drag::DragOffset;
pub use input::{GestureEvent, PointerEvent, PointerTracker};
pub use speech::{RecordingSpeech, SpeakOptions, SpeechError, SpeechGateway, SpeechResult, VoiceDescriptor};
pub use storage::{MemoryStorage, Storage, StorageError, StorageResult};
pub use text_state::TextState;
