//! Interaction controller: routes UI actions and pointer input to state and gateways.

use crate::drag::DragOffset;
use crate::input::{GestureEvent, PointerEvent, PointerTracker};
use crate::speech::{SpeakOptions, SpeechError, SpeechGateway, SpeechResult, VoiceDescriptor};
use crate::storage::Storage;
use crate::text_state::TextState;
use kurbo::{Point, Rect, Size, Vec2};
use std::sync::Arc;

/// Storage key for the saved text.
pub const STORAGE_KEY: &str = "storedText";

/// Spoken when nothing has been loaded yet.
pub const FALLBACK_PROMPT: &str = "Hello! Type something and save it.";

/// Notice shown when speaking is requested without any voice.
pub const NO_VOICE_MESSAGE: &str = "No available voices on this device.";

/// Controller settings.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Key the draft is saved under.
    pub storage_key: String,
    /// Text spoken while the persisted text is empty.
    pub fallback_prompt: String,
    pub pitch: f32,
    pub rate: f32,
    /// Message of the notice raised when no voice resolves.
    pub no_voice_message: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            fallback_prompt: FALLBACK_PROMPT.to_string(),
            pitch: 1.0,
            rate: 1.0,
            no_voice_message: NO_VOICE_MESSAGE.to_string(),
        }
    }
}

/// Blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

/// Owns the screen state and couples it to the gateways.
///
/// Storage failures are logged and swallowed. The only failure surfaced to
/// the user is speaking without a voice, which raises a [`Notice`].
pub struct InteractionController<S: Storage + ?Sized, V: SpeechGateway + ?Sized> {
    storage: Arc<S>,
    speech: Arc<V>,
    config: ControllerConfig,
    text: TextState,
    offset: DragOffset,
    pointer: PointerTracker,
    notice: Option<Notice>,
}

impl<S: Storage + ?Sized, V: SpeechGateway + ?Sized> InteractionController<S, V> {
    /// Create a controller with default settings.
    pub fn new(storage: Arc<S>, speech: Arc<V>) -> Self {
        Self::with_config(storage, speech, ControllerConfig::default())
    }

    pub fn with_config(storage: Arc<S>, speech: Arc<V>, config: ControllerConfig) -> Self {
        Self {
            storage,
            speech,
            config,
            text: TextState::new(),
            offset: DragOffset::new(),
            pointer: PointerTracker::new(),
            notice: None,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn text_state(&self) -> &TextState {
        &self.text
    }

    pub fn draft(&self) -> &str {
        self.text.draft()
    }

    pub fn persisted(&self) -> &str {
        self.text.persisted()
    }

    pub fn catalog(&self) -> &[VoiceDescriptor] {
        self.text.catalog()
    }

    pub fn selected_voice_id(&self) -> Option<&str> {
        self.text.selected_voice_id()
    }

    pub fn effective_voice(&self) -> Option<&VoiceDescriptor> {
        self.text.effective_voice()
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.text.set_draft(text);
    }

    /// Write the draft to storage.
    ///
    /// The persisted text is left alone: it only changes on `load`.
    pub async fn save(&mut self) {
        let draft = self.text.draft();
        match self.storage.save(&self.config.storage_key, draft).await {
            Ok(()) => log::info!("Text saved successfully: {:?}", draft),
            Err(e) => log::error!("Error saving data: {}", e),
        }
    }

    /// Read the stored text into the persisted slot.
    pub async fn load(&mut self) {
        match self.storage.load(&self.config.storage_key).await {
            Ok(Some(value)) => {
                log::info!("Text loaded successfully: {:?}", value);
                self.text.set_persisted(value);
            }
            Ok(None) => log::debug!("Nothing stored under {:?}", self.config.storage_key),
            Err(e) => log::error!("Error loading data: {}", e),
        }
    }

    /// Fetch the voice catalog. Meant to run once at startup.
    pub async fn fetch_voice_catalog(&mut self) {
        match self.speech.list_voices().await {
            Ok(voices) => {
                log::info!("Found {} voices", voices.len());
                log::debug!("Voices: {:?}", voices);
                self.text.set_catalog(voices);
            }
            Err(e) => log::error!("Error fetching voices: {}", e),
        }
    }

    /// Record an explicit voice choice.
    pub fn select_voice(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.text.has_voice(&id) {
            log::warn!("Selected voice {:?} is not in the catalog", id);
        }
        self.text.select_voice(id);
    }

    /// Speak the persisted text (or the fallback prompt) with the effective voice.
    ///
    /// Fire-and-forget: returns once the utterance is launched. Fails with
    /// [`SpeechError::NoVoiceAvailable`] and raises a notice when no voice
    /// resolves.
    pub fn speak(&mut self) -> SpeechResult<()> {
        let Some(voice) = self.text.effective_voice() else {
            log::warn!("Speak requested without any voice");
            self.notice = Some(Notice {
                title: "Speech".to_string(),
                message: self.config.no_voice_message.clone(),
            });
            return Err(SpeechError::NoVoiceAvailable);
        };

        let options = SpeakOptions {
            voice_id: Some(voice.id.clone()),
            pitch: self.config.pitch,
            rate: self.config.rate,
        };
        let text = self.text.utterance_text(&self.config.fallback_prompt);

        if let Err(e) = self.speech.speak(text, &options) {
            log::error!("Error speaking: {}", e);
        }
        Ok(())
    }

    /// Pending notice, if any.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn on_gesture_start(&mut self) {
        self.offset.begin();
    }

    /// `dx`/`dy` are the total displacement since the gesture started.
    pub fn on_gesture_move(&mut self, dx: f64, dy: f64) {
        self.offset.update(Vec2::new(dx, dy));
    }

    pub fn on_gesture_end(&mut self) {
        self.offset.end();
    }

    pub fn rendered_position(&self) -> Vec2 {
        self.offset.rendered_position()
    }

    pub fn drag_offset(&self) -> &DragOffset {
        &self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.offset.is_dragging()
    }

    /// Screen rectangle of the marker laid out at `home`.
    pub fn marker_bounds(&self, home: Point, size: Size) -> Rect {
        Rect::from_origin_size(home + self.rendered_position(), size)
    }

    /// Feed a raw pointer event; presses only grab the marker inside `marker`.
    pub fn handle_pointer_event(&mut self, event: PointerEvent, marker: Rect) {
        match self.pointer.handle(event, marker) {
            Some(GestureEvent::Start) => self.on_gesture_start(),
            Some(GestureEvent::Move(delta)) => self.on_gesture_move(delta.x, delta.y),
            Some(GestureEvent::End) => self.on_gesture_end(),
            None => {}
        }
    }
}
