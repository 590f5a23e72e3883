//! Text and voice selection state of the screen.

use crate::speech::VoiceDescriptor;

/// Draft text, persisted text and voice selection.
#[derive(Debug, Clone, Default)]
pub struct TextState {
    /// Live contents of the text input.
    draft: String,
    /// Last value read back from storage.
    persisted: String,
    /// Voices offered by the speech gateway, in catalog order.
    catalog: Vec<VoiceDescriptor>,
    /// Voice explicitly picked by the user.
    selected_voice_id: Option<String>,
}

impl TextState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn persisted(&self) -> &str {
        &self.persisted
    }

    pub fn set_persisted(&mut self, text: impl Into<String>) {
        self.persisted = text.into();
    }

    pub fn catalog(&self) -> &[VoiceDescriptor] {
        &self.catalog
    }

    pub fn set_catalog(&mut self, catalog: Vec<VoiceDescriptor>) {
        self.catalog = catalog;
    }

    pub fn selected_voice_id(&self) -> Option<&str> {
        self.selected_voice_id.as_deref()
    }

    pub fn select_voice(&mut self, id: impl Into<String>) {
        self.selected_voice_id = Some(id.into());
    }

    /// Check whether `id` names a voice in the current catalog.
    pub fn has_voice(&self, id: &str) -> bool {
        self.catalog.iter().any(|voice| voice.id == id)
    }

    /// Voice that speaking would use right now.
    ///
    /// An explicit selection wins if the catalog still offers it; otherwise
    /// the first catalog entry stands in. The fallback is never written back
    /// into the selection.
    pub fn effective_voice(&self) -> Option<&VoiceDescriptor> {
        self.selected_voice_id
            .as_deref()
            .and_then(|id| self.catalog.iter().find(|voice| voice.id == id))
            .or_else(|| self.catalog.first())
    }

    /// Text to speak: the persisted value, or `fallback` when it is empty.
    pub fn utterance_text<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.persisted.is_empty() {
            fallback
        } else {
            &self.persisted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("alva", "Alva", "sv-SE"),
            VoiceDescriptor::new("daniel", "Daniel", "en-GB"),
        ]
    }

    #[test]
    fn test_empty_catalog_has_no_voice() {
        let state = TextState::new();
        assert!(state.effective_voice().is_none());
    }

    #[test]
    fn test_first_entry_is_default_without_selection() {
        let mut state = TextState::new();
        state.set_catalog(catalog());

        assert_eq!(state.effective_voice().map(|v| v.id.as_str()), Some("alva"));
        assert!(state.selected_voice_id().is_none());
    }

    #[test]
    fn test_explicit_selection_wins() {
        let mut state = TextState::new();
        state.set_catalog(catalog());
        state.select_voice("daniel");

        assert_eq!(state.effective_voice().map(|v| v.id.as_str()), Some("daniel"));
    }

    #[test]
    fn test_unknown_selection_falls_back_to_first() {
        let mut state = TextState::new();
        state.set_catalog(catalog());
        state.select_voice("x");

        assert_eq!(state.selected_voice_id(), Some("x"));
        assert!(!state.has_voice("x"));
        assert_eq!(state.effective_voice().map(|v| v.id.as_str()), Some("alva"));
    }

    #[test]
    fn test_unknown_selection_with_empty_catalog() {
        let mut state = TextState::new();
        state.select_voice("x");
        assert!(state.effective_voice().is_none());
    }

    #[test]
    fn test_utterance_text_fallback() {
        let mut state = TextState::new();
        assert_eq!(state.utterance_text("fallback"), "fallback");

        state.set_persisted("stored");
        assert_eq!(state.utterance_text("fallback"), "stored");
    }

    #[test]
    fn test_draft_does_not_touch_persisted() {
        let mut state = TextState::new();
        state.set_draft("typing");
        assert_eq!(state.draft(), "typing");
        assert_eq!(state.persisted(), "");
    }
}
