//! Speech gateway that records utterances instead of playing them.

use super::{SpeakOptions, SpeechError, SpeechGateway, SpeechResult, VoiceDescriptor};
use crate::storage::BoxFuture;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// One recorded `speak` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub options: SpeakOptions,
}

/// Speech gateway with a fixed catalog that records every utterance.
///
/// Used by tests and headless runs.
#[derive(Default)]
pub struct RecordingSpeech {
    voices: Vec<VoiceDescriptor>,
    spoken: Mutex<Vec<Utterance>>,
    /// When set, `list_voices` fails.
    catalog_broken: AtomicBool,
}

impl RecordingSpeech {
    /// Create a gateway with no voices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway offering the given voices.
    pub fn with_voices(voices: Vec<VoiceDescriptor>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// Make `list_voices` fail from now on.
    pub fn break_catalog(&self) {
        self.catalog_broken.store(true, Ordering::SeqCst);
    }

    /// Everything spoken so far, oldest first.
    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken
            .lock()
            .map(|spoken| spoken.clone())
            .unwrap_or_default()
    }
}

impl SpeechGateway for RecordingSpeech {
    fn list_voices(&self) -> BoxFuture<'_, SpeechResult<Vec<VoiceDescriptor>>> {
        Box::pin(async move {
            if self.catalog_broken.load(Ordering::SeqCst) {
                return Err(SpeechError::Catalog("voice listing disabled".to_string()));
            }
            Ok(self.voices.clone())
        })
    }

    fn speak(&self, text: &str, options: &SpeakOptions) -> SpeechResult<()> {
        let mut spoken = self
            .spoken
            .lock()
            .map_err(|e| SpeechError::Launch(format!("Lock error: {}", e)))?;
        spoken.push(Utterance {
            text: text.to_string(),
            options: options.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_records_in_order() {
        let speech = RecordingSpeech::new();
        speech.speak("one", &SpeakOptions::default()).unwrap();
        speech.speak("two", &SpeakOptions::default()).unwrap();

        let texts: Vec<_> = speech.spoken().into_iter().map(|u| u.text).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn test_lists_configured_voices() {
        let voices = vec![
            VoiceDescriptor::new("b", "Bea", "en-GB"),
            VoiceDescriptor::new("a", "Alva", "sv-SE"),
        ];
        let speech = RecordingSpeech::with_voices(voices.clone());

        assert_eq!(block_on(speech.list_voices()).unwrap(), voices);
    }

    #[test]
    fn test_broken_catalog() {
        let speech = RecordingSpeech::with_voices(vec![VoiceDescriptor::new("a", "Alva", "sv-SE")]);
        speech.break_catalog();

        assert!(matches!(block_on(speech.list_voices()), Err(SpeechError::Catalog(_))));
    }
}
