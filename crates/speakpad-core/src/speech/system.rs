//! Speech through the platform's command-line synthesizer.

use super::{SpeakOptions, SpeechError, SpeechGateway, SpeechResult, VoiceDescriptor};
use crate::storage::BoxFuture;
use std::io::Write;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

/// Words per minute at rate 1.0.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;
/// espeak pitch (0-99) at pitch 1.0.
const BASE_ESPEAK_PITCH: f32 = 50.0;

/// Which synthesizer binary to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesizerKind {
    /// macOS `say`.
    Say,
    /// `espeak-ng` (Linux and other Unix).
    Espeak,
}

impl SynthesizerKind {
    /// Synthesizer for the current platform.
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::Say
        } else {
            Self::Espeak
        }
    }

    fn program(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::Espeak => "espeak-ng",
        }
    }

    fn list_args(self) -> &'static [&'static str] {
        match self {
            Self::Say => &["-v", "?"],
            Self::Espeak => &["--voices"],
        }
    }

    /// Arguments for one utterance. The text itself goes through stdin.
    pub fn speak_args(self, options: &SpeakOptions) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(voice) = &options.voice_id {
            args.push("-v".to_string());
            args.push(voice.clone());
        }

        let words_per_minute = (BASE_WORDS_PER_MINUTE * options.rate).round().max(1.0) as u32;
        match self {
            Self::Say => {
                // `say` has no pitch switch
                args.push("-r".to_string());
                args.push(words_per_minute.to_string());
            }
            Self::Espeak => {
                let pitch = (BASE_ESPEAK_PITCH * options.pitch).round().clamp(0.0, 99.0) as u32;
                args.push("-s".to_string());
                args.push(words_per_minute.to_string());
                args.push("-p".to_string());
                args.push(pitch.to_string());
                args.push("--stdin".to_string());
            }
        }
        args
    }

    fn parse_voices(self, listing: &str) -> Vec<VoiceDescriptor> {
        match self {
            Self::Say => parse_say_voices(listing),
            Self::Espeak => parse_espeak_voices(listing),
        }
    }
}

/// Speech gateway backed by `say` or `espeak-ng`.
#[derive(Debug, Clone)]
pub struct SystemSpeech {
    kind: SynthesizerKind,
}

impl SystemSpeech {
    /// Use the synthesizer for the current platform.
    pub fn new() -> Self {
        Self::with_kind(SynthesizerKind::detect())
    }

    pub fn with_kind(kind: SynthesizerKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SynthesizerKind {
        self.kind
    }
}

impl Default for SystemSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechGateway for SystemSpeech {
    fn list_voices(&self) -> BoxFuture<'_, SpeechResult<Vec<VoiceDescriptor>>> {
        let kind = self.kind;
        Box::pin(async move {
            let output = Command::new(kind.program())
                .args(kind.list_args())
                .output()
                .map_err(|e| SpeechError::Catalog(format!("{}: {}", kind.program(), e)))?;

            if !output.status.success() {
                return Err(SpeechError::Catalog(format!(
                    "{} exited with {}",
                    kind.program(),
                    output.status
                )));
            }

            let listing = String::from_utf8_lossy(&output.stdout);
            Ok(kind.parse_voices(&listing))
        })
    }

    fn speak(&self, text: &str, options: &SpeakOptions) -> SpeechResult<()> {
        let child = Command::new(self.kind.program())
            .args(self.kind.speak_args(options))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SpeechError::Launch(format!("{}: {}", self.kind.program(), e)))?;

        let (result, _reaper) = feed_and_reap(child, text);
        result
    }
}

/// Pass `text` on the child's stdin, then reap it on a background thread.
///
/// The child is reaped whether or not the write succeeds; completion is
/// never reported.
fn feed_and_reap(mut child: Child, text: &str) -> (SpeechResult<()>, JoinHandle<()>) {
    let result = match child.stdin.take() {
        // Dropping stdin closes the pipe so the synthesizer sees EOF
        Some(mut stdin) => stdin
            .write_all(text.as_bytes())
            .map_err(|e| SpeechError::Launch(format!("Failed to pass text: {}", e))),
        None => Ok(()),
    };

    let reaper = std::thread::spawn(move || {
        if let Err(e) = child.wait() {
            log::debug!("Synthesizer wait failed: {}", e);
        }
    });
    (result, reaper)
}

/// Parse the output of `say -v ?`.
///
/// Each line looks like `Name   en_US    # sample sentence`; names may
/// contain spaces. The name doubles as the voice id.
pub fn parse_say_voices(listing: &str) -> Vec<VoiceDescriptor> {
    listing
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next()?.trim();
            let (name, locale) = entry.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || locale.is_empty() {
                return None;
            }
            Some(VoiceDescriptor::new(name, name, locale.replace('_', "-")))
        })
        .collect()
}

/// Parse the output of `espeak-ng --voices`.
///
/// Columns are `Pty Language Age/Gender VoiceName File [Other Languages]`.
/// The language column is what `-v` accepts, so it becomes the id.
pub fn parse_espeak_voices(listing: &str) -> Vec<VoiceDescriptor> {
    listing
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 5 || fields[0] == "Pty" {
                return None;
            }
            let language = fields[1];
            let name = fields[3].replace('_', " ");
            Some(VoiceDescriptor::new(language, name, language))
        })
        .collect()
}
