//! Speech adapter seams: capture (recognition) and playback (synthesis).
//!
//! The session controller never talks to platform speech APIs directly. It is
//! constructed with a [`SpeechInput`] and a [`SpeechOutput`], and the adapters
//! report progress back through tagged events delivered on the session's
//! event channel. This keeps the state machine testable with plain fakes and
//! lets a deployment degrade gracefully when the platform has no speech
//! capability (see [`null`]).

pub mod null;

pub use null::{UnsupportedSpeechInput, UnsupportedSpeechOutput};

use crate::error::Result;

/// Outcome of one speech-recognition capture.
///
/// Captures are single-utterance with no interim results: exactly one event
/// is emitted per capture, after which the adapter is idle again. Callers
/// never need to call [`SpeechInput::stop_listening`] after a natural
/// completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// The capture completed with a finalized transcript.
    Finalized(String),
    /// The capture failed (permission denied, no speech, platform error).
    Failed(String),
}

/// Lifecycle event for one synthesis utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisEvent {
    /// Audio output started.
    Started,
    /// Audio output finished normally.
    Ended,
    /// Audio output failed mid-utterance.
    Errored(String),
}

/// Speech capture (microphone + recognition).
///
/// Implementations wrap a platform recognition capability configured for
/// single-utterance, non-interim capture. Starting may prompt the user for
/// microphone access.
pub trait SpeechInput: Send + Sync {
    /// Begin a capture. The session guards against starting while already
    /// listening, so implementations need not be idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform lacks the capability or refuses to
    /// start (e.g. permission denied). Failing here must not leave a capture
    /// running.
    fn start_listening(&self) -> Result<()>;

    /// Cancel an in-progress capture without emitting a transcript.
    /// Safe to call when idle.
    fn stop_listening(&self);
}

/// Speech playback (synthesis).
pub trait SpeechOutput: Send + Sync {
    /// Speak the given text. At most one utterance is active at a time:
    /// implementations cancel any utterance already in progress before
    /// starting the new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform lacks the capability or the
    /// utterance cannot be queued. Runtime playback failures are reported
    /// via [`SynthesisEvent::Errored`] instead.
    fn speak(&self, text: &str) -> Result<()>;

    /// Cancel any in-progress utterance. No-op when idle.
    fn cancel(&self);
}

/// Strip presentation markup before vocalizing.
///
/// Replies are written for the chat pane and may carry markdown emphasis and
/// heading characters that sound wrong when read aloud.
pub fn strip_speech_markup(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '#')).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn strip_removes_emphasis_and_headings() {
        assert_eq!(strip_speech_markup("**bold** claim"), "bold claim");
        assert_eq!(strip_speech_markup("# Findings"), " Findings");
        assert_eq!(strip_speech_markup("plain text"), "plain text");
    }

    #[test]
    fn strip_leaves_other_punctuation_alone() {
        assert_eq!(
            strip_speech_markup("confidence: 92%, verdict!"),
            "confidence: 92%, verdict!"
        );
    }
}
