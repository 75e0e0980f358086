//! Event types flowing into and out of the session controller.
//!
//! Intentionally lightweight so adapters and the display layer can exchange
//! them without copying transcripts around.

use crate::error::AssistError;
use crate::session::{InteractionState, SessionMode};
use crate::speech::{RecognitionEvent, SynthesisEvent};
use crate::transcript::Turn;

/// Where a submitted message came from.
///
/// Voice-originated submits always get their reply spoken back, regardless
/// of the session's current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOrigin {
    /// Typed into the input field.
    Typed,
    /// Produced by a finalized speech-recognition capture.
    Voice,
}

/// Asynchronous completions delivered to the session's event loop.
///
/// The session mutates state only on its own task; network replies and
/// adapter callbacks re-enter through this channel so guard checks and state
/// changes never interleave.
#[derive(Debug)]
pub enum SessionEvent {
    /// The in-flight chat request resolved.
    ReplyArrived {
        /// Session generation captured when the request was issued. Replies
        /// from a superseded generation are discarded.
        generation: u64,
        /// Origin of the submit that issued this request.
        origin: SubmitOrigin,
        /// The assistant's reply text, or the failure to recover from.
        result: Result<String, AssistError>,
    },
    /// The speech-input adapter finished a capture.
    Recognition(RecognitionEvent),
    /// The speech-output adapter reported utterance progress.
    Synthesis(SynthesisEvent),
}

/// State changes broadcast to observers (the display layer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// A turn was appended to the transcript.
    TurnAppended(Turn),
    /// The interaction state changed.
    StateChanged(InteractionState),
    /// The session mode changed.
    ModeChanged(SessionMode),
    /// Microphone capture started or stopped.
    ListeningChanged(bool),
}
