//! Fail-soft speech adapters for platforms without speech capabilities.
//!
//! The widget must stay usable as a text-only assistant when recognition or
//! synthesis is unavailable, so these stubs report "unsupported" instead of
//! panicking, and the session reverts state without touching the transcript.

use crate::error::{AssistError, Result};
use crate::speech::{SpeechInput, SpeechOutput};
use tracing::debug;

/// Speech input stub that reports the capability as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSpeechInput;

impl SpeechInput for UnsupportedSpeechInput {
    fn start_listening(&self) -> Result<()> {
        Err(AssistError::Recognition(
            "speech recognition is not available on this platform".to_owned(),
        ))
    }

    fn stop_listening(&self) {
        debug!("stop_listening on unsupported speech input (no-op)");
    }
}

/// Speech output stub that reports the capability as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedSpeechOutput;

impl SpeechOutput for UnsupportedSpeechOutput {
    fn speak(&self, _text: &str) -> Result<()> {
        Err(AssistError::Synthesis(
            "speech synthesis is not available on this platform".to_owned(),
        ))
    }

    fn cancel(&self) {
        debug!("cancel on unsupported speech output (no-op)");
    }
}
