//! Chat session controller: the interaction state machine.
//!
//! One [`ChatSession`] owns the transcript and all interaction state for a
//! single widget lifetime. User actions (typed submits, mic taps, mode
//! toggles) call directly into it; asynchronous completions (the chat reply,
//! recognition results, synthesis lifecycle) re-enter through the session's
//! event channel so that every guard check and state mutation runs on one
//! task, uninterleaved. [`SessionDriver`](crate::session::driver) wires the
//! channels up for front-ends.
//!
//! Cancellation semantics:
//! - a new capture interrupts in-progress synthesis (the user can always
//!   talk over the assistant),
//! - a mode toggle cancels in-progress synthesis (no audio plays for a mode
//!   the session is no longer in),
//! - a submit over a still-playing reply interrupts it before the next
//!   request is issued,
//! - closing the session advances the generation counter, so a chat reply
//!   that lands afterwards is discarded instead of mutating stale state.

pub mod driver;
pub mod events;

pub use driver::{SessionCommand, SessionDriver, SessionHandle};
pub use events::{SessionEvent, SessionUpdate, SubmitOrigin};

use crate::chat::ChatTransport;
use crate::config::AssistConfig;
use crate::error::AssistError;
use crate::speech::{
    RecognitionEvent, SpeechInput, SpeechOutput, SynthesisEvent, strip_speech_markup,
};
use crate::transcript::{Transcript, Turn};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Capacity of the observer update channel.
const UPDATE_CHANNEL_SIZE: usize = 64;

/// Whether the session is operating as text or voice interaction.
///
/// Exactly one mode is active at any time; replies are spoken only in voice
/// mode or for voice-originated submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Typed input, silent replies.
    Text,
    /// Mic input, spoken replies.
    Voice,
}

impl SessionMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Text => Self::Voice,
            Self::Voice => Self::Text,
        }
    }

    /// Wire name used in the chat request body.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
        }
    }
}

/// What the session is currently doing with respect to the assistant.
///
/// At most one chat request is in flight (`AwaitingReply`) and at most one
/// utterance is playing (`Speaking`). Microphone capture is tracked
/// separately (see [`ChatSession::is_listening`]) but is mutually exclusive
/// with `Speaking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    /// Nothing pending.
    Idle,
    /// A chat request is in flight; further submits are dropped.
    AwaitingReply,
    /// The assistant's reply is being spoken.
    Speaking,
}

/// The conversational session state machine.
///
/// Constructed with explicit collaborators so tests can substitute fakes:
/// a [`SpeechInput`], a [`SpeechOutput`], and a [`ChatTransport`].
pub struct ChatSession {
    config: AssistConfig,
    transcript: Transcript,
    mode: SessionMode,
    state: InteractionState,
    listening: bool,
    /// Bumped on close/reset; replies carrying an older generation are
    /// discarded.
    generation: u64,
    input: Arc<dyn SpeechInput>,
    output: Arc<dyn SpeechOutput>,
    chat: Arc<dyn ChatTransport>,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    update_tx: broadcast::Sender<SessionUpdate>,
}

impl ChatSession {
    /// Create a session with the given collaborators.
    ///
    /// Returns the session and the receiving end of its event channel. The
    /// caller (normally [`SessionDriver`]) must pump that receiver into
    /// [`ChatSession::handle_event`]; adapters obtain senders for it via
    /// [`ChatSession::event_sender`].
    pub fn new(
        config: AssistConfig,
        input: Arc<dyn SpeechInput>,
        output: Arc<dyn SpeechOutput>,
        chat: Arc<dyn ChatTransport>,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_SIZE);

        let session = Self {
            config,
            transcript: Transcript::new(),
            mode: SessionMode::Text,
            state: InteractionState::Idle,
            listening: false,
            generation: 0,
            input,
            output,
            chat,
            events_tx,
            update_tx,
        };
        (session, events_rx)
    }

    /// Sender adapters use to deliver recognition/synthesis events.
    pub fn event_sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.events_tx.clone()
    }

    /// Subscribe to observer updates (turns, state, mode, listening).
    pub fn subscribe_updates(&self) -> broadcast::Receiver<SessionUpdate> {
        self.update_tx.subscribe()
    }

    /// Current session mode.
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    /// Current interaction state.
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Whether microphone capture is in progress.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Read-only view of the conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Submit a message (transition 1).
    ///
    /// Ignored when the trimmed text is empty or a reply is already pending.
    /// A submit while the previous reply is still being spoken interrupts
    /// the playback. Appends the user turn, issues the chat request with the
    /// history as it stood before this turn, and moves to `AwaitingReply`.
    /// The reply re-enters via [`SessionEvent::ReplyArrived`].
    pub fn submit(&mut self, text: &str, origin: SubmitOrigin) {
        let message = text.trim();
        if message.is_empty() {
            return;
        }
        if self.state == InteractionState::AwaitingReply {
            debug!("dropping submit while a reply is pending");
            return;
        }

        // A submit over a still-playing reply interrupts it; otherwise the
        // state change below would orphan live audio that a later mode
        // toggle or mic tap could no longer find to cancel.
        if self.state == InteractionState::Speaking {
            self.output.cancel();
        }

        // History excludes the turn being submitted; the message travels in
        // its own request field.
        let mut history = self.transcript.snapshot();
        let cap = self.config.chat.max_history_turns;
        if cap > 0 && history.len() > cap {
            history.drain(..history.len() - cap);
        }

        self.push_turn(Turn::user(message));
        self.set_state(InteractionState::AwaitingReply);

        // Voice-originated submits are tagged voice on the wire even if the
        // user has since flipped the mode selector.
        let wire_mode = if origin == SubmitOrigin::Voice {
            SessionMode::Voice
        } else {
            self.mode
        };

        let generation = self.generation;
        let chat = Arc::clone(&self.chat);
        let events = self.events_tx.clone();
        let timeout = self.config.chat.request_timeout();
        let message = message.to_owned();

        tokio::spawn(async move {
            let result =
                match tokio::time::timeout(timeout, chat.send(&message, &history, wire_mode)).await
                {
                    Ok(result) => result,
                    Err(_) => Err(AssistError::Chat(format!(
                        "request timed out after {}ms",
                        timeout.as_millis()
                    ))),
                };
            // Receiver gone means the session was torn down; nothing to do.
            let _ = events.send(SessionEvent::ReplyArrived {
                generation,
                origin,
                result,
            });
        });
    }

    /// Toggle between text and voice mode (transition 2).
    ///
    /// Switching away mid-utterance stops audio immediately.
    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
        info!("session mode switched to {:?}", self.mode);
        let _ = self.update_tx.send(SessionUpdate::ModeChanged(self.mode));

        if self.state == InteractionState::Speaking {
            self.output.cancel();
            self.set_state(InteractionState::Idle);
        }
    }

    /// Mic tap (transitions 3 and 4).
    ///
    /// Starts a capture when idle, cancelling any in-progress synthesis
    /// first so the user can interrupt the assistant; stops the capture when
    /// already listening. An adapter that cannot start reverts silently.
    pub fn press_mic(&mut self) {
        if self.listening {
            self.input.stop_listening();
            self.set_listening(false);
            return;
        }

        if self.state == InteractionState::Speaking {
            self.output.cancel();
            self.set_state(InteractionState::Idle);
        }

        match self.input.start_listening() {
            Ok(()) => self.set_listening(true),
            Err(e) => warn!("speech capture unavailable: {e}"),
        }
    }

    /// Handle an asynchronous completion.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ReplyArrived {
                generation,
                origin,
                result,
            } => self.handle_reply(generation, origin, result),
            SessionEvent::Recognition(event) => self.handle_recognition(event),
            SessionEvent::Synthesis(event) => self.handle_synthesis(event),
        }
    }

    /// Tear the session down (transition 5): cancel synthesis and capture,
    /// and invalidate any in-flight chat request.
    pub fn close(&mut self) {
        self.generation += 1;
        if self.state == InteractionState::Speaking {
            self.output.cancel();
        }
        if self.listening {
            self.input.stop_listening();
            self.set_listening(false);
        }
        self.set_state(InteractionState::Idle);
        info!("session closed");
    }

    fn handle_reply(
        &mut self,
        generation: u64,
        origin: SubmitOrigin,
        result: Result<String, AssistError>,
    ) {
        if generation != self.generation {
            debug!("discarding reply from superseded session generation");
            return;
        }

        match result {
            Ok(reply) => {
                self.push_turn(Turn::assistant(reply.clone()));
                self.set_state(InteractionState::Idle);
                if origin == SubmitOrigin::Voice || self.mode == SessionMode::Voice {
                    self.start_speaking(&reply);
                }
            }
            Err(e) => {
                warn!("chat request failed: {e}");
                let fallback = self.config.chat.fallback_message.clone();
                self.push_turn(Turn::assistant(fallback.clone()));
                self.set_state(InteractionState::Idle);
                let voice_path = origin == SubmitOrigin::Voice || self.mode == SessionMode::Voice;
                if voice_path && self.config.chat.speak_fallback {
                    self.start_speaking(&fallback);
                }
            }
        }
    }

    fn handle_recognition(&mut self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::Finalized(text) => {
                // The adapter is idle again after a natural completion.
                self.set_listening(false);
                self.submit(&text, SubmitOrigin::Voice);
            }
            RecognitionEvent::Failed(reason) => {
                warn!("speech recognition failed: {reason}");
                self.set_listening(false);
            }
        }
    }

    fn handle_synthesis(&mut self, event: SynthesisEvent) {
        match event {
            SynthesisEvent::Started => {
                if self.state != InteractionState::Speaking {
                    // Late start after a cancel; the matching end event will
                    // follow and is equally ignorable.
                    debug!("ignoring synthesis start outside speaking state");
                }
            }
            SynthesisEvent::Ended => {
                if self.state == InteractionState::Speaking {
                    self.set_state(InteractionState::Idle);
                }
            }
            SynthesisEvent::Errored(reason) => {
                warn!("speech synthesis failed: {reason}");
                if self.state == InteractionState::Speaking {
                    self.set_state(InteractionState::Idle);
                }
            }
        }
    }

    fn start_speaking(&mut self, text: &str) {
        if self.listening {
            // The user is mid-capture; never talk over them.
            debug!("suppressing synthesis while capturing");
            return;
        }

        // At-most-one-active: any prior utterance is cancelled first.
        self.output.cancel();
        match self.output.speak(&strip_speech_markup(text)) {
            Ok(()) => self.set_state(InteractionState::Speaking),
            Err(e) => warn!("speech synthesis unavailable: {e}"),
        }
    }

    fn push_turn(&mut self, turn: Turn) {
        let _ = self
            .update_tx
            .send(SessionUpdate::TurnAppended(turn.clone()));
        self.transcript.append(turn);
    }

    fn set_state(&mut self, state: InteractionState) {
        if self.state != state {
            self.state = state;
            let _ = self.update_tx.send(SessionUpdate::StateChanged(state));
        }
    }

    fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            self.listening = listening;
            let _ = self
                .update_tx
                .send(SessionUpdate::ListeningChanged(listening));
        }
    }
}
